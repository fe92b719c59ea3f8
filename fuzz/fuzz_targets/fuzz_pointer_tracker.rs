#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use swipeup_core::pointer::{DEFAULT_VELOCITY_WINDOW, PointerSample, PointerTracker};

fuzz_target!(|samples: Vec<(i16, i16, u16)>| {
    let mut tracker = PointerTracker::new(DEFAULT_VELOCITY_WINDOW);
    let mut iter = samples.iter();
    let Some(&(x, y, t)) = iter.next() else {
        return;
    };
    let origin = (f64::from(x), f64::from(y));
    tracker.begin(PointerSample::new(origin.0, origin.1, Duration::from_millis(u64::from(t))));

    for &(x, y, t) in iter.take(512) {
        let (x, y) = (f64::from(x), f64::from(y));
        let state = tracker.push(PointerSample::new(x, y, Duration::from_millis(u64::from(t))));
        // Deltas are measured from the press, whatever the timestamps did.
        assert_eq!(state.dx, x - origin.0);
        assert_eq!(state.dy, y - origin.1);
        assert!(state.vx.is_finite() && state.vy.is_finite());
    }
});
