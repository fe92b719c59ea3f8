#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use swipeup_core::geometry::Viewport;
use swipeup_core::pointer::{PointerEvent, PointerSample};
use swipeup_panel::{PanelConfig, PanelEvent, SwipePanel};

#[derive(Debug, Arbitrary)]
enum Op {
    Down { x: i16, y: i16 },
    Move { dx: i8, dy: i16 },
    Up,
    Preempt,
    Cancel,
    Tick(u8),
    Open,
    Close,
    Lock,
    Unlock,
    SwipeUp(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    height: u16,
    lock_after_open: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    // Keep the viewport taller than the collapsed bar.
    let height = f64::from(input.height % 2000) + 100.0;
    let config = PanelConfig::default().lock_after_open(input.lock_after_open);
    let panel = SwipePanel::new(config, Viewport::new(400.0, height));
    let mut session = panel.gesture_session();
    let mut responder = panel.clone();
    let mut clock = Duration::ZERO;
    let (mut x, mut y) = (0.0, height / 2.0);

    for op in input.ops.iter().take(256) {
        clock += Duration::from_millis(8);
        let was_open = panel.is_open();
        match *op {
            Op::Down { x: px, y: py } => {
                (x, y) = (f64::from(px), f64::from(py));
                session.handle(PointerEvent::Down(PointerSample::new(x, y, clock)), &mut responder);
            }
            Op::Move { dx, dy } => {
                x += f64::from(dx);
                y += f64::from(dy);
                session.handle(PointerEvent::Move(PointerSample::new(x, y, clock)), &mut responder);
            }
            Op::Up => {
                session.handle(PointerEvent::Up(PointerSample::new(x, y, clock)), &mut responder);
            }
            Op::Preempt => {
                session.handle(PointerEvent::Preempt, &mut responder);
            }
            Op::Cancel => {
                session.handle(PointerEvent::Cancel, &mut responder);
            }
            Op::Tick(ms) => {
                panel.tick(Duration::from_millis(u64::from(ms)));
            }
            Op::Open => {
                panel.open();
            }
            Op::Close => {
                panel.close();
            }
            Op::Lock => panel.disable_swipe(),
            Op::Unlock => panel.enable_swipe(),
            Op::SwipeUp(enabled) => panel.set_can_swipe_up(enabled),
        }

        let events = panel.take_events();
        if panel.is_open() != was_open {
            let expected = if panel.is_open() { PanelEvent::Opened } else { PanelEvent::Closed };
            assert!(events.contains(&expected), "is_open flipped without {expected:?}");
        }
        let state = panel.state();
        if !panel.is_animating() {
            assert!(
                state.range().contains(&state.values()),
                "values out of range at rest: {:?}",
                state.values()
            );
        }
    }

    session.handle(PointerEvent::Cancel, &mut responder);
    for _ in 0..1000 {
        if !panel.is_animating() {
            break;
        }
        panel.tick(Duration::from_millis(16));
    }
    assert!(!panel.is_animating(), "commit never settled");
    assert!(panel.state().is_at_rest());
});
