#![forbid(unsafe_code)]

//! Drive a panel from a [`Script`] and write a JSON Lines frame trace.
//!
//! Every step produces one record; `tick` steps produce one record per
//! frame. Pointer timestamps ahead of the animation clock advance it first,
//! so a commit started by a release keeps running while the script waits.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use swipeup_core::geometry::Viewport;
use swipeup_core::pointer::{GestureSession, PointerEvent, PointerSample, SessionOutcome};
use swipeup_panel::{PanelConfig, PanelEvent, PanelFrame, SwipePanel};

use crate::error::{ReplayError, Result};
use crate::script::{Script, Step};

/// Default frame interval used to subdivide ticks.
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Default limit for the final settle.
pub const DEFAULT_SETTLE_MS: u64 = 5_000;

#[derive(Debug, Serialize)]
struct FrameRecord {
    t_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    cause: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'static str>,
    frame: PanelFrame,
    events: Vec<&'static str>,
}

/// Totals reported once the script has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub is_open: bool,
    pub has_opened: bool,
    pub frames: u64,
    pub events: u64,
    pub elapsed_ms: u64,
}

#[derive(Serialize)]
struct SummaryRecord {
    summary: ReplaySummary,
}

fn outcome_label(outcome: SessionOutcome) -> &'static str {
    match outcome {
        SessionOutcome::Ignored => "ignored",
        SessionOutcome::Claimed => "claimed",
        SessionOutcome::Moved => "moved",
        SessionOutcome::Released => "released",
        SessionOutcome::Terminated => "terminated",
        SessionOutcome::Retained => "retained",
    }
}

/// Steps one panel through a script.
pub struct Replayer<W: Write> {
    panel: SwipePanel,
    session: GestureSession,
    out: W,
    clock_ms: u64,
    frame_ms: u64,
    last_point: (f64, f64),
    frames: u64,
    events: u64,
}

impl<W: Write> Replayer<W> {
    /// Build a panel for `config` on `viewport`, writing records to `out`.
    pub fn new(config: PanelConfig, viewport: Viewport, frame_ms: u64, out: W) -> Result<Self> {
        if frame_ms == 0 {
            return Err(ReplayError::invalid("frame interval must be at least 1ms"));
        }
        let panel = SwipePanel::new(config, viewport);
        Ok(Self {
            session: panel.gesture_session(),
            panel,
            out,
            clock_ms: 0,
            frame_ms,
            last_point: (0.0, 0.0),
            frames: 0,
            events: 0,
        })
    }

    /// The panel under replay.
    pub fn panel(&self) -> &SwipePanel {
        &self.panel
    }

    /// Current animation clock.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Run every step of `script`.
    pub fn run_script(&mut self, script: &Script) -> Result<()> {
        for (line, step) in script.steps() {
            self.step(line, step)?;
        }
        Ok(())
    }

    /// Apply one step.
    pub fn step(&mut self, line: usize, step: &Step) -> Result<()> {
        tracing::debug!(message = "replay.step", line, step = step.label(), t_ms = self.clock_ms);
        step.check_limits()
            .map_err(|message| ReplayError::invalid_script(line, message))?;
        let outcome = match *step {
            Step::Down { x, y, t_ms } => Some(self.pointer(t_ms, x, y, PointerEvent::Down)?),
            Step::Move { x, y, t_ms } => Some(self.pointer(t_ms, x, y, PointerEvent::Move)?),
            Step::Up { t_ms } => {
                let (x, y) = self.last_point;
                Some(self.pointer(t_ms, x, y, PointerEvent::Up)?)
            }
            Step::Preempt => Some(self.dispatch(PointerEvent::Preempt)),
            Step::Cancel => Some(self.dispatch(PointerEvent::Cancel)),
            Step::Tick { ms } => return self.advance(ms),
            Step::Open => {
                self.panel.open();
                None
            }
            Step::Close => {
                self.panel.close();
                None
            }
            Step::Lock => {
                self.panel.disable_swipe();
                None
            }
            Step::Unlock => {
                self.panel.enable_swipe();
                None
            }
            Step::SetCanSwipeUp { enabled } => {
                self.panel.set_can_swipe_up(enabled);
                None
            }
        };
        self.record(Some(line), step.label(), outcome.map(outcome_label))
    }

    /// Tick until the panel settles, then write the summary record.
    pub fn finish(mut self, settle_ms: u64) -> Result<ReplaySummary> {
        let deadline = self.clock_ms.saturating_add(settle_ms);
        while self.panel.is_animating() {
            if self.clock_ms >= deadline {
                tracing::warn!(message = "replay.unsettled", limit_ms = settle_ms);
                return Err(ReplayError::Unsettled { limit_ms: settle_ms });
            }
            let dt = self.frame_ms.min(deadline - self.clock_ms);
            self.frame(dt, "settle")?;
        }
        let summary = ReplaySummary {
            is_open: self.panel.is_open(),
            has_opened: self.panel.has_opened(),
            frames: self.frames,
            events: self.events,
            elapsed_ms: self.clock_ms,
        };
        serde_json::to_writer(&mut self.out, &SummaryRecord { summary })?;
        writeln!(self.out)?;
        self.out.flush()?;
        tracing::info!(
            message = "replay.done",
            is_open = summary.is_open,
            frames = summary.frames,
            events = summary.events
        );
        Ok(summary)
    }

    fn pointer(
        &mut self,
        t_ms: Option<u64>,
        x: f64,
        y: f64,
        event: fn(PointerSample) -> PointerEvent,
    ) -> Result<SessionOutcome> {
        if let Some(t) = t_ms.filter(|&t| t > self.clock_ms) {
            self.advance(t - self.clock_ms)?;
        }
        self.last_point = (x, y);
        let sample = PointerSample::new(x, y, Duration::from_millis(self.clock_ms));
        Ok(self.dispatch(event(sample)))
    }

    fn dispatch(&mut self, event: PointerEvent) -> SessionOutcome {
        let mut responder = self.panel.clone();
        self.session.handle(event, &mut responder)
    }

    fn advance(&mut self, ms: u64) -> Result<()> {
        let mut left = ms;
        while left > 0 {
            let dt = left.min(self.frame_ms);
            self.frame(dt, "tick")?;
            left -= dt;
        }
        Ok(())
    }

    fn frame(&mut self, dt: u64, cause: &'static str) -> Result<()> {
        self.clock_ms = self.clock_ms.saturating_add(dt);
        self.panel.tick(Duration::from_millis(dt));
        self.frames += 1;
        self.record(None, cause, None)
    }

    fn record(
        &mut self,
        line: Option<usize>,
        cause: &'static str,
        outcome: Option<&'static str>,
    ) -> Result<()> {
        let events: Vec<&'static str> = self
            .panel
            .take_events()
            .into_iter()
            .map(PanelEvent::label)
            .collect();
        self.events += events.len() as u64;
        let record = FrameRecord {
            t_ms: self.clock_ms,
            line,
            cause,
            outcome,
            frame: self.panel.frame(),
            events,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Parse-and-run convenience used by the CLI.
pub fn replay<W: Write>(
    script: &Script,
    config: PanelConfig,
    viewport: Viewport,
    frame_ms: u64,
    settle_ms: u64,
    out: W,
) -> Result<ReplaySummary> {
    let mut replayer = Replayer::new(config, viewport, frame_ms, out)?;
    replayer.run_script(script)?;
    replayer.finish(settle_ms)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn run(text: &str) -> (ReplaySummary, Vec<Value>) {
        let script = Script::parse(text).unwrap();
        let mut out = Vec::new();
        let summary = replay(
            &script,
            PanelConfig::default(),
            Viewport::new(400.0, 800.0),
            DEFAULT_FRAME_MS,
            DEFAULT_SETTLE_MS,
            &mut out,
        )
        .unwrap();
        let records = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, records)
    }

    #[test]
    fn flick_up_opens_panel() {
        let (summary, records) = run(concat!(
            "{\"step\": \"down\", \"x\": 200, \"y\": 760, \"t_ms\": 0}\n",
            "{\"step\": \"move\", \"x\": 200, \"y\": 700, \"t_ms\": 16}\n",
            "{\"step\": \"move\", \"x\": 200, \"y\": 600, \"t_ms\": 32}\n",
            "{\"step\": \"up\", \"t_ms\": 48}\n",
        ));
        assert!(summary.is_open);
        assert!(summary.has_opened);
        // Pointer timestamps ahead of the clock emit tick frames first.
        assert_eq!(records[1]["cause"], "tick");
        let first_move = records.iter().find(|r| r["cause"] == "move").unwrap();
        assert_eq!(first_move["outcome"], "claimed");
        let up = records
            .iter()
            .find(|r| r["cause"] == "up")
            .expect("up record");
        assert_eq!(up["outcome"], "released");
        assert_eq!(up["events"][0], "open_started");
        let last = records.last().unwrap();
        assert_eq!(last["summary"]["is_open"], true);
        assert_eq!(last["summary"]["events"], 2);
    }

    #[test]
    fn programmatic_steps_are_recorded() {
        let (summary, records) = run(concat!(
            "{\"step\": \"open\"}\n",
            "{\"step\": \"tick\", \"ms\": 2000}\n",
            "{\"step\": \"lock\"}\n",
        ));
        assert!(summary.is_open);
        assert_eq!(records[0]["cause"], "open");
        assert_eq!(records[0]["line"], 1);
        assert_eq!(records[0]["events"][0], "open_started");
        let ticks = records.iter().filter(|r| r["cause"] == "tick").count();
        assert_eq!(ticks, 125);
        let lock = records.iter().find(|r| r["cause"] == "lock").unwrap();
        assert_eq!(lock["frame"]["override_swipe"], true);
    }

    #[test]
    fn pending_commit_settles_before_summary() {
        let (summary, records) = run("{\"step\": \"open\"}\n");
        assert!(summary.is_open);
        assert!(records.iter().any(|r| r["cause"] == "settle"));
    }

    #[test]
    fn oversized_steps_are_rejected_before_running() {
        let mut replayer = Replayer::new(
            PanelConfig::default(),
            Viewport::new(400.0, 800.0),
            DEFAULT_FRAME_MS,
            Vec::<u8>::new(),
        )
        .unwrap();
        let err = replayer.step(3, &Step::Tick { ms: u64::MAX }).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidScript { line: 3, .. }), "{err}");
        let err = replayer
            .step(4, &Step::Down { x: 0.0, y: 0.0, t_ms: Some(u64::MAX) })
            .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidScript { line: 4, .. }), "{err}");
        assert_eq!(replayer.clock_ms(), 0);
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let err = Replayer::new(
            PanelConfig::default(),
            Viewport::new(400.0, 800.0),
            0,
            Vec::<u8>::new(),
        )
        .err()
        .unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn zero_settle_limit_reports_unsettled() {
        let script = Script::parse("{\"step\": \"open\"}").unwrap();
        let err = replay(
            &script,
            PanelConfig::default(),
            Viewport::new(400.0, 800.0),
            DEFAULT_FRAME_MS,
            0,
            Vec::<u8>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::Unsettled { limit_ms: 0 }));
    }
}
