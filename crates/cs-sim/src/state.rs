//! Run-state machine of the scheduler.

use std::fmt;

/// ```text
///            initialize            horizon event
/// Stopped ─────────────▶ Running ───────────────▶ Completed
///    ▲                   │    ▲                      │
///    │             pause │    │ resume               │
///    │                   ▼    │                      │
///    │                   Paused                      │
///    └──────────── stop / reset (from any state) ────┘
/// ```
///
/// `Completed` still accepts `step()`: reaching the horizon marks the run
/// complete without draining or freezing the event queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
    Completed,
}

impl RunState {
    /// `true` if `step()` processes events in this state.
    pub fn accepts_steps(self) -> bool {
        matches!(self, RunState::Running | RunState::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Stopped   => "stopped",
            RunState::Running   => "running",
            RunState::Paused    => "paused",
            RunState::Completed => "completed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
