//! Status returned when a blocking action is polled.

/// Progress of a blocking action.
///
/// # Tick Semantics
///
/// Blocking actions span several ticks. The engine polls them once per tick,
/// starting on the tick after they were started, until they report `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    /// The action still has work to do; poll again next tick.
    Running,

    /// The action completed; the chain advances to the next action.
    Finished,
}

impl ActionStatus {
    /// Returns `true` if this status is `Finished`.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, ActionStatus::Finished)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, ActionStatus::Running)
    }

    /// `Finished` when `done` holds, `Running` otherwise.
    #[inline]
    pub fn from_done(done: bool) -> Self {
        if done {
            ActionStatus::Finished
        } else {
            ActionStatus::Running
        }
    }
}
