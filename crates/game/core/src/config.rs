use crate::world::Button;

/// Engine configuration and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Ticks a blocking action may run before it is failed. `None` waits forever.
    pub action_timeout_ticks: Option<u32>,
    /// Button that makes `interact` scripts eligible for evaluation.
    pub interact_button: Button,
    /// State hosting the event engine. Scripts only run while it is on the
    /// stack, and chains it started are cancelled when it is popped.
    pub event_host: Option<String>,
    /// State pushed by the `dialog` action.
    pub dialog_state: String,
    /// State pushed by the `transition_teleport` action.
    pub transition_state: String,
}

impl EngineConfig {
    pub const DEFAULT_DIALOG_STATE: &'static str = "dialog";
    pub const DEFAULT_TRANSITION_STATE: &'static str = "transition";

    pub fn new() -> Self {
        Self {
            action_timeout_ticks: None,
            interact_button: Button::A,
            event_host: None,
            dialog_state: Self::DEFAULT_DIALOG_STATE.to_string(),
            transition_state: Self::DEFAULT_TRANSITION_STATE.to_string(),
        }
    }

    #[must_use]
    pub fn with_action_timeout(mut self, ticks: u32) -> Self {
        self.action_timeout_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_event_host(mut self, state: impl Into<String>) -> Self {
        self.event_host = Some(state.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
