use serde::{Deserialize, Serialize};

/// Where a receipt attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    #[default]
    Idle,
    Captured,
    Editing,
    Compressing,
    Uploading,
    Done,
    Failed,
}

impl PipelineState {
    pub fn name(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Captured => "captured",
            PipelineState::Editing => "editing",
            PipelineState::Compressing => "compressing",
            PipelineState::Uploading => "uploading",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }

    /// Work is in flight; trigger actions must wait.
    pub fn is_busy(self) -> bool {
        matches!(self, PipelineState::Compressing | PipelineState::Uploading)
    }

    /// States from which a new asset may be captured.
    pub fn accepts_capture(self) -> bool {
        matches!(
            self,
            PipelineState::Idle
                | PipelineState::Captured
                | PipelineState::Done
                | PipelineState::Failed
        )
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
