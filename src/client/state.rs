//! Load state owned by each view

use super::ClientError;

/// Where a view's last request stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The request failed; the message is shown to the user
    Failed(String),
}

impl LoadState {
    pub fn failed(err: &ClientError) -> Self {
        LoadState::Failed(err.to_string())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
