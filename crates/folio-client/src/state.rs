use serde::Serialize;
use std::fmt;

/// Load lifecycle of a [`crate::PortalClient`]
///
/// `Uninitialized -> Loading -> Ready` on success, `Loading -> Error` on
/// failure. A failed load keeps any document loaded earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Uninitialized => write!(f, "uninitialized"),
            LoadState::Loading => write!(f, "loading"),
            LoadState::Ready => write!(f, "ready"),
            LoadState::Error(message) => write!(f, "error: {}", message),
        }
    }
}
