use serde::{Deserialize, Serialize};

/// An application error to surface globally until cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfacedError {
    /// Human-readable message.
    pub message: String,

    /// Optional machine-readable cause (e.g. "network_timeout").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Optional HTTP status of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl SurfacedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl core::fmt::Display for SurfacedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Error channel state. At most one error is active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ErrorState {
    #[default]
    Idle,
    Showing { error: SurfacedError },
}

impl ErrorState {
    pub fn active(&self) -> Option<&SurfacedError> {
        match self {
            ErrorState::Idle => None,
            ErrorState::Showing { error } => Some(error),
        }
    }
}

/// Events delivered to same-context observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    ErrorRaised { error: SurfacedError },
    ErrorCleared,
    LayoutCollapseChanged { collapsed: bool },
}
