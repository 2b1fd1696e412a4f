//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ClientError;
use shared::{
    domain::{Round, Year},
    protocol::{RaceSummary, ResultRow},
};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    RacesLoaded {
        generation: u64,
        year: Year,
        outcome: Result<Vec<RaceSummary>, UiError>,
    },
    ResultsLoaded {
        generation: u64,
        year: Year,
        round: Round,
        outcome: Result<Vec<ResultRow>, UiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Upstream,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Races,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("http 5") || message_lower.contains("upstream") {
            UiErrorCategory::Upstream
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Status { .. } => UiErrorCategory::Upstream,
            ClientError::Decode(_) | ClientError::InvalidBaseUrl { .. } => {
                UiErrorCategory::Validation
            }
        };
        let message = match context {
            UiErrorContext::Results if err.is_status() => "Failed to fetch results".to_string(),
            UiErrorContext::Results => format!("Failed to fetch results: {err}"),
            _ => err.to_string(),
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
