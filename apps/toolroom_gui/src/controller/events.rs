//! UI/backend events and error modeling for the GUI controller.

use client_core::store::{StoreError, StoreEvent};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    Store(StoreEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
    Form,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("invalid")
            || lower.contains("required")
            || lower.contains("must be")
            || lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("transport")
            || lower.contains("disconnected")
            || lower.contains("queue is full")
        {
            UiErrorCategory::Transport
        } else if lower.contains("backend rejected") {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_store(err: &StoreError) -> Self {
        match err {
            StoreError::Form(form) => Self {
                category: UiErrorCategory::Validation,
                context: UiErrorContext::Form,
                message: form.to_string(),
            },
            StoreError::Busy(_) => Self {
                category: UiErrorCategory::Unknown,
                context: UiErrorContext::General,
                message: err.to_string(),
            },
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
