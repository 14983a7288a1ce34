use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Validation,
    Internal,
    Other,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            422 => Self::Validation,
            500..=599 => Self::Internal,
            _ => Self::Other,
        }
    }
}

/// Error body the backend returns on non-2xx responses.
///
/// `detail` is a plain string for business-rule failures and a list of
/// `{loc, msg, type}` entries for request validation failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(serde_json::Value::String(detail.into())),
        }
    }

    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Array(entries) => {
                let messages: Vec<String> = entries
                    .iter()
                    .filter_map(validation_entry_message)
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        }
    }
}

fn validation_entry_message(entry: &serde_json::Value) -> Option<String> {
    let msg = entry.get("msg")?.as_str()?;
    let field = entry
        .get("loc")
        .and_then(|loc| loc.as_array())
        .and_then(|loc| loc.last())
        .and_then(|last| last.as_str());
    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

#[derive(Debug, Error)]
#[error("{code:?} ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
pub struct ApiException {
    pub status: u16,
    pub code: ErrorCode,
    pub detail: Option<String>,
}

impl ApiException {
    pub fn new(status: u16, body: &ApiErrorBody) -> Self {
        Self {
            status,
            code: ErrorCode::from_status(status),
            detail: body.detail_message(),
        }
    }
}
