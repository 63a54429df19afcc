use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform envelope returned by every API operation.
///
/// Serialized as `{success, message, data, errors, timestamp}`; absent
/// `data` and `errors` are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
            timestamp: Utc::now(),
        }
    }
}

/// Envelope for operations without a payload (delete, fault responses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub success: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl ApiStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
            timestamp: Utc::now(),
        }
    }
}

impl Default for ApiStatus {
    fn default() -> Self {
        Self::success(DEFAULT_SUCCESS_MESSAGE)
    }
}
