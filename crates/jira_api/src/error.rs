//! Error model used by JIRA REST client operations.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

/// Failure of a single remote call: a non-success status, rejected credentials, a transport problem or a response body that does not match the expected schema.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("{status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("{status}. {hint}")]
    Authentication { status: StatusCode, hint: &'static str },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl JiraError {
    /// Builds an HTTP error from a status and the (possibly empty) response body.
    pub fn http(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        JiraError::Http { status, message }
    }

    /// Maps 401/403 to the hints users actually need.
    pub fn authentication(status: StatusCode) -> Self {
        let hint = if status == StatusCode::FORBIDDEN {
            "Please check that your account is not blocked by captcha"
        } else {
            "Please check your credentials"
        };
        JiraError::Authentication { status, hint }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            JiraError::Http { status, .. } | JiraError::Authentication { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for JiraError {
    /// Converts reqwest errors into semantic JiraError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JiraError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            JiraError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            JiraError::Network(err.to_string())
        } else if err.is_decode() {
            JiraError::Serialization(err.to_string())
        } else {
            JiraError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        JiraError::Serialization(err.to_string())
    }
}

/// JIRA reports failures as `{"errorMessages": [...], "errors": {field: msg}}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let mut messages: Vec<String> = value
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    if let Some(fields) = value.get("errors").and_then(|e| e.as_object()) {
        for (field, message) in fields {
            if let Some(text) = message.as_str() {
                messages.push(format!("{field}: {text}"));
            }
        }
    }
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_prefers_jira_error_messages() {
        let body = r#"{"errorMessages":["Issue does not exist"],"errors":{"timeSpent":"invalid"}}"#;
        let err = JiraError::http(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "400 Bad Request: Issue does not exist; timeSpent: invalid"
        );
    }

    #[test]
    fn http_error_falls_back_to_status_text() {
        let err = JiraError::http(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert_eq!(err.to_string(), "404 Not Found: Not Found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn forbidden_mentions_captcha() {
        let err = JiraError::authentication(StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("captcha"));
    }
}
