//! Commerce API error type and user-facing message extraction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status and (usually) a message.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// Message safe to put in front of the user. Transport detail stays in
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "network error, please try again".to_string(),
            ApiError::Api { message, .. } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_passes_through() {
        let err = ApiError::Api {
            status: 422,
            message: "card was declined".to_string(),
        };
        assert_eq!(err.user_message(), "card was declined");
    }
}
