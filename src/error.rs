use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Transport,
    Upstream,
    Unexpected,
    InvalidInput,
    Resolution,
    NoCandidatesFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            1 => ErrorKind::Config,
            3 => ErrorKind::Transport,
            4 => ErrorKind::Upstream,
            101 => ErrorKind::InvalidInput,
            102 => ErrorKind::Resolution,
            103 => ErrorKind::NoCandidatesFound,
            _ => ErrorKind::Unexpected,
        }
    }

    /// Codes below 100 are internal and their message stays server-side.
    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Config | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Transport | ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            ErrorKind::InvalidInput | ErrorKind::Resolution => StatusCode::BAD_REQUEST,
            ErrorKind::NoCandidatesFound => StatusCode::NOT_FOUND,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("i/o error: {}", err);
        unexpected_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if self.is_internal() {
            status.canonical_reason().unwrap_or("Internal Server Error")
        } else {
            self.message.as_str()
        };

        let body = Json(json!({
            "code": self.code,
            "kind": self.kind(),
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn resolution_error(status: &str) -> Error {
    Error {
        code: 102,
        message: format!("could not resolve address: {}", status),
    }
}

pub fn no_candidates_error() -> Error {
    Error {
        code: 103,
        message: "no bars found in this area".into(),
    }
}

pub fn config_error(name: &str) -> Error {
    Error {
        code: 1,
        message: format!("missing or invalid configuration: {}", name),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::warn!("request to mapping service failed: {}", err);
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

#[test]
fn kinds_follow_codes() {
    assert_eq!(invalid_input_error().kind(), ErrorKind::InvalidInput);
    assert_eq!(resolution_error("ZERO_RESULTS").kind(), ErrorKind::Resolution);
    assert_eq!(no_candidates_error().kind(), ErrorKind::NoCandidatesFound);
    assert_eq!(config_error("GOOGLE_MAPS_API_KEY").kind(), ErrorKind::Config);
    assert_eq!(upstream_error().kind(), ErrorKind::Upstream);
    assert_eq!(unexpected_error().kind(), ErrorKind::Unexpected);
}

#[test]
fn statuses_follow_kinds() {
    let response = config_error("GOOGLE_MAPS_API_KEY").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = resolution_error("ZERO_RESULTS").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = no_candidates_error().into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    assert!(config_error("x").is_internal());
    assert!(!resolution_error("x").is_internal());
}
