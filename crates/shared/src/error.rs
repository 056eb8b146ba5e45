use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum CommonError {
    #[error("invalid request: {msg}")]
    InvalidRequest {
        msg: String,
        #[serde(skip)]
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("invalid response: {msg}")]
    InvalidResponse {
        msg: String,
        #[serde(skip)]
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("unknown error")]
    Unknown(
        #[serde(skip)]
        #[from]
        anyhow::Error,
    ),
}

impl CommonError {
    /// Short, stable name of the error kind, suitable for structured logs.
    pub fn name(&self) -> &'static str {
        match self {
            CommonError::InvalidRequest { .. } => "InvalidRequest",
            CommonError::InvalidResponse { .. } => "InvalidResponse",
            CommonError::Unknown(_) => "InternalError",
        }
    }
}
