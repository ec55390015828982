use thiserror::Error;

/// Failure while decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("polyline ended in the middle of a value")]
    Truncated,
    #[error("byte {byte:#04x} at offset {offset} is outside the polyline alphabet")]
    InvalidByte { byte: u8, offset: usize },
    #[error("value starting before offset {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

/// Coarse classes of directions failures. All of them degrade to fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidCoordinate,
    ServiceUnavailable,
    MalformedGeometry,
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("coordinate ({latitude}, {longitude}) is out of range")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("directions service timed out")]
    Timeout,
    #[error("directions request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("directions service responded with status {0}")]
    Status(u16),
    #[error("directions response is not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("route geometry unusable: {0}")]
    MalformedGeometry(String),
    #[error("route geometry failed to decode: {0}")]
    Decode(#[from] DecodeError),
}

impl DirectionsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DirectionsError::InvalidCoordinate { .. } => FailureKind::InvalidCoordinate,
            DirectionsError::Timeout
            | DirectionsError::Transport(_)
            | DirectionsError::Status(_) => FailureKind::ServiceUnavailable,
            DirectionsError::MalformedResponse(_)
            | DirectionsError::MalformedGeometry(_)
            | DirectionsError::Decode(_) => FailureKind::MalformedGeometry,
        }
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectionsError::Timeout
        } else if let Some(status) = err.status() {
            DirectionsError::Status(status.as_u16())
        } else {
            DirectionsError::Transport(err)
        }
    }
}
