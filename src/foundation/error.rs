/// Convenience result type used across dexreel.
pub type StudioResult<T> = Result<T, StudioError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StudioError {
    /// Invalid user-provided or manifest data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be read or decoded. Loaders usually recover from this with a fallback.
    #[error("asset error: {0}")]
    Asset(String),

    /// The drawing surface, font or encoder could not be prepared. Playback never starts.
    #[error("setup error: {0}")]
    Setup(String),

    /// Failure while the render loop was running.
    #[error("playback error: {0}")]
    Playback(String),

    /// Failure inside the encoder or while assembling the output file.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudioError {
    /// Build a [`StudioError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StudioError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StudioError::Setup`] value.
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }

    /// Build a [`StudioError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`StudioError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`StudioError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
