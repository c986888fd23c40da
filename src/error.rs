use thiserror::Error;

/// Everything that can go wrong while turning a map into chunks.
///
/// All variants are fatal for the split: nothing is returned alongside them.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("chunk side lengths must be positive integers, got {width}x{height}")]
    InvalidChunkSize { width: u32, height: u32 },

    #[error("layer `{layer}` uses `{compression}` compression, which is not supported")]
    UnsupportedCompression { layer: String, compression: String },

    #[error("malformed map data: {0}")]
    MalformedData(String),
}

impl From<serde_json::Error> for SplitError {
    fn from(e: serde_json::Error) -> Self {
        SplitError::MalformedData(e.to_string())
    }
}

pub type Result<T, E = SplitError> = std::result::Result<T, E>;
