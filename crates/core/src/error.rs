//! Error types for the dissolve core.

use thiserror::Error;

/// Errors produced by field, surface, and image operations.
#[derive(Debug, Error)]
pub enum DissolveError {
    /// Width or height was zero (or overflowed) when creating a surface or image.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A configuration value cannot be used to sample or simulate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A pixel buffer's byte length did not match its declared dimensions.
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing an image file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = DissolveError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_reason() {
        let msg = DissolveError::InvalidConfig("sampling_gap must be > 0".into()).to_string();
        assert!(msg.contains("sampling_gap"), "missing reason in: {msg}");
    }

    #[test]
    fn buffer_length_reports_both_byte_counts() {
        let err = DissolveError::BufferLength {
            expected: 16,
            actual: 15,
        };
        let msg = format!("{err}");
        for n in ["16", "15"] {
            assert!(msg.contains(n), "missing {n} in: {msg}");
        }
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = DissolveError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = DissolveError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn dissolve_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DissolveError>();
    }

    #[test]
    fn dissolve_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<DissolveError>();
    }
}
