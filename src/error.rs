//! Error type shared across the crate.
//!
//! Only conditions that indicate a programming error in the host (a malformed
//! color, an unknown tag) or a failure to set up the terminal are errors.
//! Everything that can go wrong inside the per-frame loop degrades the frame
//! instead: unparsable numeric attributes fall back to the tag default,
//! failed terminal writes are skipped cell by cell, and an exhausted
//! color-pair table hands out the default pair.

use std::io;

/// Errors produced by ezui.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A color argument had the wrong shape or an out-of-range channel.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A tag name outside the element vocabulary.
    #[error("unknown element tag: {0}")]
    UnknownTag(String),

    /// Terminal setup or teardown failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidColor("(1, 2)".into()).to_string(),
            "invalid color: (1, 2)"
        );
        assert_eq!(
            Error::UnknownTag("slider".into()).to_string(),
            "unknown element tag: slider"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::Other, "gone").into();
        assert!(matches!(err, Error::Terminal(_)));
    }
}
