//! Errors raised while loading a precompiled chunk.

use std::io;

use thiserror::Error;

/// A chunk failed validation or could not be read.
///
/// Every variant renders as "<reason> precompiled chunk" so callers can
/// print it next to a file name unchanged.
#[derive(Debug, Error)]
pub enum UndumpError {
    /// The leading signature bytes are wrong.
    #[error("not a precompiled chunk")]
    NotAChunk,

    /// The version byte does not match.
    #[error("version mismatch in precompiled chunk")]
    VersionMismatch,

    /// The format byte does not match.
    #[error("format mismatch in precompiled chunk")]
    FormatMismatch,

    /// The data sentinel does not match.
    #[error("corrupted precompiled chunk")]
    Corrupted,

    /// A declared word size differs from the expected width.
    #[error("{field} size mismatch in precompiled chunk")]
    SizeMismatch { field: &'static str },

    /// The integer probe matched neither byte order.
    #[error("corrupted precompiled chunk")]
    BadByteOrder,

    /// The float probe did not decode to the expected value.
    #[error("float format mismatch in precompiled chunk")]
    FloatFormatMismatch,

    /// A constant carries an unknown tag byte.
    #[error("corrupted precompiled chunk")]
    BadConstantTag(u8),

    /// The input ended before the chunk was complete.
    #[error("truncated precompiled chunk")]
    Truncated,

    /// Functions nest deeper than [`MAX_NESTING`](crate::header::MAX_NESTING).
    #[error("functions nested too deeply in precompiled chunk")]
    TooDeep,

    /// The underlying reader failed for a reason other than end of input.
    #[error("cannot read precompiled chunk: {0}")]
    Io(io::Error),
}

/// A prototype tree cannot be written as a chunk.
#[derive(Debug, Error)]
pub enum DumpError {
    /// A length does not fit its field.
    #[error("too many {what} to dump ({len})")]
    TooMany { what: &'static str, len: usize },

    /// Functions nest deeper than [`MAX_NESTING`](crate::header::MAX_NESTING).
    #[error("functions nested too deeply to dump")]
    TooDeep,
}

impl From<io::Error> for UndumpError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => UndumpError::Truncated,
            _ => UndumpError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_header_errors() {
        assert_eq!(UndumpError::NotAChunk.to_string(), "not a precompiled chunk");
        assert_eq!(
            UndumpError::VersionMismatch.to_string(),
            "version mismatch in precompiled chunk"
        );
        assert_eq!(
            UndumpError::FormatMismatch.to_string(),
            "format mismatch in precompiled chunk"
        );
        assert_eq!(
            UndumpError::FloatFormatMismatch.to_string(),
            "float format mismatch in precompiled chunk"
        );
    }

    #[test]
    fn display_size_mismatch() {
        let e = UndumpError::SizeMismatch {
            field: "lua_Integer",
        };
        assert_eq!(e.to_string(), "lua_Integer size mismatch in precompiled chunk");
    }

    #[test]
    fn corrupted_variants_share_message() {
        for e in [
            UndumpError::Corrupted,
            UndumpError::BadByteOrder,
            UndumpError::BadConstantTag(9),
        ] {
            assert_eq!(e.to_string(), "corrupted precompiled chunk");
        }
    }

    #[test]
    fn display_nesting_and_dump_errors() {
        assert_eq!(
            UndumpError::TooDeep.to_string(),
            "functions nested too deeply in precompiled chunk"
        );
        let e = DumpError::TooMany {
            what: "constants",
            len: 5_000_000_000,
        };
        assert_eq!(e.to_string(), "too many constants to dump (5000000000)");
        assert_eq!(DumpError::TooDeep.to_string(), "functions nested too deeply to dump");
    }

    #[test]
    fn eof_maps_to_truncated() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(UndumpError::from(err), UndumpError::Truncated));
    }

    #[test]
    fn other_io_errors_are_kept() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let e = UndumpError::from(err);
        assert!(matches!(e, UndumpError::Io(_)));
        assert_eq!(e.to_string(), "cannot read precompiled chunk: denied");
    }
}
