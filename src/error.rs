//! Error types for .docx unpacking.

use thiserror::Error;

/// Result type for .docx operations.
pub type Result<T> = std::result::Result<T, DocxError>;

/// Error types for .docx operations.
///
/// The first error hit while walking the container aborts the whole unpack;
/// no partially built model is ever handed back alongside it.
#[derive(Error, Debug)]
pub enum DocxError {
    /// The container itself is not a readable ZIP archive
    #[error("ZIP error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error outside of any particular part (e.g. opening the file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A part could not be opened as a stream
    #[error("Cannot open part '{part}': {source}")]
    Open {
        part: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// A part stream could not be fully consumed
    #[error("Cannot read part '{part}': {source}")]
    Read {
        part: String,
        #[source]
        source: std::io::Error,
    },

    /// XML in a part is malformed or does not have the expected shape
    #[error("Parse error in '{part}': {message}")]
    Parse { part: String, message: String },

    /// A media part is larger than the configured cap
    #[error("Part '{part}' exceeds the size limit of {limit} bytes")]
    SizeLimitExceeded { part: String, limit: u64 },
}

impl DocxError {
    /// Build a [`DocxError::Parse`] for `part` from any displayable cause.
    pub fn parse(part: &str, message: impl std::fmt::Display) -> Self {
        DocxError::Parse {
            part: part.to_string(),
            message: message.to_string(),
        }
    }

    /// Map a quick-xml error, keeping IO failures apart from syntax failures.
    pub(crate) fn from_xml(part: &str, err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => DocxError::Read {
                part: part.to_string(),
                source: std::io::Error::new(io.kind(), io.to_string()),
            },
            other => DocxError::parse(part, other),
        }
    }

    /// Name of the part this error is attached to, if any.
    pub fn part(&self) -> Option<&str> {
        match self {
            DocxError::Open { part, .. }
            | DocxError::Read { part, .. }
            | DocxError::Parse { part, .. }
            | DocxError::SizeLimitExceeded { part, .. } => Some(part),
            DocxError::Archive(_) | DocxError::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_accessor() {
        let err = DocxError::parse("word/document.xml", "unexpected end");
        assert_eq!(err.part(), Some("word/document.xml"));
        assert_eq!(
            err.to_string(),
            "Parse error in 'word/document.xml': unexpected end"
        );

        let err = DocxError::Io(std::io::Error::other("boom"));
        assert_eq!(err.part(), None);
    }

    #[test]
    fn test_xml_io_error_becomes_read() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = DocxError::from_xml("word/document.xml", quick_xml::Error::from(io));
        match err {
            DocxError::Read { part, source } => {
                assert_eq!(part, "word/document.xml");
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            },
            other => panic!("expected Read error, got {other:?}"),
        }
    }
}
