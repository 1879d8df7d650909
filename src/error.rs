use thiserror::Error;

/// The five error kinds a caller can distinguish between: a short/malformed
/// wire read, a malformed or unsafe compressed name, an unknown enumeration
/// value, a field value that doesn't fit its declared width, or a failure in
/// one of the text-format parsers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DnsError {
    #[error("buffer error at offset {offset}: {message} (remaining {remaining}, requested {requested})")]
    Buffer {
        message: String,
        offset: usize,
        remaining: usize,
        requested: usize,
    },

    #[error("label error at offset {offset}: {message}")]
    Label { message: String, offset: usize },

    #[error("{name}: invalid lookup {key:?}")]
    Enum { name: &'static str, key: String },

    #[error("{field} value {value} does not fit in {bits} bits")]
    Range {
        field: &'static str,
        value: i64,
        bits: u8,
    },

    #[error("parse error at token {position}: {message}")]
    Parse { message: String, position: usize },
}

impl DnsError {
    pub fn buffer(message: impl Into<String>, offset: usize, remaining: usize, requested: usize) -> DnsError {
        DnsError::Buffer {
            message: message.into(),
            offset,
            remaining,
            requested,
        }
    }

    pub fn label(message: impl Into<String>, offset: usize) -> DnsError {
        DnsError::Label {
            message: message.into(),
            offset,
        }
    }

    pub fn range(field: &'static str, value: i64, bits: u8) -> DnsError {
        DnsError::Range { field, value, bits }
    }

    pub fn parse(message: impl Into<String>, position: usize) -> DnsError {
        DnsError::Parse {
            message: message.into(),
            position,
        }
    }
}

pub type Result<T> = std::result::Result<T, DnsError>;
