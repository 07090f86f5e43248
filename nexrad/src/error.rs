use thiserror::Error;

/// Reasons a `NEXRAD` record line is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NexradError {
    #[error("expected 9 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid {field} '{value}'")]
    Integer { field: &'static str, value: String },

    #[error("{field} {value} is not positive")]
    NonPositiveSpan { field: &'static str, value: i32 },

    #[error("tile extent overflows")]
    Extent,

    #[error("expected 128 bins, found {0}")]
    BinCount(usize),

    #[error("invalid bin '{0}'")]
    Bin(char),

    #[error("intensity {0} out of range 0..=7")]
    Intensity(u8),

    #[error("product token '{0}' contains a path separator")]
    Token(String),
}
