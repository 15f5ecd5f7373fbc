//! Error handling module for javah

use thiserror::Error;

/// Main error type for javah operations
#[derive(Error, Debug)]
pub enum JavahError {
    /// Class name failed validation
    #[error("Invalid class name: '{name}'")]
    InvalidClassName { name: String },

    /// Method name failed validation
    #[error("Invalid method name: '{name}'")]
    InvalidMethodName { name: String },

    /// Field or method descriptor could not be parsed
    #[error("Invalid type descriptor: '{descriptor}'")]
    InvalidDescriptor { descriptor: String },

    /// Class file ended before a read completed
    #[error("Truncated class file: wanted {wanted} byte(s) at offset {offset}")]
    TruncatedClassFile { offset: usize, wanted: usize },

    /// Class file does not start with 0xCAFEBABE
    #[error("Bad class file magic: {magic:#010x}")]
    BadMagic { magic: u32 },

    /// Unknown constant pool tag encountered during parsing
    #[error("Unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    /// Constant pool index does not reference the expected entry kind
    #[error("Constant pool index {index} is not a {expected} entry")]
    BadConstantRef { index: u16, expected: &'static str },

    /// Constant pool string is not valid modified UTF-8
    #[error("Invalid modified UTF-8 in constant pool")]
    InvalidUtf8,

    /// Module path entries must be directories
    #[error("Module path entry is not a directory: {path}")]
    NotADirectory { path: String },

    /// Class could not be resolved against the configured search paths
    #[error("Class {name} not found on the search path:\n{searched}")]
    ClassNotFound { name: String, searched: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive (jar/jmod) error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for javah operations
pub type JavahResult<T> = std::result::Result<T, JavahError>;
