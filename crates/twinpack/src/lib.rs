//! # Twinpack
//!
//! The value model carried across the twinbridge call relay, and a small,
//! bounded TLV codec that turns those values into bytes and back.
//!
//! ## Philosophy
//!
//! - **One value model**: Both runtimes agree on `Value` and nothing else.
//!   Native types cross the boundary by converting through the `Wire` trait.
//! - **TLV Architecture**: `[Tag][Length?][Value]` structure enables safe skipping of unknown fields.
//! - **Bounded**: Nesting depth is capped on both encode and decode. Decoding never panics
//!   on untrusted input.
//!
//! ## Format
//!
//! - **Scalars**: `[Tag: 1b][Data: N]`
//! - **Blobs**: `[Tag: 1b][Len: 4b][Data: Len]`
//! - **Containers**: `[Tag: 1b][Len: 4b][Body: Len]`
//!
//! All integers are Little-Endian.

pub mod codec;
pub mod value;
pub mod wire;

pub use codec::Tag;
pub use codec::MAX_DEPTH;
pub use codec::decode;
pub use codec::encode;
pub use value::Value;
pub use wire::Fields;
pub use wire::Record;
pub use wire::Wire;

#[cfg(test)]
mod tests;

/// Twinpack encoding, decoding and conversion errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Byte does not correspond to a valid `Tag`.
    InvalidTag(u8),
    /// String data is not valid UTF-8.
    InvalidUtf8,
    /// Buffer exhausted while reading.
    UnexpectedEnd,
    /// Bytes remained after the top-level value was decoded.
    TrailingBytes(usize),
    /// Blob or container length exceeds `u32::MAX`.
    BlobTooLarge(usize),
    /// Value nesting exceeded `MAX_DEPTH`.
    DepthExceeded,
    /// Structural Violation: a record entry or variant was not shaped as `[name][value]`.
    MalformedEntry,
    /// The value did not have the shape the native type expects.
    TypeMismatch { expected: &'static str, found: &'static str },
    /// A record was missing a required field.
    MissingField(String),
    /// An integer did not fit the native type.
    OutOfRange { ty: &'static str, value: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTag(b) => write!(f, "Invalid Tag byte: {:#04x}", b),
            Error::TrailingBytes(n) => write!(f, "{} trailing bytes after value", n),
            Error::BlobTooLarge(n) => write!(f, "Blob of {} bytes exceeds u32 length", n),
            Error::DepthExceeded => write!(f, "Value nesting exceeds {} levels", MAX_DEPTH),
            Error::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Error::MissingField(name) => write!(f, "Missing record field '{}'", name),
            Error::OutOfRange { ty, value } => write!(f, "Value {} out of range for {}", value, ty),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for Twinpack operations.
pub type Result<T> = std::result::Result<T, Error>;
