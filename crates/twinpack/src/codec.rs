//! # Codec
//!
//! The translation layer between `Value` trees and bytes.
//!
//! ## Invariants
//! - **Recursion Safety**: Encoding and decoding are bounded by `MAX_DEPTH`.
//! - **Panic Safety**: All decoding paths return `Result`, never panicking on malformed data.
//! - **Exactness**: `decode` consumes the whole buffer or fails with `TrailingBytes`.

use crate::Error;
use crate::Result;
use crate::Value;

/// The maximum nesting depth for values.
pub const MAX_DEPTH: usize = 64;

/// Identifies the type of the encoded value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    BoolTrue = 0x01,
    BoolFalse = 0x02,
    U64 = 0x06,
    S64 = 0x0A,
    F64 = 0x0C,

    // Unit / Void
    Unit = 0x0E,
    OptionNone = 0x0F,

    // Blobs (Tag + u32 Len + Bytes)
    String = 0x10,
    Bytes = 0x11,

    // Containers (Tag + u32 Len + Body)
    List = 0x20,
    Record = 0x21,

    // ADTs (Tag + u32 Len + Body)
    OptionSome = 0x30,
    Variant = 0x33,
}

impl Tag {
    /// Returns the Tag variant for a given byte, or `None` if invalid.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Tag::BoolTrue),
            0x02 => Some(Tag::BoolFalse),
            0x06 => Some(Tag::U64),
            0x0A => Some(Tag::S64),
            0x0C => Some(Tag::F64),
            0x0E => Some(Tag::Unit),
            0x0F => Some(Tag::OptionNone),
            0x10 => Some(Tag::String),
            0x11 => Some(Tag::Bytes),
            0x20 => Some(Tag::List),
            0x21 => Some(Tag::Record),
            0x30 => Some(Tag::OptionSome),
            0x33 => Some(Tag::Variant),
            _ => None,
        }
    }
}

/// Encodes a value into a fresh byte vector.
///
/// # Errors
/// Returns `Error::DepthExceeded` if the value is nested deeper than `MAX_DEPTH`,
/// or `Error::BlobTooLarge` if any blob or container exceeds `u32::MAX` bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut enc = Encoder { buf: Vec::with_capacity(256) };
    enc.value(value, 0)?;
    Ok(enc.buf)
}

/// Decodes exactly one value from `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut dec = Decoder { buf: bytes };
    let value = dec.value(0)?;
    if !dec.buf.is_empty() {
        return Err(Error::TrailingBytes(dec.buf.len()));
    }
    Ok(value)
}

struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    fn value(&mut self, value: &Value, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }

        match value {
            Value::Unit => self.tag(Tag::Unit),
            Value::Bool(true) => self.tag(Tag::BoolTrue),
            Value::Bool(false) => self.tag(Tag::BoolFalse),
            Value::U64(v) => {
                self.tag(Tag::U64);
                self.buf.extend_from_slice(&v.to_le_bytes());
            }
            Value::S64(v) => {
                self.tag(Tag::S64);
                self.buf.extend_from_slice(&v.to_le_bytes());
            }
            Value::F64(v) => {
                self.tag(Tag::F64);
                self.buf.extend_from_slice(&v.to_le_bytes());
            }
            Value::Str(s) => self.blob(Tag::String, s.as_bytes())?,
            Value::Bytes(b) => self.blob(Tag::Bytes, b)?,
            Value::List(items) => {
                let start = self.begin(Tag::List);
                for item in items {
                    self.value(item, depth + 1)?;
                }
                self.end(start)?;
            }
            Value::Record(fields) => {
                let start = self.begin(Tag::Record);
                for (name, field) in fields {
                    self.named(name, field, depth + 1)?;
                }
                self.end(start)?;
            }
            Value::Option(None) => self.tag(Tag::OptionNone),
            Value::Option(Some(inner)) => {
                let start = self.begin(Tag::OptionSome);
                self.value(inner, depth + 1)?;
                self.end(start)?;
            }
            Value::Variant(name, payload) => self.named(name, payload, depth)?,
        }
        Ok(())
    }

    /// Writes `[Variant][Len][name][payload]`, the shape shared by variants and record entries.
    fn named(&mut self, name: &str, payload: &Value, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }
        let start = self.begin(Tag::Variant);
        self.blob(Tag::String, name.as_bytes())?;
        self.value(payload, depth + 1)?;
        self.end(start)
    }

    fn tag(&mut self, tag: Tag) {
        self.buf.push(tag as u8);
    }

    fn blob(&mut self, tag: Tag, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| Error::BlobTooLarge(data.len()))?;
        self.tag(tag);
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Writes the tag and a length placeholder. Returns where the body starts.
    fn begin(&mut self, tag: Tag) -> usize {
        self.tag(tag);
        self.buf.extend_from_slice(&[0, 0, 0, 0]);
        self.buf.len()
    }

    /// Back-patches the length header of the container whose body starts at `start`.
    fn end(&mut self, start: usize) -> Result<()> {
        let body_len = self.buf.len() - start;
        let len = u32::try_from(body_len).map_err(|_| Error::BlobTooLarge(body_len))?;
        self.buf[start - 4..start].copy_from_slice(&len.to_le_bytes());
        Ok(())
    }
}

/// A bounds-checked cursor over a byte slice.
struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    fn value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }

        let byte = self.read_u8()?;
        let tag = Tag::from_u8(byte).ok_or(Error::InvalidTag(byte))?;

        let value = match tag {
            Tag::BoolTrue => Value::Bool(true),
            Tag::BoolFalse => Value::Bool(false),
            Tag::U64 => Value::U64(u64::from_le_bytes(self.read_array()?)),
            Tag::S64 => Value::S64(i64::from_le_bytes(self.read_array()?)),
            Tag::F64 => Value::F64(f64::from_le_bytes(self.read_array()?)),
            Tag::Unit => Value::Unit,
            Tag::OptionNone => Value::Option(None),
            Tag::String => Value::Str(self.read_str()?),
            Tag::Bytes => {
                let len = self.read_len()?;
                Value::Bytes(self.read_bytes(len)?.to_vec())
            }
            Tag::List => {
                let mut body = self.enter()?;
                let mut items = Vec::new();
                while !body.buf.is_empty() {
                    items.push(body.value(depth + 1)?);
                }
                Value::List(items)
            }
            Tag::Record => {
                let mut body = self.enter()?;
                let mut fields = Vec::new();
                while !body.buf.is_empty() {
                    let entry = body.read_u8()?;
                    if entry != Tag::Variant as u8 {
                        return Err(Error::MalformedEntry);
                    }
                    fields.push(body.named(depth + 1)?);
                }
                Value::Record(fields)
            }
            Tag::OptionSome => {
                let mut body = self.enter()?;
                let inner = body.value(depth + 1)?;
                if !body.buf.is_empty() {
                    return Err(Error::TrailingBytes(body.buf.len()));
                }
                Value::Option(Some(Box::new(inner)))
            }
            Tag::Variant => {
                let (name, payload) = self.named(depth)?;
                Value::Variant(name, Box::new(payload))
            }
        };
        Ok(value)
    }

    /// Reads the body of a `[Variant][Len][name][payload]` entry; the tag is already consumed.
    fn named(&mut self, depth: usize) -> Result<(String, Value)> {
        let mut body = self.enter()?;
        if body.read_u8()? != Tag::String as u8 {
            return Err(Error::MalformedEntry);
        }
        let name = body.read_str()?;
        let payload = body.value(depth + 1)?;
        if !body.buf.is_empty() {
            return Err(Error::MalformedEntry);
        }
        Ok((name, payload))
    }

    fn read_u8(&mut self) -> Result<u8> {
        let (&b, rest) = self.buf.split_first().ok_or(Error::UnexpectedEnd)?;
        self.buf = rest;
        Ok(b)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::UnexpectedEnd);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_len(&mut self) -> Result<usize> {
        Ok(u32::from_le_bytes(self.read_array()?) as usize)
    }

    fn read_str(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::InvalidUtf8)
    }

    /// Splits off a length-prefixed container body as its own decoder.
    fn enter(&mut self) -> Result<Decoder<'a>> {
        let len = self.read_len()?;
        Ok(Decoder { buf: self.read_bytes(len)? })
    }
}
