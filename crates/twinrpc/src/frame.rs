//! # Protocol Frames
//!
//! Defines the structure of the relay envelope (Call vs Reply).
//!
//! ## Invariants
//! - **Panic Safety**: All decoding paths return `Result`, never panicking on unknown data.
//! - **Forward Compatibility**: Unknown header fields are safely skipped.

use twinpack::Fields;
use twinpack::Value;

use crate::error::Error;
use crate::error::Failure;
use crate::error::Result;

/// An outbound request: invoke `method` of the binding `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub seq: u64,
    pub name: String,
    /// Display form of the capability the caller was built against.
    pub capability: String,
    pub method: String,
    pub request: Value,
}

/// The answer to the `Call` with the same `seq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub seq: u64,
    pub outcome: std::result::Result<Value, Failure>,
}

impl Reply {
    pub fn ok(seq: u64, response: Value) -> Self {
        Self { seq, outcome: Ok(response) }
    }

    pub fn failure(seq: u64, failure: Failure) -> Self {
        Self { seq, outcome: Err(failure) }
    }
}

/// Top-level frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Call(Call),
    Reply(Reply),
}

impl Frame {
    pub fn seq(&self) -> u64 {
        match self {
            Frame::Call(c) => c.seq,
            Frame::Reply(r) => r.seq,
        }
    }

    /// Encodes the frame to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(twinpack::encode(&self.to_value())?)
    }

    /// Decodes a frame from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_value(twinpack::decode(bytes)?)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Frame::Call(call) => Value::variant(
                "Call",
                Value::Record(vec![
                    ("seq".into(), Value::U64(call.seq)),
                    ("name".into(), Value::str(&call.name)),
                    ("capability".into(), Value::str(&call.capability)),
                    ("method".into(), Value::str(&call.method)),
                    ("request".into(), call.request.clone()),
                ]),
            ),
            Frame::Reply(reply) => {
                let outcome = match &reply.outcome {
                    Ok(response) => Value::variant("Ok", response.clone()),
                    Err(failure) => Value::variant("Err", encode_failure(failure)),
                };
                Value::variant(
                    "Reply",
                    Value::Record(vec![
                        ("seq".into(), Value::U64(reply.seq)),
                        ("outcome".into(), outcome),
                    ]),
                )
            }
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Variant(kind, body) = value else {
            return Err(violation("frame is not a variant"));
        };
        let mut fields = Fields::new(*body)?;

        match kind.as_str() {
            "Call" => Ok(Frame::Call(Call {
                seq: required(&mut fields, "seq")?,
                name: required(&mut fields, "name")?,
                capability: required(&mut fields, "capability")?,
                method: required(&mut fields, "method")?,
                request: required(&mut fields, "request")?,
            })),
            "Reply" => {
                let seq = required(&mut fields, "seq")?;
                let outcome: Value = required(&mut fields, "outcome")?;
                let Value::Variant(status, payload) = outcome else {
                    return Err(violation("outcome is not a variant"));
                };
                let outcome = match status.as_str() {
                    "Ok" => Ok(*payload),
                    "Err" => Err(decode_failure(*payload)?),
                    other => return Err(Error::UnknownVariant(format!("Reply outcome: {}", other))),
                };
                Ok(Frame::Reply(Reply { seq, outcome }))
            }
            other => Err(Error::UnknownVariant(format!("Top-level frame: {}", other))),
        }
    }
}

/// Decodes just the sequence number from a raw frame.
/// This is useful for routing replies when the full decoding might fail.
pub fn decode_seq(bytes: &[u8]) -> Result<u64> {
    match twinpack::decode(bytes)? {
        Value::Variant(_, body) => match body.field("seq") {
            Some(Value::U64(seq)) => Ok(*seq),
            _ => Err(violation("Missing seq")),
        },
        _ => Err(violation("frame is not a variant")),
    }
}

// Helper functions

fn violation(msg: &str) -> Error {
    Error::ProtocolViolation(msg.to_string())
}

/// Takes a header field, reporting absence as a protocol violation rather than a codec error.
fn required<T: twinpack::Wire>(fields: &mut Fields, name: &str) -> Result<T> {
    match fields.take_opt(name)? {
        Some(v) => Ok(v),
        None => Err(Error::ProtocolViolation(format!("Missing {}", name))),
    }
}

fn encode_failure(failure: &Failure) -> Value {
    let payload = match failure {
        Failure::TypeMismatch { expected, found } => Value::Record(vec![
            ("expected".into(), Value::str(expected)),
            ("found".into(), Value::str(found)),
        ]),
        Failure::NameNotFound(msg)
        | Failure::UnknownMethod(msg)
        | Failure::Codec(msg)
        | Failure::Remote(msg)
        | Failure::ProtocolViolation(msg) => Value::str(msg),
        Failure::Closed => Value::Unit,
    };
    Value::variant(failure.as_tag(), payload)
}

fn decode_failure(value: Value) -> Result<Failure> {
    let Value::Variant(tag, payload) = value else {
        return Err(violation("failure is not a variant"));
    };

    if tag == "Closed" {
        return Ok(Failure::Closed);
    }

    if tag == "BadType" {
        let mut fields = Fields::new(*payload)?;
        return Ok(Failure::TypeMismatch {
            expected: required(&mut fields, "expected")?,
            found: required(&mut fields, "found")?,
        });
    }

    let msg = failure_message(*payload)?;
    match tag.as_str() {
        "NoName" => Ok(Failure::NameNotFound(msg)),
        "NoMethod" => Ok(Failure::UnknownMethod(msg)),
        "Codec" => Ok(Failure::Codec(msg)),
        "Remote" => Ok(Failure::Remote(msg)),
        "Protocol" => Ok(Failure::ProtocolViolation(msg)),
        other => Err(Error::UnknownVariant(format!("Failure reason: {}", other))),
    }
}

fn failure_message(value: Value) -> Result<String> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(Error::ProtocolViolation(format!(
            "failure payload is {}, expected string",
            other.kind()
        ))),
    }
}
