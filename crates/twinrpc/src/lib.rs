//! # TwinRPC
//!
//! The envelope that moves one capability call across the runtime boundary.
//!
//! ## Architecture
//!
//! A call relay carries opaque bytes. This crate gives those bytes meaning:
//! a `Call` frame names the binding, the capability both sides must agree on,
//! the method, and the already-encoded request; a `Reply` frame carries either
//! the encoded response or a `Failure` describing why the serving side could
//! not produce one. Frames are ordinary `twinpack::Value` trees, so the same
//! codec and the same bounds apply to envelopes and payloads alike.

pub mod error;
pub mod frame;

pub use error::Error;
pub use error::Failure;
pub use error::Result;
pub use frame::Call;
pub use frame::Frame;
pub use frame::Reply;
pub use frame::decode_seq;
