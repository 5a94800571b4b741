//! Nullable infrastructure for deterministic testing.
//!
//! The engine reaches the outside world through two capabilities: the HTTP
//! POST ([`FormPoster`](siteverify_engine::FormPoster)) and the clock
//! ([`Clock`](siteverify_engine::Clock)). This crate provides test-friendly
//! implementations that:
//! - Return scripted, deterministic values
//! - Record what they were asked for, for assertions
//! - Never touch the network or the wall clock
//!
//! Usage: swap real implementations for nullables via
//! `VerifyEngine::with_transport` / `VerifyEngine::with_clock`.

pub mod clock;
pub mod transport;

pub use clock::NullClock;
pub use transport::{NullTransport, RecordedRequest, ScriptedReply};
