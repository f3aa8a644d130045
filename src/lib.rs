//! In-process packet-classification and HTTP request counting engine.
//!
//! Consumes raw Ethernet frames handed over by an external capture source,
//! walks the Ethernet/IPv4/TCP headers with bounds-checked reads, extracts
//! the TCP payload window, and tests it against a small ordered set of HTTP
//! byte-prefix signatures. Matches increment a concurrently-updatable counter
//! keyed by a configurable dimension (process id or payload length).
//!
//! The crate owns no capture mechanism and no reporting surface: frames come
//! in through [`Engine::process_frame`] (or a pre-extracted payload window
//! through [`Engine::classify_and_count`]), and counts go out through
//! [`CounterTable::snapshot`]. Decoding never fails fatally — frames that are
//! not IPv4/TCP, are truncated, or carry a payload below the configured floor
//! are filtered out as [`NotApplicable`], which is a normal outcome, not an
//! error.

pub mod classify;
pub mod config;
pub mod correlate;
pub mod counter;
pub mod engine;
pub mod error;
pub mod frame;

pub use config::{Config, KeyDimension};
pub use correlate::CorrelationMap;
pub use counter::{CounterKey, CounterTable};
pub use engine::Engine;
pub use error::ConfigError;
pub use frame::{decode, NotApplicable, ParsedHeaders, PayloadWindow};
