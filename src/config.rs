// Engine configuration.

use serde::Serialize;

use crate::classify::DEFAULT_SIGNATURES;
use crate::error::ConfigError;
use crate::frame::MIN_HTTP_PAYLOAD;

/// Which dimension counted frames are aggregated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDimension {
    /// Key by the process id supplied with each frame.
    Pid,
    /// Key by the declared TCP payload length.
    PayloadLength,
}

/// Configuration for an [`Engine`](crate::Engine).
///
/// `min_payload_bytes` is the declared-payload floor applied before any
/// signature matching; `signatures` is an ordered list of byte prefixes.
/// The defaults reproduce the behavior of the original socket-filter probes:
/// pid-keyed counting, 7-byte floor, request-method plus `HTTP` signatures.
#[derive(Debug, Clone)]
pub struct Config {
    pub key_dimension: KeyDimension,
    pub min_payload_bytes: usize,
    pub signatures: Vec<Vec<u8>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_dimension: KeyDimension::Pid,
            min_payload_bytes: MIN_HTTP_PAYLOAD,
            signatures: DEFAULT_SIGNATURES.iter().map(|s| s.to_vec()).collect(),
        }
    }
}

impl Config {
    /// Checks the invariants the engine relies on.
    ///
    /// A zero floor is rejected (a zero-length payload can never match), as
    /// are empty signature sets and zero-length signatures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_payload_bytes == 0 {
            return Err(ConfigError::ZeroMinPayload);
        }
        if self.signatures.is_empty() {
            return Err(ConfigError::EmptySignatureSet);
        }
        if let Some(idx) = self.signatures.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::EmptySignature(idx));
        }
        Ok(())
    }
}
