// Pipeline glue: decode -> payload window -> signature match -> count.

use crate::classify::SignatureSet;
use crate::config::{Config, KeyDimension};
use crate::counter::{CounterKey, CounterTable};
use crate::error::ConfigError;
use crate::frame::{self, ParsedHeaders, PayloadWindow};

/// Packet-classification and counting engine.
///
/// Stateless per call apart from the shared [`CounterTable`]; safe to share
/// across capture workers (`&self` methods only).
#[derive(Debug)]
pub struct Engine {
    config: Config,
    signatures: SignatureSet,
    counters: CounterTable,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let signatures = SignatureSet::new(config.signatures.clone())?;
        Ok(Self {
            config,
            signatures,
            counters: CounterTable::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared counter table, for external reporting collaborators.
    /// Readable at any time without pausing classification.
    pub fn counters(&self) -> &CounterTable {
        &self.counters
    }

    /// Runs the full path on one captured frame: decode the headers, extract
    /// the payload window, match signatures, and on a match increment the
    /// counter for the configured key dimension.
    ///
    /// `pid` is the process context the capture source attributes the frame
    /// to; it is only used when the engine is keyed by pid. Returns whether
    /// the frame was counted.
    pub fn process_frame(&self, frame: &[u8], pid: u32) -> bool {
        let headers = match frame::decode(frame, self.config.min_payload_bytes) {
            Ok(headers) => headers,
            Err(reason) => {
                log::trace!("frame skipped: {reason:?}");
                return false;
            }
        };
        let window = PayloadWindow::from_frame(frame, &headers);
        let key = self.key_for(&headers, pid);
        self.count_match(window.bytes(), key)
    }

    /// Classifies an already-extracted payload window and counts a match
    /// under `key`. The configured payload floor applies to the window
    /// length, mirroring the decoder's short-payload filter.
    pub fn classify_and_count(&self, window: &[u8], key: CounterKey) -> bool {
        if window.len() < self.config.min_payload_bytes {
            return false;
        }
        self.count_match(window, key)
    }

    /// Partial-capture variant: the capture source hands over only the first
    /// few payload bytes plus the payload length it observed. The floor
    /// applies to the declared length; matching uses the captured prefix.
    pub fn classify_prefix(&self, prefix: &[u8], declared_len: usize, key: CounterKey) -> bool {
        if declared_len < self.config.min_payload_bytes {
            return false;
        }
        let window = PayloadWindow::from_prefix(prefix, declared_len);
        self.count_match(window.bytes(), key)
    }

    fn key_for(&self, headers: &ParsedHeaders, pid: u32) -> CounterKey {
        match self.config.key_dimension {
            KeyDimension::Pid => CounterKey::Pid(pid),
            KeyDimension::PayloadLength => {
                CounterKey::PayloadLength(headers.payload_len.min(u16::MAX as usize) as u16)
            }
        }
    }

    fn count_match(&self, bytes: &[u8], key: CounterKey) -> bool {
        if !self.signatures.matches(bytes) {
            return false;
        }
        self.counters.increment(key);
        log::debug!("http match counted under {key:?}");
        true
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: Config::default(),
            signatures: SignatureSet::default_http(),
            counters: CounterTable::new(),
        }
    }
}
