// HTTP signature matching.
//
// Matching is exact, case-sensitive, prefix-only: each signature is compared
// against the start of the payload window with cheap sequential byte
// comparisons, the way line-rate traffic inspection does it. No allocation
// on the match path.

use crate::error::ConfigError;

/// The signatures the original socket-filter probes match: request methods
/// plus the `HTTP` prefix shared by responses and request lines.
pub const DEFAULT_SIGNATURES: [&[u8]; 6] = [b"GET", b"POST", b"PUT", b"DELETE", b"HEAD", b"HTTP"];

/// Fixed, ordered list of byte-prefix signatures.
///
/// Built once at configuration time and immutable afterwards.
#[derive(Debug, Clone)]
pub struct SignatureSet {
    signatures: Vec<Vec<u8>>,
}

impl SignatureSet {
    /// Builds a set from raw byte prefixes, preserving order.
    ///
    /// Rejects an empty list and zero-length signatures (a zero-length
    /// prefix would match every payload).
    pub fn new(signatures: Vec<Vec<u8>>) -> Result<Self, ConfigError> {
        if signatures.is_empty() {
            return Err(ConfigError::EmptySignatureSet);
        }
        if let Some(idx) = signatures.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::EmptySignature(idx));
        }
        Ok(Self { signatures })
    }

    /// The default HTTP request/response signature set.
    pub fn default_http() -> Self {
        Self {
            signatures: DEFAULT_SIGNATURES.iter().map(|s| s.to_vec()).collect(),
        }
    }

    /// Tests the window start against each signature in order.
    ///
    /// Reads at most `signature.len()` bytes per signature and never past
    /// `window.len()`; a window shorter than a signature fails that
    /// signature rather than being read further.
    pub fn matches(&self, window: &[u8]) -> bool {
        self.signatures.iter().any(|sig| window.starts_with(sig))
    }

    /// Length of the longest signature in the set.
    pub fn max_signature_len(&self) -> usize {
        self.signatures.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self::default_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_matches_requests_and_responses() {
        let set = SignatureSet::default_http();
        assert!(set.matches(b"GET / HTTP/1.1\r\n"));
        assert!(set.matches(b"POST /submit HTTP/1.1\r\n"));
        assert!(set.matches(b"PUT /res HTTP/1.1\r\n"));
        assert!(set.matches(b"DELETE /res HTTP/1.1\r\n"));
        assert!(set.matches(b"HEAD / HTTP/1.0\r\n"));
        assert!(set.matches(b"HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn non_http_payload_does_not_match() {
        let set = SignatureSet::default_http();
        assert!(!set.matches(b"XYZ some binary"));
        assert!(!set.matches(b"\x16\x03\x01\x02\x00\x01\x00")); // TLS ClientHello
        assert!(!set.matches(b""));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let set = SignatureSet::default_http();
        assert!(!set.matches(b"get / http/1.1\r\n"));
        assert!(!set.matches(b"Http/1.1 200 OK\r\n"));
    }

    #[test]
    fn window_shorter_than_signature_fails_that_signature() {
        let set = SignatureSet::default_http();
        // "GET" (3 bytes) still matches a 3-byte window; "HTTP" cannot.
        assert!(set.matches(b"GET"));
        assert!(!set.matches(b"HTT"));
    }

    #[test]
    fn custom_set_is_honored_exactly() {
        let set = SignatureSet::new(vec![b"OPTIONS".to_vec()]).unwrap();
        assert!(set.matches(b"OPTIONS * HTTP/1.1\r\n"));
        assert!(!set.matches(b"GET / HTTP/1.1\r\n"));
        assert_eq!(set.max_signature_len(), 7);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set_rejected() {
        assert!(matches!(
            SignatureSet::new(Vec::new()),
            Err(ConfigError::EmptySignatureSet)
        ));
    }

    #[test]
    fn empty_signature_rejected() {
        assert!(matches!(
            SignatureSet::new(vec![b"GET".to_vec(), Vec::new()]),
            Err(ConfigError::EmptySignature(1))
        ));
    }
}
