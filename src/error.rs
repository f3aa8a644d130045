#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("signature set is empty")]
    EmptySignatureSet,
    #[error("signature at index {0} is empty")]
    EmptySignature(usize),
    #[error("min_payload_bytes must be at least 1")]
    ZeroMinPayload,
}
