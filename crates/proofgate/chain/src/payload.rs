use proofgate_types::{CanonicalEncoder, ContentHash};

/// A value that can be anchored in a hash chain.
///
/// Implementors write their fields in a fixed order; the payload hash is
/// the digest of that encoding under the implementor's domain tag.
pub trait ChainPayload {
    /// Domain tag, e.g. `proofgate/attestation/v1`.
    fn domain(&self) -> &'static str;

    /// Write every hashed field, in declared order.
    fn encode_fields(&self, enc: &mut CanonicalEncoder);

    fn payload_hash(&self) -> ContentHash {
        let mut enc = CanonicalEncoder::new(self.domain());
        self.encode_fields(&mut enc);
        enc.digest()
    }
}
