//! Canonical, explicitly field-ordered byte encoding.
//!
//! Hashes in ProofGate never depend on a serializer's map or field
//! iteration order. Each hashed structure writes its fields through a
//! [`CanonicalEncoder`] in a fixed, declared order:
//!
//! ```text
//! domain tag  := len(u64 BE) ‖ utf8 bytes
//! field       := tag(u8) ‖ kind(u8) ‖ len(u64 BE) ‖ payload
//! ```
//!
//! Integers are big-endian, floats are IEEE-754 bit patterns (with `-0.0`
//! folded into `0.0` and every NaN folded into one pattern), options carry
//! a presence byte, and sequences are introduced by a count field.

use crate::hash::ContentHash;

const KIND_STR: u8 = 0x01;
const KIND_BYTES: u8 = 0x02;
const KIND_U64: u8 = 0x03;
const KIND_F64: u8 = 0x04;
const KIND_BOOL: u8 = 0x05;
const KIND_HASH: u8 = 0x06;
const KIND_NONE: u8 = 0x07;
const KIND_SEQ: u8 = 0x08;

/// Incremental canonical encoder. See the module docs for the layout.
#[derive(Debug, Clone)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Start an encoding under a domain tag, e.g. `proofgate/log-entry/v1`.
    pub fn new(domain: &str) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(&(domain.len() as u64).to_be_bytes());
        buf.extend_from_slice(domain.as_bytes());
        Self { buf }
    }

    fn field(&mut self, tag: u8, kind: u8, payload: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.buf.push(kind);
        self.buf
            .extend_from_slice(&(payload.len() as u64).to_be_bytes());
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn str(&mut self, tag: u8, value: &str) -> &mut Self {
        self.field(tag, KIND_STR, value.as_bytes())
    }

    pub fn bytes(&mut self, tag: u8, value: &[u8]) -> &mut Self {
        self.field(tag, KIND_BYTES, value)
    }

    pub fn u64(&mut self, tag: u8, value: u64) -> &mut Self {
        self.field(tag, KIND_U64, &value.to_be_bytes())
    }

    pub fn f64(&mut self, tag: u8, value: f64) -> &mut Self {
        let normalized = if value == 0.0 {
            0.0f64
        } else if value.is_nan() {
            f64::NAN
        } else {
            value
        };
        self.field(tag, KIND_F64, &normalized.to_bits().to_be_bytes())
    }

    pub fn bool(&mut self, tag: u8, value: bool) -> &mut Self {
        self.field(tag, KIND_BOOL, &[u8::from(value)])
    }

    pub fn hash(&mut self, tag: u8, value: &ContentHash) -> &mut Self {
        self.field(tag, KIND_HASH, value.as_bytes())
    }

    pub fn opt_hash(&mut self, tag: u8, value: Option<&ContentHash>) -> &mut Self {
        match value {
            Some(h) => self.hash(tag, h),
            None => self.field(tag, KIND_NONE, &[]),
        }
    }

    pub fn opt_str(&mut self, tag: u8, value: Option<&str>) -> &mut Self {
        match value {
            Some(s) => self.str(tag, s),
            None => self.field(tag, KIND_NONE, &[]),
        }
    }

    /// Introduce a sequence of `len` elements; the caller writes them next.
    pub fn seq(&mut self, tag: u8, len: usize) -> &mut Self {
        self.field(tag, KIND_SEQ, &(len as u64).to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// BLAKE3 digest of everything written so far.
    pub fn digest(&self) -> ContentHash {
        ContentHash::hash(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn domain_tag_separates_hashes() {
        let mut a = CanonicalEncoder::new("proofgate/a/v1");
        a.str(1, "x");
        let mut b = CanonicalEncoder::new("proofgate/b/v1");
        b.str(1, "x");
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let mut a = CanonicalEncoder::new("d");
        a.str(1, "ab").str(2, "c");
        let mut b = CanonicalEncoder::new("d");
        b.str(1, "a").str(2, "bc");
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn negative_zero_folds_into_zero() {
        let mut a = CanonicalEncoder::new("d");
        a.f64(1, 0.0);
        let mut b = CanonicalEncoder::new("d");
        b.f64(1, -0.0);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn none_differs_from_empty_string() {
        let mut a = CanonicalEncoder::new("d");
        a.opt_str(1, None);
        let mut b = CanonicalEncoder::new("d");
        b.opt_str(1, Some(""));
        assert_ne!(a.digest(), b.digest());
    }

    proptest! {
        #[test]
        fn encoding_is_deterministic(s in ".{0,40}", n in any::<u64>(), f in -1.0e6f64..1.0e6) {
            let mut a = CanonicalEncoder::new("prop");
            a.str(1, &s).u64(2, n).f64(3, f);
            let mut b = CanonicalEncoder::new("prop");
            b.str(1, &s).u64(2, n).f64(3, f);
            prop_assert_eq!(a.finish(), b.finish());
        }
    }
}
