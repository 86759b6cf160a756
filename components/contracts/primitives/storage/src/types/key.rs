use fp_core::crypto::Address32;
use std::convert::TryFrom;

/// A fixed-width, order-preserving key encoding.
///
/// Byte order of encoded keys equals the natural order of the keys, so a
/// prefix scan returns entries sorted by key.
pub trait StorageKey: Sized {
    /// Width of the encoding in bytes.
    const LEN: usize;

    fn encode_key(&self) -> Vec<u8>;

    fn decode_key(raw: &[u8]) -> Option<Self>;
}

impl StorageKey for u64 {
    const LEN: usize = 8;

    fn encode_key(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn decode_key(raw: &[u8]) -> Option<Self> {
        let mut buf = [0u8; 8];
        if raw.len() != Self::LEN {
            return None;
        }
        buf.copy_from_slice(raw);
        Some(u64::from_be_bytes(buf))
    }
}

impl StorageKey for u32 {
    const LEN: usize = 4;

    fn encode_key(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn decode_key(raw: &[u8]) -> Option<Self> {
        let mut buf = [0u8; 4];
        if raw.len() != Self::LEN {
            return None;
        }
        buf.copy_from_slice(raw);
        Some(u32::from_be_bytes(buf))
    }
}

impl StorageKey for Address32 {
    const LEN: usize = 32;

    fn encode_key(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }

    fn decode_key(raw: &[u8]) -> Option<Self> {
        Address32::try_from(raw).ok()
    }
}

impl<A: StorageKey, B: StorageKey> StorageKey for (A, B) {
    const LEN: usize = A::LEN + B::LEN;

    fn encode_key(&self) -> Vec<u8> {
        [self.0.encode_key(), self.1.encode_key()].concat()
    }

    fn decode_key(raw: &[u8]) -> Option<Self> {
        if raw.len() != Self::LEN {
            return None;
        }
        let a = A::decode_key(&raw[..A::LEN])?;
        let b = B::decode_key(&raw[A::LEN..])?;
        Some((a, b))
    }
}
