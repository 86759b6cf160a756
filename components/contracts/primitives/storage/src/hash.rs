use sha2::{Digest, Sha256 as Sha2_256};

/// Hasher to use to hash storage prefixes.
pub trait StorageHasher: 'static {
    type Output: AsRef<[u8]>;
    fn hash(x: &[u8]) -> Self::Output;
}

/// Hash storage keys with `sha256`.
pub struct Sha256;

impl StorageHasher for Sha256 {
    type Output = [u8; 32];

    fn hash(x: &[u8]) -> Self::Output {
        let mut output = [0u8; 32];
        output.copy_from_slice(&Sha2_256::digest(x)[..]);
        output
    }
}
