use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{convert::TryFrom, fmt, str::FromStr};

/// An opaque 32-byte account identifier.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Default, Hash)]
pub struct Address32([u8; 32]);

impl Address32 {
    /// Deterministic address of a module-owned account.
    ///
    /// Nobody holds a key for it, so only the module logic can move its funds.
    pub fn from_module_name(name: &str) -> Self {
        let mut data = [0u8; 32];
        data.copy_from_slice(&Sha256::digest(name.as_bytes())[..]);
        Address32(data)
    }

    pub fn from_bytes(data: [u8; 32]) -> Self {
        Address32(data)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl AsRef<[u8]> for Address32 {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl<'a> TryFrom<&'a [u8]> for Address32 {
    type Error = ();
    fn try_from(x: &'a [u8]) -> Result<Address32, ()> {
        if x.len() == 32 {
            let mut r = Address32::default();
            r.0.copy_from_slice(x);
            Ok(r)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Address32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Address32({})", hex::encode(self.0))
    }
}

impl FromStr for Address32 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| format!("invalid address {}: {}", s, e))?;
        Address32::try_from(bytes.as_slice())
            .map_err(|_| format!("invalid address length: {}", bytes.len()))
    }
}

impl Serialize for Address32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address32::from_str(&s).map_err(de::Error::custom)
    }
}

/// Some way of identifying an account on the chain.
pub type Address = Address32;

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::{RngCore, SeedableRng};
    use rand_chacha::ChaChaRng;

    #[test]
    fn text_form_round_trips() {
        let mut prng = ChaChaRng::seed_from_u64(7);
        let mut data = [0u8; 32];
        prng.fill_bytes(&mut data);
        let addr = Address32::from_bytes(data);

        let s = addr.to_string();
        assert_eq!(s.len(), 64);
        assert_eq!(s.parse::<Address32>().unwrap(), addr);
        assert_eq!(format!("0x{}", s).parse::<Address32>().unwrap(), addr);

        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(serde_json::from_str::<Address32>(&json).unwrap(), addr);
    }

    #[test]
    fn module_addresses_are_stable_and_distinct() {
        let a = Address32::from_module_name("distribution");
        assert_eq!(a, Address32::from_module_name("distribution"));
        assert_ne!(a, Address32::from_module_name("fee_collector"));
        assert!("abcd".parse::<Address32>().is_err());
    }
}
