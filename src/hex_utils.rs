//! Helpers for the `0x`-prefixed hex strings used for hashes and script args

use crate::errors::{WalletError, WalletResult};

/// Encode bytes as a lowercase `0x`-prefixed hex string
pub fn to_prefixed_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without a `0x` prefix
pub fn from_prefixed_hex(value: &str) -> WalletResult<Vec<u8>> {
    let stripped = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    hex::decode(stripped)
        .map_err(|e| WalletError::InvalidArgument(format!("Invalid hex string '{value}': {e}")))
}

/// Decode a hex string that must hold exactly 32 bytes
pub fn decode_hash32(value: &str) -> WalletResult<[u8; 32]> {
    let bytes = from_prefixed_hex(value)?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        WalletError::InvalidArgument(format!("Expected 32-byte hash, got {} bytes", b.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_roundtrip() {
        let encoded = to_prefixed_hex([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(encoded, "0xdeadbeef");
        assert_eq!(
            from_prefixed_hex(&encoded).unwrap(),
            vec![0xde, 0xad, 0xbe, 0xef]
        );
        assert_eq!(from_prefixed_hex("deadbeef").unwrap().len(), 4);
        assert!(from_prefixed_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_hex() {
        assert!(from_prefixed_hex("0xzz").is_err());
        assert!(decode_hash32("0x00").is_err());
        assert!(decode_hash32(&to_prefixed_hex([7u8; 32])).is_ok());
    }
}
