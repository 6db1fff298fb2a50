use std::fmt::{Display, Formatter};

use ckb_hash::blake2b_256;
use ckb_types::{packed, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{WalletError, WalletResult},
    hex_utils::{decode_hash32, from_prefixed_hex, to_prefixed_hex},
};

/// How a script's `code_hash` is matched against deployed code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptHashType {
    Data = 0,
    Type = 1,
}

impl ScriptHashType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptHashType::Data => "data",
            ScriptHashType::Type => "type",
        }
    }
}

impl TryFrom<&str> for ScriptHashType {
    type Error = WalletError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "data" => Ok(ScriptHashType::Data),
            "type" => Ok(ScriptHashType::Type),
            other => Err(WalletError::ConversionError(format!(
                "Unknown script hash type: {other}"
            ))),
        }
    }
}

impl Display for ScriptHashType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Script descriptor guarding a cell.
///
/// `code_hash` and every entry of `args` are `0x`-prefixed hex strings. On
/// chain the entries are concatenated into the script's single `args` byte
/// string. For the default secp256k1 lock the first argument is the owner's
/// blake160 public-key hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script {
    pub code_hash: String,
    pub hash_type: ScriptHashType,
    pub args: Vec<String>,
}

impl Script {
    pub fn new(code_hash: String, hash_type: ScriptHashType, args: Vec<String>) -> Self {
        Self {
            code_hash,
            hash_type,
            args,
        }
    }

    /// First script argument, if any
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Packed on-chain form of the script
    pub fn to_packed(&self) -> WalletResult<packed::Script> {
        let code_hash = decode_hash32(&self.code_hash)?;
        let mut args = Vec::new();
        for arg in &self.args {
            args.extend(from_prefixed_hex(arg)?);
        }
        let args: packed::Bytes = args.pack();

        Ok(packed::Script::new_builder()
            .code_hash(code_hash.pack())
            .hash_type(packed::Byte::new(self.hash_type as u8))
            .args(args)
            .build())
    }

    /// Molecule encoding of the packed script
    pub fn serialize(&self) -> WalletResult<Vec<u8>> {
        Ok(self.to_packed()?.as_slice().to_vec())
    }

    /// CKB blake2b-256 digest of the serialized script, as stored in `lock_hash`
    pub fn compute_hash(&self) -> WalletResult<String> {
        Ok(to_prefixed_hex(blake2b_256(self.serialize()?)))
    }
}
