//! 32-byte word helpers.
//!
//! subData is a `bytes32[]`; every element holds one ABI-encoded static value
//! (`abi.encode(x)` for a single `uint`, `address`, `bool`, `uint8`, `uint16`).
//! Decoding is strict: padding bytes must be zero, booleans must be 0 or 1.

use alloy_primitives::{Address, B256, U256};

use crate::error::{CodecError, CodecResult};

/// Fetch word `index`, or fail with a `Missing` error.
pub fn word(words: &[B256], index: usize) -> CodecResult<&B256> {
    words.get(index).ok_or(CodecError::Missing {
        what: "subData word",
        index,
    })
}

pub fn read_u256(words: &[B256], index: usize) -> CodecResult<U256> {
    Ok(U256::from_be_bytes(word(words, index)?.0))
}

pub fn read_address(words: &[B256], index: usize) -> CodecResult<Address> {
    let w = word(words, index)?;
    if w[..12].iter().any(|b| *b != 0) {
        return Err(CodecError::InvalidWord {
            index,
            expected: "address",
        });
    }
    Ok(Address::from_word(*w))
}

pub fn read_bool(words: &[B256], index: usize) -> CodecResult<bool> {
    match read_u256(words, index)? {
        v if v.is_zero() => Ok(false),
        v if v == U256::from(1u8) => Ok(true),
        _ => Err(CodecError::InvalidWord {
            index,
            expected: "bool",
        }),
    }
}

pub fn read_u8(words: &[B256], index: usize) -> CodecResult<u8> {
    u8::try_from(read_u256(words, index)?).map_err(|_| CodecError::InvalidWord {
        index,
        expected: "uint8",
    })
}

pub fn read_u16(words: &[B256], index: usize) -> CodecResult<u16> {
    u16::try_from(read_u256(words, index)?).map_err(|_| CodecError::InvalidWord {
        index,
        expected: "uint16",
    })
}

pub fn u256_word(value: U256) -> B256 {
    B256::from(value)
}

pub fn address_word(value: Address) -> B256 {
    value.into_word()
}

pub fn bool_word(value: bool) -> B256 {
    u256_word(U256::from(value as u8))
}

pub fn small_word(value: u64) -> B256 {
    u256_word(U256::from(value))
}
