use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while decoding or encoding subscription payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("missing {what} at index {index}")]
    Missing { what: &'static str, index: usize },

    #[error("abi decode failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("subData word {index} is not a valid {expected}")]
    InvalidWord { index: usize, expected: &'static str },

    #[error("unknown ratio state {0}")]
    UnknownRatioState(u8),

    #[error("unknown order type {0}")]
    UnknownOrderType(u8),

    #[error("value {value} does not fit a decimal with scale {scale}")]
    DecimalOverflow { value: String, scale: u32 },
}
