//! Automation Codec
//!
//! Pure, stateless encode/decode functions for the byte payloads stored by
//! the automation registry. Nothing here touches the network.
//!
//! This crate provides:
//! - [`sub_storage`]: the registry ABI (`StrategySub`, `Subscribe`, `UpdateData`,
//!   `getSub`) and the canonical content hash
//! - [`trigger`]: trigger payload layouts, one per trigger kind
//! - [`subdata`]: subData word layouts, one per strategy family
//! - [`words`]: 32-byte word helpers shared by the subData layouts
//! - [`numeric`]: fixed-point → decimal conversion under an explicit [`NumericFormat`]
//!
//! # Example
//!
//! ```ignore
//! use automation_codec::trigger::RatioTrigger;
//! use automation_codec::numeric::{ratio_to_percent, NumericFormat};
//!
//! let trigger = RatioTrigger::decode_from(&sub.trigger_data)?;
//! let percent = ratio_to_percent(trigger.ratio, &NumericFormat::default())?;
//! ```

pub mod error;
pub mod numeric;
pub mod sub_storage;
pub mod subdata;
pub mod trigger;
pub mod words;

pub use error::{CodecError, CodecResult};
pub use numeric::{NumericFormat, Rounding};
pub use sub_storage::{content_hash, StrategySub};
pub use trigger::{OrderType, RatioState};
