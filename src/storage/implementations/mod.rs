//! Storage implementations
//!
//! - `memory` - in-memory stores (default, no persistence)
//! - `json` - flat-file persisted collections

pub mod json;
pub mod memory;
