//! Contracts Module
//!
//! Wire shapes exchanged with callers: the analysis request, the analysis
//! result returned by the upstream model, and the error payload.

pub mod analysis;
pub mod common;

pub use analysis::*;
pub use common::*;
