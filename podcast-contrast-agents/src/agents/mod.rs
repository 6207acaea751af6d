//! Contrast Agent
//!
//! - `prompt`: the fixed analysis prompt
//! - `contrast`: validation, the provider call and reply parsing

pub mod contrast;
pub mod prompt;

pub use contrast::*;
pub use prompt::*;
