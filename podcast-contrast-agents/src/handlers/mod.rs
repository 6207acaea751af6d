//! Request Handlers
//!
//! Transport-independent handlers. The HTTP service and tests drive them with
//! a method and a raw body and get back a status plus a JSON body.

pub mod analyze;

pub use analyze::*;
