//! Request pipeline shared by every operation.

pub mod classifier;
pub mod content;
pub mod credentials;
pub mod normalize;
pub mod operations;
pub mod poll;
pub mod validator;

pub use operations::{payload_from, respond, Verifier};
