//! bounceban-bridge: HTTP endpoints that translate workflow-automation requests into
//! BounceBan email verification API calls and reshape the answers into a stable schema.

pub mod core;
pub mod logging;
pub mod provider;
pub mod service;
pub mod utils;
pub mod verification;

pub use crate::core::config::{Config, ConfigBuilder};
pub use crate::core::error::{AppError, Result, ValidationError};
pub use crate::core::models::{Envelope, OutcomeStatus};
pub use crate::provider::BounceBanClient;
pub use crate::service::{router, AppState};
pub use crate::verification::Verifier;
