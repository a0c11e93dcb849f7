//! Core types shared by every layer: configuration, errors and response models.

pub mod config;
pub mod error;
pub mod models;
