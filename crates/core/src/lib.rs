//! Core types for the support agent
//!
//! This crate provides foundational types used across all other crates:
//! - Error types
//! - Conversation types

pub mod conversation;
pub mod error;

pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
