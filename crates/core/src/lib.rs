//! `labregister-core` — shared building blocks for the register.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{RegisterError, RegisterResult};
pub use id::ItemId;
