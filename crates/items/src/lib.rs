//! Item register domain module (versioned, in-memory).
//!
//! This crate contains the versioning and change-detection rules for items,
//! implemented as synchronous in-memory logic (no IO, no HTTP).

pub mod item;
pub mod store;
pub mod validation;

pub use item::{Attributes, Item, ItemDraft, ItemVersion};
pub use store::ItemStore;
pub use validation::{validate_create, validate_update};
