//! Structural checks on incoming item payloads.
//!
//! Pure functions: they never look at the store, so an unknown id passes here
//! and fails later as not-found.

use labregister_core::{ItemId, RegisterError, RegisterResult};

use crate::item::ItemDraft;

/// Check a draft destined for creation.
pub fn validate_create(draft: &ItemDraft) -> RegisterResult<()> {
    validate_content(draft)
}

/// Check a draft destined for updating the item at `target`.
///
/// The body must carry the same id as the path.
pub fn validate_update(target: &ItemId, draft: &ItemDraft) -> RegisterResult<()> {
    match &draft.id {
        Some(id) if id == target => {}
        Some(id) => {
            return Err(RegisterError::validation(format!(
                "item id mismatch (path: {target}, body: {id})"
            )));
        }
        None => {
            return Err(RegisterError::validation(format!(
                "item id missing from body (path: {target})"
            )));
        }
    }
    validate_content(draft)
}

fn validate_content(draft: &ItemDraft) -> RegisterResult<()> {
    if draft.name.trim().is_empty() {
        return Err(RegisterError::validation("name cannot be blank"));
    }
    if draft.attributes.keys().any(|k| k.trim().is_empty()) {
        return Err(RegisterError::validation("attribute keys cannot be blank"));
    }
    Ok(())
}
