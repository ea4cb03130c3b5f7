use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use labregister_core::{Entity, ItemId, RegisterError, RegisterResult};

use crate::item::{Item, ItemDraft, ItemVersion};
use crate::validation::{validate_create, validate_update};

/// In-memory item register with per-item version history.
///
/// One store-wide lock: mutations take it in write mode, so the
/// read-compare-write of an update cannot interleave with another mutation.
/// Reads share it and always see whole items. Everything handed out is a copy.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new item stamped with the current time.
    pub fn create(&self, draft: ItemDraft) -> RegisterResult<Item> {
        self.create_at(draft, Utc::now())
    }

    /// Register a new item created at `at`.
    pub fn create_at(&self, draft: ItemDraft, at: DateTime<Utc>) -> RegisterResult<Item> {
        validate_create(&draft)?;

        let ItemDraft {
            name, attributes, ..
        } = draft;
        let item = Item::create(ItemId::new(), name, attributes, at);

        self.write().insert(item.id().clone(), item.clone());
        tracing::debug!(item_id = %item.id(), version = item.version(), "item created");

        Ok(item)
    }

    /// Replace an item's name and attributes, stamped with the current time.
    pub fn update(&self, id: &ItemId, draft: ItemDraft) -> RegisterResult<Item> {
        self.update_at(id, draft, Utc::now())
    }

    /// Replace an item's name and attributes as of `at`.
    ///
    /// A draft identical to the stored content is a no-op: the stored item is
    /// returned without a new version or date change.
    pub fn update_at(
        &self,
        id: &ItemId,
        draft: ItemDraft,
        at: DateTime<Utc>,
    ) -> RegisterResult<Item> {
        validate_update(id, &draft)?;

        let mut items = self.write();
        let item = items
            .get_mut(id)
            .ok_or_else(|| RegisterError::not_found(format!("item {id}")))?;

        if !item.differs_from(&draft.name, &draft.attributes) {
            tracing::debug!(item_id = %id, version = item.version(), "item unchanged");
            return Ok(item.clone());
        }

        item.revise(draft.name, draft.attributes, at);
        tracing::debug!(item_id = %id, version = item.version(), "item updated");

        Ok(item.clone())
    }

    /// All items, newest creation first (ties broken by id, descending).
    pub fn list(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.read().values().cloned().collect();
        items.sort_by(|a, b| {
            b.creation_date()
                .cmp(&a.creation_date())
                .then_with(|| b.id().cmp(a.id()))
        });
        items
    }

    pub fn get(&self, id: &ItemId) -> RegisterResult<Item> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| RegisterError::not_found(format!("item {id}")))
    }

    /// Version history of an item, most recent first.
    pub fn history(&self, id: &ItemId) -> RegisterResult<Vec<ItemVersion>> {
        self.read()
            .get(id)
            .map(|item| item.versions().cloned().collect())
            .ok_or_else(|| RegisterError::not_found(format!("item {id}")))
    }

    /// Drop every item (reset hook).
    pub fn clear(&self) {
        let mut items = self.write();
        let dropped = items.len();
        items.clear();
        tracing::debug!(dropped, "store cleared");
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Mutations validate before touching the map, so a poisoned lock still
    // guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ItemId, Item>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ItemId, Item>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}
