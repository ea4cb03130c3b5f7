use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use labregister_core::{Entity, ItemId};

/// Free-form item attributes.
///
/// Keys must be non-blank; values are unconstrained. A sorted map keeps
/// equality order-independent and serialization stable.
pub type Attributes = BTreeMap<String, String>;

/// Request payload for creating or updating an item.
///
/// `id` is ignored on create and must match the target id on update. Missing
/// fields deserialize to empty values so they surface as validation errors
/// rather than decode failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Immutable point-in-time snapshot of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVersion {
    version_number: u64,
    name: String,
    attributes: Attributes,
    version_date: DateTime<Utc>,
}

impl ItemVersion {
    fn capture(item: &Item) -> Self {
        Self {
            version_number: item.version_number,
            name: item.name.clone(),
            attributes: item.attributes.clone(),
            version_date: item.last_update_date,
        }
    }

    pub fn version_number(&self) -> u64 {
        self.version_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn version_date(&self) -> DateTime<Utc> {
        self.version_date
    }
}

/// A registered item: current state plus its version history.
///
/// Equality compares `id`, `name` and `attributes` only. Dates, version
/// number and history are bookkeeping and never take part in change detection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    name: String,
    attributes: Attributes,
    creation_date: DateTime<Utc>,
    last_update_date: DateTime<Utc>,
    version_number: u64,
    // Most recent first.
    #[serde(skip)]
    history: VecDeque<ItemVersion>,
}

impl Item {
    /// Build a freshly created item at version 1.
    pub(crate) fn create(
        id: ItemId,
        name: String,
        attributes: Attributes,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut item = Self {
            id,
            name,
            attributes,
            creation_date: created_at,
            last_update_date: created_at,
            version_number: 0,
            history: VecDeque::new(),
        };
        item.snapshot();
        item
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn last_update_date(&self) -> DateTime<Utc> {
        self.last_update_date
    }

    pub fn version_number(&self) -> u64 {
        self.version_number
    }

    /// Version history, most recent first.
    pub fn versions(&self) -> impl ExactSizeIterator<Item = &ItemVersion> {
        self.history.iter()
    }

    /// Whether replacing the content with `name`/`attributes` would produce a
    /// different item.
    pub fn differs_from(&self, name: &str, attributes: &Attributes) -> bool {
        self.content() != (&self.id, name, attributes)
    }

    /// Replace name and attributes wholesale and record a new version.
    ///
    /// `at` is clamped to land strictly after the previous update so version
    /// dates stay strictly ordered.
    pub(crate) fn revise(&mut self, name: String, attributes: Attributes, at: DateTime<Utc>) {
        let floor = self.last_update_date + Duration::microseconds(1);
        self.name = name;
        self.attributes = attributes;
        self.last_update_date = at.max(floor);
        self.snapshot();
    }

    fn snapshot(&mut self) {
        self.version_number += 1;
        let version = ItemVersion::capture(self);
        self.history.push_front(version);
    }

    fn content(&self) -> (&ItemId, &str, &Attributes) {
        (&self.id, &self.name, &self.attributes)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.content() == other.content()
    }
}

impl Eq for Item {}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version_number
    }
}
