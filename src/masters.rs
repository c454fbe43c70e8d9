//! Topic and study-mode catalogs offered by the setup form.
//!
//! Items are never deleted: they are deactivated so past sessions keep a
//! meaningful label while the item disappears from new-session choices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MasterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MasterKind {
    Topic,
    Mode,
}

impl MasterKind {
    pub fn label(&self) -> &'static str {
        match self {
            MasterKind::Topic => "Topic",
            MasterKind::Mode => "Mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterItem {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn norm_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterList {
    items: Vec<MasterItem>,
}

impl MasterList {
    pub fn from_items(items: Vec<MasterItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MasterItem] {
        &self.items
    }

    /// Items ordered by name, inactive ones included.
    pub fn sorted(&self) -> Vec<&MasterItem> {
        let mut items: Vec<&MasterItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a new active item. Names are trimmed and must be unique
    /// ignoring case.
    pub fn add(&mut self, name: &str) -> Result<&MasterItem, MasterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MasterError::EmptyName);
        }
        let key = norm_key(name);
        if self.items.iter().any(|x| norm_key(&x.name) == key) {
            return Err(MasterError::Duplicate(name.to_string()));
        }

        self.items.push(MasterItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            active: true,
            created_at: Utc::now(),
        });
        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    /// Flip the active flag of the item with `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> Option<&MasterItem> {
        let item = self.items.iter_mut().find(|x| x.id == id)?;
        item.active = !item.active;
        Some(item)
    }

    pub fn toggle_by_name(&mut self, name: &str) -> Result<&MasterItem, MasterError> {
        let key = norm_key(name);
        let item = self
            .items
            .iter_mut()
            .find(|x| norm_key(&x.name) == key)
            .ok_or_else(|| MasterError::NotFound(name.trim().to_string()))?;
        item.active = !item.active;
        Ok(item)
    }

    /// Exact-name membership among active items.
    pub fn contains_active(&self, name: &str) -> bool {
        self.items.iter().any(|x| x.active && x.name == name)
    }

    /// Active names in alphabetical order.
    pub fn active_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .items
            .iter()
            .filter(|x| x.active)
            .map(|x| x.name.clone())
            .collect();
        names.sort();
        names
    }
}
