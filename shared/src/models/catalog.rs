use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ranking::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    Items,
    Enemies,
}

impl CatalogKind {
    /// Prefix of the label used when an id is missing from the catalog
    pub fn fallback_prefix(&self) -> &'static str {
        match self {
            CatalogKind::Items => "Item",
            CatalogKind::Enemies => "Enemy",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Items => f.write_str("items"),
            CatalogKind::Enemies => f.write_str("enemies"),
        }
    }
}

/// Presentation data for one item or enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub name: String,
    pub image_url: String,
}

/// Id -> display name mapping. Used for labels only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub kind: CatalogKind,
    pub names: HashMap<ItemId, String>,
    /// Image URL pattern; `{id}` and `{name}` are substituted
    pub image_template: String,
}

impl Catalog {
    pub fn new(kind: CatalogKind, image_template: impl Into<String>) -> Self {
        Self {
            kind,
            names: HashMap::new(),
            image_template: image_template.into(),
        }
    }

    pub fn with_names(mut self, names: HashMap<ItemId, String>) -> Self {
        self.names = names;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display info for an id, falling back to "{Kind} {id}" when unknown
    pub fn lookup(&self, id: &ItemId) -> DisplayInfo {
        let name = self
            .names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("{} {}", self.kind.fallback_prefix(), id));

        let image_url = self
            .image_template
            .replace("{id}", id.as_str())
            .replace("{name}", &urlencoding::encode(&name));

        DisplayInfo { name, image_url }
    }
}
