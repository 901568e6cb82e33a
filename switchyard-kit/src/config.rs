//! Decoded routing configuration.

use crate::kit::KitError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use switchyard::{ComponentKey, RoutingOptions};

/// Which keys exist in a routing table, and where calls start.
///
/// Entries are registered in order, so `keys()` on the built table follows
/// the order they appear here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Routing-table entries, in registration order.
    #[serde(default)]
    pub entries: Vec<RouteEntry>,
    /// Key every call starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ComponentKey>,
    /// Routing-table tunables.
    #[serde(default)]
    pub options: RoutingOptions,
}

/// One key of the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// The key being declared.
    pub key: ComponentKey,
    /// What the key is backed by.
    #[serde(flatten)]
    pub kind: RouteKind,
}

/// What a routing-table key is backed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    /// A component implementation looked up in a catalog.
    Component {
        /// Catalog name of the implementation. Defaults to the entry key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        implementation: Option<String>,
    },
    /// An ordered sequence of other keys.
    Sequence {
        /// Keys tried in order until one resolves.
        subkeys: Vec<ComponentKey>,
    },
}

impl RouteEntry {
    /// Entry backed by the catalog implementation named like the key.
    pub fn component(key: impl Into<ComponentKey>) -> Self {
        Self {
            key: key.into(),
            kind: RouteKind::Component {
                implementation: None,
            },
        }
    }

    /// Entry backed by the catalog implementation `implementation`.
    pub fn component_as(key: impl Into<ComponentKey>, implementation: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: RouteKind::Component {
                implementation: Some(implementation.into()),
            },
        }
    }

    /// Sequence entry over `subkeys`.
    pub fn sequence<I, K>(key: impl Into<ComponentKey>, subkeys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        Self {
            key: key.into(),
            kind: RouteKind::Sequence {
                subkeys: subkeys.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Catalog name for a component entry, `None` for sequences.
    pub fn implementation(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Component { implementation } => {
                Some(implementation.as_deref().unwrap_or(self.key.as_str()))
            }
            RouteKind::Sequence { .. } => None,
        }
    }
}

impl RoutingConfig {
    /// Decode a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, KitError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a configuration from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, KitError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add an entry (builder pattern).
    pub fn with_entry(mut self, entry: RouteEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Set the start key (builder pattern).
    pub fn with_start(mut self, start: impl Into<ComponentKey>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Check that keys are unique, that every subkey and the start key
    /// name a declared entry, and that the options are usable.
    ///
    /// `build_routing` does not require this: unknown subkeys are otherwise
    /// reported when the sequence first runs.
    pub fn validate(&self) -> Result<(), KitError> {
        self.options
            .validate()
            .map_err(|e| KitError::Invalid(e.to_string()))?;
        let mut declared = HashSet::new();
        for entry in &self.entries {
            if !declared.insert(&entry.key) {
                return Err(KitError::Invalid(format!("duplicate entry {}", entry.key)));
            }
        }
        for entry in &self.entries {
            if let RouteKind::Sequence { subkeys } = &entry.kind {
                if let Some(missing) = subkeys.iter().find(|k| !declared.contains(k)) {
                    return Err(KitError::Invalid(format!(
                        "sequence {} refers to undeclared key {missing}",
                        entry.key
                    )));
                }
            }
        }
        if let Some(start) = &self.start {
            if !declared.contains(start) {
                return Err(KitError::Invalid(format!(
                    "start key {start} is not declared"
                )));
            }
        }
        Ok(())
    }
}
