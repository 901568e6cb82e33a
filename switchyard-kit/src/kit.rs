use crate::catalog::ComponentCatalog;
use crate::config::{RouteKind, RoutingConfig};
use switchyard::{Contract, InstanceRouting, RouteError};
use thiserror::Error;

/// Errors returned by `switchyard-kit`.
#[derive(Debug, Error)]
pub enum KitError {
    /// The configuration could not be decoded.
    #[error("config decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configuration is inconsistent.
    #[error("invalid routing config: {0}")]
    Invalid(String),
    /// A component entry names an implementation missing from the catalog.
    #[error("no implementation {implementation} for key {key}")]
    UnknownImplementation {
        /// Entry key.
        key: String,
        /// Implementation name that was looked up.
        implementation: String,
    },
    /// The routing table rejected a setup call.
    #[error("routing error: {0}")]
    Route(#[from] RouteError),
}

/// Build a routing table from `config`, taking component implementations
/// from `catalog`.
///
/// Entries are registered in order, then the start key is set if the
/// configuration names one.
pub fn build_routing<C: Contract>(
    config: &RoutingConfig,
    catalog: &ComponentCatalog<C>,
) -> Result<InstanceRouting<C>, KitError> {
    let mut routing = InstanceRouting::<C>::new().with_options(config.options)?;

    for entry in &config.entries {
        match &entry.kind {
            RouteKind::Component { .. } => {
                let implementation = entry.implementation().unwrap_or(entry.key.as_str());
                let component = catalog.get(implementation).ok_or_else(|| {
                    KitError::UnknownImplementation {
                        key: entry.key.to_string(),
                        implementation: implementation.to_owned(),
                    }
                })?;
                routing.add_default_component(entry.key.clone(), component)?;
            }
            RouteKind::Sequence { subkeys } => {
                routing.add_default_sequence(entry.key.clone(), subkeys.iter().cloned())?;
            }
        }
    }

    if let Some(start) = &config.start {
        routing.set_default_start(start.clone())?;
    }

    tracing::debug!(
        entries = config.entries.len(),
        start = ?config.start,
        "routing table built"
    );
    Ok(routing)
}
