#![deny(missing_docs)]
//! Wiring kit that builds `switchyard` routing tables from decoded
//! configuration.
//!
//! This crate is intentionally "boring glue": it turns a pre-validated
//! description of which keys exist (plain components or sequences, plus an
//! optional start key) into calls against `switchyard`'s setup API.
//! Callers can always bypass it and wire an `InstanceRouting` by hand.
//!
//! ```rust,ignore
//! let config = RoutingConfig::from_json(r#"{
//!     "entries": [
//!         {"key": "continue", "kind": "component", "implementation": "pass"},
//!         {"key": "result", "kind": "component"},
//!         {"key": "driver", "kind": "sequence", "subkeys": ["continue", "result"]}
//!     ],
//!     "start": "driver"
//! }"#)?;
//!
//! let catalog = ComponentCatalog::new()
//!     .with("pass", Arc::new(PassThrough))
//!     .with("result", Arc::new(Repeater));
//!
//! let routing = build_routing(&config, &catalog)?;
//! ```

mod catalog;
mod config;
mod kit;

pub use catalog::ComponentCatalog;
pub use config::{RouteEntry, RouteKind, RoutingConfig};
pub use kit::{KitError, build_routing};
