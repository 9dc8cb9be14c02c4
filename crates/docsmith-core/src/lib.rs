//! Docsmith Core - semantic resolution for documentation generation
//!
//! This crate turns the textual annotations of an indexed source tree into
//! structured, serializable records:
//! - Registry: read-only index of classes, modules, constants and methods
//! - Types: parser for type lists such as `Hash{Symbol=>Array<String>}`
//! - References: classification and resolution of `@see` tags
//! - Config: `docsmith.toml` settings
//! - Batch: parallel fan-out over a shared registry snapshot
//!
//! ```
//! use docsmith_core::{Entity, ReferenceResolver, Registry, SeeTag};
//!
//! let registry = Registry::new(vec![
//!     Entity::class("Space", "Cosmos"),
//!     Entity::class_method("Space::Cosmos", "reboot_cosmos"),
//! ]);
//! let resolver = ReferenceResolver::new(&registry);
//! let see = resolver.resolve(&SeeTag::new(".reboot_cosmos"), "Space::Cosmos");
//! assert_eq!(see.path.as_deref(), Some("#class-method-reboot-cosmos"));
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Batch module - parallel parsing and resolution
pub mod batch;

/// Configuration module - `docsmith.toml` settings
pub mod config;

/// Reference module - see-tag classification and resolution
pub mod reference;

/// Registry module - indexed entity lookups
pub mod registry;

/// Slug module - page paths and anchors
pub mod slug;

/// Types module - type list parsing
pub mod types;

pub use batch::{BatchError, BatchRunner, TagSite};
pub use config::{BatchConfig, ConfigError, DocConfig, ReferenceConfig, CONFIG_FILE};
pub use reference::{
    classify, Classifier, ReferenceDescriptor, ReferenceKind, ReferenceResolver, ReferenceTarget,
    SeeTag,
};
pub use registry::{Entity, EntityKind, Registry, RegistryError, Scope, Visibility};
pub use types::{format_type_list, parse_types, ParseError, TypeNode, TypeNodeKind, TypeParser};
