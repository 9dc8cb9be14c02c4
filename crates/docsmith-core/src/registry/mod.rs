//! Read-only index of documented entities
//!
//! The registry is built once upstream (by whatever walks the source tree)
//! and is treated as an immutable snapshot for the lifetime of a generation
//! run. It answers existence and lookup questions by qualified name for the
//! type parser and the reference resolver.

mod name;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slug::NAMESPACE_SEPARATOR;

pub use name::{join_namespace, owning_namespace, strip_root, MemberName};

/// Errors that can occur when loading a registry snapshot.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse registry snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("method '{0}' has no scope")]
    MissingScope(String),
}

/// Kind of documented entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Root,
    Module,
    Class,
    Constant,
    Method,
}

/// Method scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Class,
    Instance,
}

/// Declared visibility of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A single entity in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    /// What kind of entity this is
    pub kind: EntityKind,
    /// Qualified path of the owning namespace (empty for top-level entities)
    #[serde(default)]
    pub namespace: String,
    /// Entity name within its namespace
    #[serde(default)]
    pub name: String,
    /// Method scope (methods only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    /// Declared visibility
    #[serde(default)]
    pub visibility: Visibility,
    /// Whether a method is a generated attribute reader or writer
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub attribute: bool,
}

impl Entity {
    fn new(kind: EntityKind, namespace: &str, name: &str, scope: Option<Scope>) -> Self {
        Self {
            kind,
            namespace: strip_root(namespace).to_string(),
            name: name.to_string(),
            scope,
            visibility: Visibility::Public,
            attribute: false,
        }
    }

    /// The root namespace
    pub fn root() -> Self {
        Self::new(EntityKind::Root, "", "", None)
    }

    /// A module named `name` inside `namespace`
    pub fn module(namespace: &str, name: &str) -> Self {
        Self::new(EntityKind::Module, namespace, name, None)
    }

    /// A class named `name` inside `namespace`
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::new(EntityKind::Class, namespace, name, None)
    }

    /// A constant named `name` inside `namespace`
    pub fn constant(namespace: &str, name: &str) -> Self {
        Self::new(EntityKind::Constant, namespace, name, None)
    }

    /// A class-scope method
    pub fn class_method(namespace: &str, name: &str) -> Self {
        Self::new(EntityKind::Method, namespace, name, Some(Scope::Class))
    }

    /// An instance-scope method
    pub fn instance_method(namespace: &str, name: &str) -> Self {
        Self::new(EntityKind::Method, namespace, name, Some(Scope::Instance))
    }

    /// Mark a method as an attribute accessor
    #[must_use]
    pub fn attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    /// Set the visibility
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Full qualified path, using `.` for class methods and `#` for
    /// instance methods.
    pub fn qualified_path(&self) -> String {
        match (self.kind, self.scope) {
            (EntityKind::Root, _) => String::new(),
            (EntityKind::Method, Some(Scope::Class)) => format!("{}.{}", self.namespace, self.name),
            (EntityKind::Method, _) => format!("{}#{}", self.namespace, self.name),
            _ => join_namespace(&self.namespace, &self.name),
        }
    }

    fn key(&self) -> Option<LookupKey> {
        let class = match (self.kind, self.scope) {
            (EntityKind::Root, _) => return None,
            (EntityKind::Module | EntityKind::Class, _) => KeyClass::Definition,
            (EntityKind::Constant, _) => KeyClass::Constant,
            (EntityKind::Method, Some(Scope::Class)) => KeyClass::ClassMethod,
            (EntityKind::Method, _) => KeyClass::InstanceMethod,
        };
        Some(LookupKey::new(class, &self.namespace, &self.name))
    }
}

/// Lookup category; classes and modules share one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyClass {
    Definition,
    Constant,
    ClassMethod,
    InstanceMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    class: KeyClass,
    namespace: String,
    name: String,
}

impl LookupKey {
    fn new(class: KeyClass, namespace: &str, name: &str) -> Self {
        Self {
            class,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    entities: Vec<Entity>,
}

/// Indexed, read-only collection of known entities
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<Entity>,
    /// Structural key -> index into `entities`; the first entity with a key wins
    index: HashMap<LookupKey, usize>,
}

impl Registry {
    /// Build a registry from an ordered collection of entities
    pub fn new(mut entities: Vec<Entity>) -> Self {
        for entity in &mut entities {
            if let Some(namespace) = entity.namespace.strip_prefix(NAMESPACE_SEPARATOR) {
                entity.namespace = namespace.to_string();
            }
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if let Some(key) = entity.key() {
                index.entry(key).or_insert(i);
            }
        }
        Self { entities, index }
    }

    /// Parse a registry from a JSON snapshot (`{ "entities": [...] }`).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an entity is invalid.
    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        if let Some(method) = snapshot
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Method && e.scope.is_none())
        {
            return Err(RegistryError::MissingScope(method.qualified_path()));
        }
        tracing::debug!(entities = snapshot.entities.len(), "loaded registry snapshot");
        Ok(Self::new(snapshot.entities))
    }

    /// Load a registry from a JSON snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the registry as a JSON snapshot
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Snapshot {
            entities: self.entities.clone(),
        })
    }

    /// Drop private entities unless `include_private` is set
    pub fn retain_visible(self, include_private: bool) -> Self {
        if include_private {
            return self;
        }
        self.entities
            .into_iter()
            .filter(|e| e.visibility != Visibility::Private)
            .collect()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all entities in their original order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    fn get(&self, class: KeyClass, namespace: &str, name: &str) -> Option<&Entity> {
        self.index
            .get(&LookupKey::new(class, namespace, name))
            .map(|&i| &self.entities[i])
    }

    /// Find a class method by any of its spellings.
    ///
    /// `Space::Cosmos.boot`, `Space::Cosmos::boot` (legacy), `.boot` and
    /// `::boot` (top level) are all accepted.
    pub fn find_class_method(&self, qualified: &str) -> Option<&Entity> {
        let member = MemberName::class_method(qualified)?;
        self.get(KeyClass::ClassMethod, member.namespace, member.name)
    }

    /// Find an instance method (`Space::Cosmos#spin`, `#spin`)
    pub fn find_instance_method(&self, qualified: &str) -> Option<&Entity> {
        let member = MemberName::instance_method(qualified)?;
        self.get(KeyClass::InstanceMethod, member.namespace, member.name)
    }

    /// Find a constant (`Space::MAX`, `MAX`)
    pub fn find_constant(&self, qualified: &str) -> Option<&Entity> {
        let member = MemberName::constant(qualified)?;
        self.get(KeyClass::Constant, member.namespace, member.name)
    }

    /// Find a class or module by qualified path
    pub fn find_definition(&self, qualified: &str) -> Option<&Entity> {
        let qualified = strip_root(qualified);
        let (namespace, name) = match qualified.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => (&qualified[..idx], &qualified[idx + NAMESPACE_SEPARATOR.len()..]),
            None => ("", qualified),
        };
        if name.is_empty() {
            return None;
        }
        self.get(KeyClass::Definition, namespace, name)
    }

    /// Whether a class method exists
    pub fn lookup_class_method(&self, qualified: &str) -> bool {
        self.find_class_method(qualified).is_some()
    }

    /// Whether an instance method exists
    pub fn lookup_instance_method(&self, qualified: &str) -> bool {
        self.find_instance_method(qualified).is_some()
    }

    /// Whether a constant exists
    pub fn lookup_constant(&self, qualified: &str) -> bool {
        self.find_constant(qualified).is_some()
    }

    /// Whether a class or module exists
    pub fn lookup_definition(&self, qualified: &str) -> bool {
        self.find_definition(qualified).is_some()
    }
}

impl FromIterator<Entity> for Registry {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_registry() -> Registry {
        Registry::new(vec![
            Entity::root(),
            Entity::module("", "Space"),
            Entity::class("Space", "Cosmos"),
            Entity::constant("Space::Cosmos", "MAX_STARS"),
            Entity::class_method("Space::Cosmos", "reboot_cosmos"),
            Entity::instance_method("Space::Cosmos", "spin"),
            Entity::instance_method("Space::Cosmos", "name").attribute(),
            Entity::class_method("", "boot"),
        ])
    }

    #[test]
    fn test_lookup_definition() {
        let registry = space_registry();
        assert!(registry.lookup_definition("Space"));
        assert!(registry.lookup_definition("Space::Cosmos"));
        assert!(registry.lookup_definition("::Space::Cosmos"));
        assert!(!registry.lookup_definition("Cosmos"));
    }

    #[test]
    fn test_lookup_class_method_spellings() {
        let registry = space_registry();
        assert!(registry.lookup_class_method("Space::Cosmos.reboot_cosmos"));
        assert!(registry.lookup_class_method("Space::Cosmos::reboot_cosmos"));
        assert!(registry.lookup_class_method(".boot"));
        assert!(registry.lookup_class_method("::boot"));
        assert!(!registry.lookup_class_method("Space::Cosmos.spin"));
    }

    #[test]
    fn test_lookup_instance_method() {
        let registry = space_registry();
        assert!(registry.lookup_instance_method("Space::Cosmos#spin"));
        assert!(!registry.lookup_instance_method("Space::Cosmos#reboot_cosmos"));
        let name = registry.find_instance_method("Space::Cosmos#name").unwrap();
        assert!(name.attribute);
    }

    #[test]
    fn test_lookup_constant() {
        let registry = space_registry();
        assert!(registry.lookup_constant("Space::Cosmos::MAX_STARS"));
        assert!(!registry.lookup_constant("MAX_STARS"));
    }

    #[test]
    fn test_qualified_path() {
        let registry = space_registry();
        let paths: Vec<String> = registry.iter().map(Entity::qualified_path).collect();
        assert!(paths.contains(&"Space::Cosmos.reboot_cosmos".to_string()));
        assert!(paths.contains(&"Space::Cosmos#spin".to_string()));
        assert!(paths.contains(&"Space::Cosmos::MAX_STARS".to_string()));
        assert!(paths.contains(&".boot".to_string()));
    }

    #[test]
    fn test_retain_visible() {
        let registry = Registry::new(vec![
            Entity::class("", "Cosmos"),
            Entity::instance_method("Cosmos", "secret").with_visibility(Visibility::Private),
        ]);
        assert!(registry.clone().retain_visible(true).lookup_instance_method("Cosmos#secret"));
        let public = registry.retain_visible(false);
        assert!(!public.lookup_instance_method("Cosmos#secret"));
        assert_eq!(public.len(), 1);
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"{
            "entities": [
                { "kind": "class", "name": "Cosmos" },
                { "kind": "method", "namespace": "Cosmos", "name": "spin", "scope": "instance" },
                { "kind": "method", "namespace": "Cosmos", "name": "size", "scope": "class",
                  "visibility": "protected", "attribute": true }
            ]
        }"#;
        let registry = Registry::from_json(json).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.lookup_instance_method("Cosmos#spin"));
        assert!(registry.find_class_method("Cosmos.size").unwrap().attribute);

        let reloaded = Registry::from_json(&registry.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn test_json_rooted_namespaces() {
        let json = r#"{
            "entities": [
                { "kind": "module", "name": "Space" },
                { "kind": "class", "namespace": "::Space", "name": "Cosmos" },
                { "kind": "method", "namespace": "::Space::Cosmos", "name": "spin",
                  "scope": "instance" }
            ]
        }"#;
        let registry = Registry::from_json(json).unwrap();
        assert!(registry.lookup_definition("Space::Cosmos"));
        assert!(registry.lookup_instance_method("Space::Cosmos#spin"));
        assert!(registry.lookup_instance_method("::Space::Cosmos#spin"));
    }

    #[test]
    fn test_json_rejects_method_without_scope() {
        let json = r#"{ "entities": [ { "kind": "method", "namespace": "Cosmos", "name": "spin" } ] }"#;
        let err = Registry::from_json(json).unwrap_err();
        assert!(matches!(&err, RegistryError::MissingScope(name) if name == "Cosmos#spin"));
    }

    #[test]
    fn test_collect_into_registry() {
        let registry: Registry = ["Space", "Time"]
            .into_iter()
            .map(|name| Entity::module("", name))
            .collect();
        assert_eq!(registry.len(), 2);
        assert!(registry.lookup_definition("Time"));
    }

    #[test]
    fn test_json_rejects_unknown_kind() {
        let json = r#"{ "entities": [ { "kind": "widget", "name": "X" } ] }"#;
        assert!(matches!(Registry::from_json(json), Err(RegistryError::Json(_))));
    }
}
