//! See-tag resolution
//!
//! Member references (constants, class methods, instance methods) are tried
//! in three tiers:
//!
//! 1. local: a member of the tag's owner, linked with a same-page anchor
//! 2. relative: the name qualified by the owner's path
//! 3. absolute: the name taken as fully qualified
//!
//! Definitions (classes and modules) have no anchor of their own and skip
//! the local tier. Anything that cannot be found degrades to an unresolved
//! reference that still carries its label and text.

use crate::config::ReferenceConfig;
use crate::registry::{join_namespace, owning_namespace, Entity, MemberName, Registry};
use crate::slug::{slugify, slugify_path};

use super::{Classifier, ReferenceDescriptor, ReferenceKind, ReferenceTarget, SeeTag};

/// Resolves see tags against a registry snapshot
#[derive(Debug, Clone)]
pub struct ReferenceResolver<'r> {
    registry: &'r Registry,
    classifier: Classifier,
    base_path: String,
}

/// Which resolution tier produced a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Local,
    Relative,
    Absolute,
}

/// A member reference kind and the registry query that backs it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Constant,
    ClassMethod,
    InstanceMethod,
}

impl Member {
    fn target(self) -> ReferenceTarget {
        match self {
            Self::Constant => ReferenceTarget::Constant,
            Self::ClassMethod => ReferenceTarget::ClassMethod,
            Self::InstanceMethod => ReferenceTarget::InstanceMethod,
        }
    }

    fn split(self, qualified: &str) -> Option<MemberName<'_>> {
        match self {
            Self::Constant => MemberName::constant(qualified),
            Self::ClassMethod => MemberName::class_method(qualified),
            Self::InstanceMethod => MemberName::instance_method(qualified),
        }
    }

    fn find<'r>(self, registry: &'r Registry, qualified: &str) -> Option<&'r Entity> {
        match self {
            Self::Constant => registry.find_constant(qualified),
            Self::ClassMethod => registry.find_class_method(qualified),
            Self::InstanceMethod => registry.find_instance_method(qualified),
        }
    }

    /// Qualified name of member `name` of `namespace`
    fn qualify(self, namespace: &str, name: &str) -> String {
        match self {
            Self::Constant => join_namespace(namespace, name),
            Self::ClassMethod => format!("{namespace}.{name}"),
            Self::InstanceMethod => format!("{namespace}#{name}"),
        }
    }

    /// Anchor for a matched entity, switching to the attribute prefix for
    /// accessor methods
    fn anchor(self, entity: &Entity) -> (ReferenceTarget, String) {
        let target = if entity.attribute {
            self.target().as_attribute()
        } else {
            self.target()
        };
        let anchor = format!("{}-{}", target.slug(), slugify(&entity.name));
        (target, anchor)
    }
}

impl<'r> ReferenceResolver<'r> {
    /// Create a resolver with default settings
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, &ReferenceConfig::default())
    }

    /// Create a resolver from the `[references]` configuration
    pub fn with_config(registry: &'r Registry, config: &ReferenceConfig) -> Self {
        Self {
            registry,
            classifier: config.classifier(),
            base_path: config.base_path.clone(),
        }
    }

    /// Classify and resolve a see tag owned by the entity at `parent`.
    ///
    /// `parent` may be the path of a class, module, constant or method;
    /// constants and methods are treated as belonging to their namespace.
    pub fn resolve(&self, tag: &SeeTag, parent: &str) -> ReferenceDescriptor {
        let kind = self.classifier.classify(tag.raw());
        self.resolve_kind(kind, tag, parent)
    }

    /// Resolve a see tag that has already been classified as `kind`
    pub fn resolve_kind(
        &self,
        kind: ReferenceKind,
        tag: &SeeTag,
        parent: &str,
    ) -> ReferenceDescriptor {
        let raw = tag.raw();
        let parent = self.owner_scope(parent);
        let label = tag.label.clone().unwrap_or_else(|| raw.to_string());

        let (kind, text, path) = match kind {
            ReferenceKind::PlainText => (kind, tag.text.clone(), None),
            ReferenceKind::Unstructured => {
                let text = match &tag.text {
                    Some(text) => format!("{raw} {text}"),
                    None => raw.to_string(),
                };
                (kind, Some(text), None)
            }
            ReferenceKind::Link => (kind, tag.text.clone(), Some(raw.to_string())),
            ReferenceKind::Reference(target) => {
                let resolved = match target {
                    ReferenceTarget::Constant => self
                        .resolve_member(Member::Constant, raw, parent)
                        .or_else(|| self.resolve_definition(raw, parent)),
                    ReferenceTarget::Definition => self.resolve_definition(raw, parent),
                    ReferenceTarget::ClassMethod | ReferenceTarget::ClassAttribute => {
                        self.resolve_member(Member::ClassMethod, raw, parent)
                    }
                    ReferenceTarget::InstanceMethod | ReferenceTarget::InstanceAttribute => {
                        self.resolve_member(Member::InstanceMethod, raw, parent)
                    }
                    ReferenceTarget::Unresolved => None,
                };

                match resolved {
                    Some((target, path)) => {
                        (ReferenceKind::Reference(target), tag.text.clone(), Some(path))
                    }
                    None => {
                        tracing::debug!(raw, parent, "unresolved see tag");
                        (
                            ReferenceKind::Reference(ReferenceTarget::Unresolved),
                            tag.text.clone(),
                            None,
                        )
                    }
                }
            }
        };

        ReferenceDescriptor {
            raw: raw.to_string(),
            kind,
            label,
            text,
            path,
        }
    }

    /// Namespace whose page renders the entity at `parent`
    fn owner_scope<'a>(&'a self, parent: &'a str) -> &'a str {
        let parent = owning_namespace(parent);
        if self.registry.find_definition(parent).is_none() {
            if let Some(constant) = self.registry.find_constant(parent) {
                return &constant.namespace;
            }
        }
        parent
    }

    fn resolve_member(
        &self,
        member: Member,
        raw: &str,
        parent: &str,
    ) -> Option<(ReferenceTarget, String)> {
        let written = member.split(raw)?;
        let rooted = raw.starts_with("::");

        let names_parent = (written.namespace.is_empty() && !rooted)
            || (!parent.is_empty() && written.namespace == parent);
        if names_parent {
            if let Some(entity) = member.find(self.registry, &member.qualify(parent, written.name))
            {
                let (target, anchor) = member.anchor(entity);
                return Some(self.found(Tier::Local, raw, target, format!("#{anchor}")));
            }
        }

        if !rooted && !parent.is_empty() {
            let candidate = if raw.starts_with(['.', '#']) {
                format!("{parent}{raw}")
            } else {
                join_namespace(parent, raw)
            };
            if let Some(entity) = member.find(self.registry, &candidate) {
                let (target, anchor) = member.anchor(entity);
                let path = format!("{}#{anchor}", slugify_path(&entity.namespace));
                return Some(self.found(Tier::Relative, raw, target, path));
            }
        }

        let entity = member.find(self.registry, raw)?;
        let (target, anchor) = member.anchor(entity);
        let path = format!(
            "{}{}#{anchor}",
            self.base_path,
            slugify_path(&entity.namespace)
        );
        Some(self.found(Tier::Absolute, raw, target, path))
    }

    fn resolve_definition(&self, raw: &str, parent: &str) -> Option<(ReferenceTarget, String)> {
        let target = ReferenceTarget::Definition;

        if !raw.starts_with("::") && !parent.is_empty() {
            if let Some(entity) = self.registry.find_definition(&join_namespace(parent, raw)) {
                let path = slugify_path(&entity.qualified_path());
                return Some(self.found(Tier::Relative, raw, target, path));
            }
        }

        let entity = self.registry.find_definition(raw)?;
        let path = format!(
            "{}{}",
            self.base_path,
            slugify_path(&entity.qualified_path())
        );
        Some(self.found(Tier::Absolute, raw, target, path))
    }

    fn found(
        &self,
        tier: Tier,
        raw: &str,
        target: ReferenceTarget,
        path: String,
    ) -> (ReferenceTarget, String) {
        tracing::debug!(raw, ?tier, kind = target.slug(), %path, "resolved see tag");
        (target, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Entity;

    fn cosmos_registry() -> Registry {
        Registry::new(vec![
            Entity::root(),
            Entity::module("", "Space"),
            Entity::class("Space", "Cosmos"),
            Entity::class("Space", "Star"),
            Entity::constant("Space::Cosmos", "MAX_STARS"),
            Entity::constant("Space", "LIGHT_SPEED"),
            Entity::class_method("Space::Cosmos", "reboot_cosmos"),
            Entity::class_method("Space::Cosmos", "size").attribute(),
            Entity::instance_method("Space::Cosmos", "spin"),
            Entity::instance_method("Space::Cosmos", "name").attribute(),
            Entity::instance_method("Space::Star", "shine"),
            Entity::class_method("", "boot"),
            Entity::module("", "NASA"),
        ])
    }

    fn resolve(raw: &str, parent: &str) -> ReferenceDescriptor {
        let registry = cosmos_registry();
        ReferenceResolver::new(&registry).resolve(&SeeTag::new(raw), parent)
    }

    fn kind(target: ReferenceTarget) -> ReferenceKind {
        ReferenceKind::Reference(target)
    }

    #[test]
    fn test_local_class_method() {
        let d = resolve(".reboot_cosmos", "Space::Cosmos");
        assert_eq!(d.kind, kind(ReferenceTarget::ClassMethod));
        assert_eq!(d.path.as_deref(), Some("#class-method-reboot-cosmos"));
        assert_eq!(d.label, ".reboot_cosmos");
    }

    #[test]
    fn test_local_when_written_with_parent_namespace() {
        let d = resolve("Space::Cosmos#spin", "Space::Cosmos");
        assert_eq!(d.path.as_deref(), Some("#instance-method-spin"));
    }

    #[test]
    fn test_local_from_method_owner() {
        let d = resolve("#spin", "Space::Cosmos#name");
        assert_eq!(d.path.as_deref(), Some("#instance-method-spin"));
    }

    #[test]
    fn test_local_from_constant_owner() {
        let d = resolve("#spin", "Space::Cosmos::MAX_STARS");
        assert_eq!(d.kind, kind(ReferenceTarget::InstanceMethod));
        assert_eq!(d.path.as_deref(), Some("#instance-method-spin"));

        let d = resolve("Star#shine", "Space::LIGHT_SPEED");
        assert_eq!(d.path.as_deref(), Some("space/star#instance-method-shine"));
    }

    #[test]
    fn test_local_attributes() {
        let d = resolve("#name", "Space::Cosmos");
        assert_eq!(d.kind, kind(ReferenceTarget::InstanceAttribute));
        assert_eq!(d.path.as_deref(), Some("#instance-attribute-name"));

        let d = resolve(".size", "Space::Cosmos");
        assert_eq!(d.kind, kind(ReferenceTarget::ClassAttribute));
        assert_eq!(d.path.as_deref(), Some("#class-attribute-size"));
    }

    #[test]
    fn test_relative_member() {
        let d = resolve("Star#shine", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::InstanceMethod));
        assert_eq!(d.path.as_deref(), Some("space/star#instance-method-shine"));

        let d = resolve("Cosmos.reboot_cosmos", "Space");
        assert_eq!(d.path.as_deref(), Some("space/cosmos#class-method-reboot-cosmos"));

        let d = resolve("Cosmos::MAX_STARS", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Constant));
        assert_eq!(d.path.as_deref(), Some("space/cosmos#constant-max-stars"));
    }

    #[test]
    fn test_absolute_member() {
        let d = resolve("Space::Star#shine", "Space::Cosmos");
        assert_eq!(d.path.as_deref(), Some("/space/star#instance-method-shine"));

        let d = resolve("Space::Cosmos::reboot_cosmos", "Space::Star");
        assert_eq!(d.kind, kind(ReferenceTarget::ClassMethod));
        assert_eq!(d.path.as_deref(), Some("/space/cosmos#class-method-reboot-cosmos"));
    }

    #[test]
    fn test_top_level_member() {
        let d = resolve("::boot", "Space::Cosmos");
        assert_eq!(d.path.as_deref(), Some("/#class-method-boot"));

        let d = resolve(".boot", "");
        assert_eq!(d.path.as_deref(), Some("#class-method-boot"));
    }

    #[test]
    fn test_definitions() {
        let d = resolve("Star", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Definition));
        assert_eq!(d.path.as_deref(), Some("space/star"));

        let d = resolve("Space::Star", "Space::Cosmos");
        assert_eq!(d.path.as_deref(), Some("/space/star"));

        let d = resolve("::Space", "Space");
        assert_eq!(d.path.as_deref(), Some("/space"));
    }

    #[test]
    fn test_all_caps_definition_fallback() {
        let d = resolve("NASA", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Definition));
        assert_eq!(d.path.as_deref(), Some("/nasa"));
    }

    #[test]
    fn test_all_caps_prefers_constant() {
        let d = resolve("LIGHT_SPEED", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Constant));
        assert_eq!(d.path.as_deref(), Some("#constant-light-speed"));
    }

    #[test]
    fn test_all_caps_unresolved() {
        let d = resolve("ESA", "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Unresolved));
        assert_eq!(d.path, None);
    }

    #[test]
    fn test_unresolved_keeps_label_and_text() {
        let registry = cosmos_registry();
        let tag = SeeTag::new("Unknown::Thing.").with_text("for details");
        let d = ReferenceResolver::new(&registry).resolve(&tag, "Space");
        assert_eq!(d.kind, kind(ReferenceTarget::Unresolved));
        assert_eq!(d.path, None);
        assert_eq!(d.raw, "Unknown::Thing");
        assert_eq!(d.label, "Unknown::Thing");
        assert_eq!(d.text.as_deref(), Some("for details"));
    }

    #[test]
    fn test_link() {
        let d = resolve("https://example.com/cosmos", "Space");
        assert_eq!(d.kind, ReferenceKind::Link);
        assert_eq!(d.path.as_deref(), Some("https://example.com/cosmos"));
        assert_eq!(d.label, "https://example.com/cosmos");
    }

    #[test]
    fn test_plain_text_and_unstructured() {
        let registry = cosmos_registry();
        let resolver = ReferenceResolver::new(&registry);

        let d = resolver.resolve(&SeeTag::new("_").with_text("the manual"), "Space");
        assert_eq!(d.kind, ReferenceKind::PlainText);
        assert_eq!(d.text.as_deref(), Some("the manual"));
        assert_eq!(d.path, None);

        let d = resolver.resolve(&SeeTag::new("chapter").with_text("three"), "Space");
        assert_eq!(d.kind, ReferenceKind::Unstructured);
        assert_eq!(d.text.as_deref(), Some("chapter three"));
    }

    #[test]
    fn test_explicit_label() {
        let registry = cosmos_registry();
        let tag = SeeTag::new("#spin").with_label("spinning");
        let d = ReferenceResolver::new(&registry).resolve(&tag, "Space::Cosmos");
        assert_eq!(d.label, "spinning");
        assert_eq!(d.raw, "#spin");
    }

    #[test]
    fn test_configured_base_path() {
        let registry = cosmos_registry();
        let config = ReferenceConfig {
            base_path: "/api/".to_string(),
            ..ReferenceConfig::default()
        };
        let d = ReferenceResolver::with_config(&registry, &config)
            .resolve(&SeeTag::new("Space::Star"), "");
        assert_eq!(d.path.as_deref(), Some("/api/space/star"));
    }
}
