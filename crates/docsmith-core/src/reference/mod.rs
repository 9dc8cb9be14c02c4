//! Cross-references from `@see` tags
//!
//! A see tag's name is first classified into a [`ReferenceKind`] and then
//! resolved against the registry relative to the entity that owns the tag.
//! Resolution never fails: a reference that cannot be found still produces
//! a descriptor, just without a path.

mod classify;
mod resolve;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use classify::{classify, Classifier, PLAIN_TEXT_SENTINEL};
pub use resolve::ReferenceResolver;

/// A raw see tag as written in a doc comment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeeTag {
    /// The referenced name (`Space::Cosmos#spin`, a URL, `_`, ...)
    pub name: String,
    /// Free-form text following the name
    pub text: Option<String>,
    /// Explicit display string, if the tag carried one
    pub label: Option<String>,
}

impl SeeTag {
    /// A tag with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            label: None,
        }
    }

    /// Attach free-form text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach a display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The name with surrounding whitespace and one trailing period removed
    pub fn raw(&self) -> &str {
        let name = self.name.trim();
        name.strip_suffix('.').unwrap_or(name)
    }
}

/// What a resolved reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    Definition,
    Constant,
    ClassMethod,
    ClassAttribute,
    InstanceMethod,
    InstanceAttribute,
    Unresolved,
}

impl ReferenceTarget {
    /// Serialized `type` value and anchor prefix
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Constant => "constant",
            Self::ClassMethod => "class-method",
            Self::ClassAttribute => "class-attribute",
            Self::InstanceMethod => "instance-method",
            Self::InstanceAttribute => "instance-attribute",
            Self::Unresolved => "reference",
        }
    }

    /// The attribute counterpart of a method target
    pub(crate) fn as_attribute(self) -> Self {
        match self {
            Self::ClassMethod => Self::ClassAttribute,
            Self::InstanceMethod => Self::InstanceAttribute,
            other => other,
        }
    }
}

/// Classification of a see tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// The `_` sentinel: the tag is only text
    PlainText,
    /// An external URL
    Link,
    /// A reference to a documented entity
    Reference(ReferenceTarget),
    /// Anything else, rendered as opaque text
    Unstructured,
}

impl ReferenceKind {
    /// Serialized `type` value (`None` for text-only records)
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::PlainText | Self::Unstructured => None,
            Self::Link => Some("link"),
            Self::Reference(target) => Some(target.slug()),
        }
    }

    /// Whether the descriptor renders as a bare `{ text }` record
    pub fn is_text_only(&self) -> bool {
        matches!(self, Self::PlainText | Self::Unstructured)
    }
}

/// Fully resolved see tag, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDescriptor {
    /// Tag name with any trailing period stripped
    pub raw: String,
    /// Classification and resolution outcome
    pub kind: ReferenceKind,
    /// Display text for the link
    pub label: String,
    /// Accompanying free-form text
    pub text: Option<String>,
    /// Anchor, relative path, absolute path or URL; `None` when unresolved
    pub path: Option<String>,
}

impl ReferenceDescriptor {
    /// Whether the reference points somewhere
    pub fn is_resolved(&self) -> bool {
        self.path.is_some()
    }
}

impl Serialize for ReferenceDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self.kind.type_name() {
            None => map.serialize_entry("text", &self.text)?,
            Some(type_name) => {
                map.serialize_entry("label", &self.label)?;
                map.serialize_entry("path", &self.path)?;
                map.serialize_entry("text", &self.text)?;
                map.serialize_entry("type", type_name)?;
            }
        }
        map.end()
    }
}
