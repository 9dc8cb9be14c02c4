//! See-tag classification
//!
//! Each reference kind has a shape predicate. The predicates are tried in a
//! fixed order and the first match wins; names matching none of them are
//! unstructured text.

use std::sync::OnceLock;

use regex::Regex;

use super::{ReferenceKind, ReferenceTarget};

/// Default name of a plain-text see tag
pub const PLAIN_TEXT_SENTINEL: &str = "_";

/// Optionally rooted, `::`-separated run of capitalized segments
const NAMESPACE: &str = r"(?:::)?[A-Z][A-Za-z0-9_]*(?:::[A-Z][A-Za-z0-9_]*)*";

/// Method name with an optional writer/predicate/bang suffix
const METHOD: &str = r"[a-z_][A-Za-z0-9_]*[=?!]?";

/// One step of the ordered classification
struct Trial {
    kind: ReferenceKind,
    matches: fn(&Classifier, &str) -> bool,
}

const TRIALS: &[Trial] = &[
    Trial {
        kind: ReferenceKind::PlainText,
        matches: |classifier, raw| raw == classifier.sentinel,
    },
    Trial {
        kind: ReferenceKind::Link,
        matches: |_, raw| is_link(raw),
    },
    Trial {
        kind: ReferenceKind::Reference(ReferenceTarget::Constant),
        matches: |_, raw| is_constant(raw),
    },
    Trial {
        kind: ReferenceKind::Reference(ReferenceTarget::ClassMethod),
        matches: |_, raw| is_class_method(raw),
    },
    Trial {
        kind: ReferenceKind::Reference(ReferenceTarget::Definition),
        matches: |_, raw| is_definition(raw),
    },
    Trial {
        kind: ReferenceKind::Reference(ReferenceTarget::InstanceMethod),
        matches: |_, raw| is_instance_method(raw),
    },
];

/// Classifies raw see-tag names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    sentinel: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PLAIN_TEXT_SENTINEL)
    }
}

impl Classifier {
    /// Create a classifier with a custom plain-text sentinel
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Classify a raw name (trailing period already stripped)
    pub fn classify(&self, raw: &str) -> ReferenceKind {
        let kind = TRIALS
            .iter()
            .find(|trial| (trial.matches)(self, raw))
            .map_or(ReferenceKind::Unstructured, |trial| trial.kind);
        tracing::trace!(raw, ?kind, "classified see tag");
        kind
    }
}

/// Classify a raw name using the default `_` sentinel
pub fn classify(raw: &str) -> ReferenceKind {
    Classifier::default().classify(raw)
}

fn matches(cell: &OnceLock<Option<Regex>>, pattern: impl FnOnce() -> String, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(&pattern()).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// A URI scheme is the only signal; bare domains are not links
fn is_link(raw: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, || r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$".to_string(), raw)
}

/// `MAX_SIZE`, `Space::MAX_SIZE`, `::MAX_SIZE`
fn is_constant(raw: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, || format!(r"^(?:{NAMESPACE}::|::)?[A-Z][A-Z0-9_]*$"), raw)
}

/// `Space.boot`, `.boot`, and the legacy `Space::boot`, `::boot`
fn is_class_method(raw: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, || format!(r"^(?:{NAMESPACE})?(?:\.|::){METHOD}$"), raw)
}

/// `Space`, `Space::Cosmos`, `::Space`
fn is_definition(raw: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, || format!(r"^{NAMESPACE}$"), raw)
}

/// `Space#spin`, `#spin`
fn is_instance_method(raw: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&RE, || format!(r"^(?:{NAMESPACE})?#{METHOD}$"), raw)
}
