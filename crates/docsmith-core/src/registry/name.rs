//! Qualified-name normalization
//!
//! Splits the various spellings of a qualified member name into the owning
//! namespace and the member name, so that registry lookups and reference
//! resolution agree on what a name means.

use crate::slug::NAMESPACE_SEPARATOR;

/// A qualified name split into its owning namespace and member name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberName<'a> {
    /// Namespace as written, with any leading `::` removed (empty for top level)
    pub namespace: &'a str,
    /// Member name (method or constant name)
    pub name: &'a str,
}

impl<'a> MemberName<'a> {
    /// Split a class method name.
    ///
    /// Accepts the dot form (`Space::Cosmos.reboot`, `.reboot`) and the
    /// legacy colon form (`Space::Cosmos::reboot`, `::reboot`).
    pub fn class_method(qualified: &'a str) -> Option<Self> {
        if let Some(idx) = qualified.rfind('.') {
            return Self::split_at(qualified, idx, 1);
        }
        let idx = qualified.rfind(NAMESPACE_SEPARATOR)?;
        Self::split_at(qualified, idx, NAMESPACE_SEPARATOR.len())
    }

    /// Split an instance method name (`Space::Cosmos#spin`, `#spin`).
    pub fn instance_method(qualified: &'a str) -> Option<Self> {
        let idx = qualified.rfind('#')?;
        Self::split_at(qualified, idx, 1)
    }

    /// Split a constant name (`Space::MAX`, `::MAX`, `MAX`).
    pub fn constant(qualified: &'a str) -> Option<Self> {
        match qualified.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => Self::split_at(qualified, idx, NAMESPACE_SEPARATOR.len()),
            None if !qualified.is_empty() => Some(Self {
                namespace: "",
                name: qualified,
            }),
            None => None,
        }
    }

    fn split_at(qualified: &'a str, idx: usize, sep_len: usize) -> Option<Self> {
        let name = &qualified[idx + sep_len..];
        if name.is_empty() {
            return None;
        }
        Some(Self {
            namespace: strip_root(&qualified[..idx]),
            name,
        })
    }

    /// Whether the member is owned by the root namespace
    pub fn is_top_level(&self) -> bool {
        self.namespace.is_empty()
    }
}

/// Remove a leading `::` root marker
pub fn strip_root(qualified: &str) -> &str {
    qualified
        .strip_prefix(NAMESPACE_SEPARATOR)
        .unwrap_or(qualified)
}

/// The namespace that owns a qualified path.
///
/// Methods are owned by the namespace before their `.`/`#` marker; classes,
/// modules and the root own themselves.
pub fn owning_namespace(qualified: &str) -> &str {
    let qualified = strip_root(qualified);
    match qualified.rfind(['.', '#']) {
        Some(idx) => &qualified[..idx],
        None => qualified,
    }
}

/// Join a namespace and a name with the namespace separator
pub fn join_namespace(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{name}")
    }
}
