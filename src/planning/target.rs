//! Injection points.
//!
//! A [`Target`] describes one thing being resolved: the service identifier,
//! whether a single instance or all matching bindings are wanted, an
//! optional display name and any tag metadata attached to the injection
//! point. Targets are immutable once constructed and double as the context
//! object handed to constraint evaluation.

use std::borrow::Cow;
use std::fmt;

use strum_macros::Display;

use crate::identifier::ServiceIdentifier;

/// Tag implicitly attached to single-injection targets.
pub const INJECT_TAG: &str = "inject";
/// Tag implicitly attached to multi-injection (array) targets.
pub const MULTI_INJECT_TAG: &str = "multi_inject";
/// Tag carrying a target's display name, when it has one.
pub const NAMED_TAG: &str = "named";

const RESERVED_TAGS: [&str; 3] = [INJECT_TAG, MULTI_INJECT_TAG, NAMED_TAG];

/// One key/value tag attached to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    key: Cow<'static, str>,
    value: String,
}

impl Metadata {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Where the injection point sits in the consuming type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TargetKind {
    ConstructorArgument,
    ClassProperty,
    Variable,
}

/// One injection point being resolved.
#[derive(Debug, Clone)]
pub struct Target {
    kind: TargetKind,
    service_identifier: ServiceIdentifier,
    name: Option<String>,
    metadata: Vec<Metadata>,
}

impl Target {
    /// A single-injection target for `service_identifier`.
    pub fn new(
        kind: TargetKind,
        service_identifier: ServiceIdentifier,
        name: Option<&str>,
    ) -> Self {
        Self::with_injection_tag(kind, service_identifier, name, false)
    }

    /// A multi-injection target: all matching bindings are requested.
    pub fn multi(
        kind: TargetKind,
        service_identifier: ServiceIdentifier,
        name: Option<&str>,
    ) -> Self {
        Self::with_injection_tag(kind, service_identifier, name, true)
    }

    fn with_injection_tag(
        kind: TargetKind,
        service_identifier: ServiceIdentifier,
        name: Option<&str>,
        multi: bool,
    ) -> Self {
        let inject_key = if multi { MULTI_INJECT_TAG } else { INJECT_TAG };
        let mut metadata = vec![Metadata::new(inject_key, service_identifier.to_string())];
        if let Some(name) = name {
            metadata.push(Metadata::new(NAMED_TAG, name));
        }
        Self {
            kind,
            service_identifier,
            name: name.map(str::to_owned),
            metadata,
        }
    }

    /// Append an explicit tag to this target's metadata.
    pub fn tagged(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.metadata.push(Metadata::new(key, value));
        self
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn service_identifier(&self) -> &ServiceIdentifier {
        &self.service_identifier
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Tags other than the reserved inject/multi-inject/named ones.
    pub fn custom_tags(&self) -> impl Iterator<Item = &Metadata> {
        self.metadata
            .iter()
            .filter(|m| !RESERVED_TAGS.contains(&m.key()))
    }

    pub fn is_array(&self) -> bool {
        self.has_tag(MULTI_INJECT_TAG)
    }

    /// Whether this is an array target requesting the given identifier.
    pub fn matches_array(&self, service_identifier: &ServiceIdentifier) -> bool {
        self.is_array() && self.service_identifier == *service_identifier
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    pub fn is_tagged(&self) -> bool {
        self.custom_tags().next().is_some()
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.metadata.iter().any(|m| m.key() == key)
    }

    pub fn matches_tag(&self, key: &str, value: &str) -> bool {
        self.metadata
            .iter()
            .any(|m| m.key() == key && m.value() == value)
    }
}
