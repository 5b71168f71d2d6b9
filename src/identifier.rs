//! Service identifiers and type keys.
//!
//! A [`ServiceIdentifier`] names an abstraction to be resolved. It is an
//! opaque, immutable map key: either a plain name (string) or a Rust type.
//! A [`TypeKey`] additionally identifies concrete implementation types for
//! the reflection provider.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

/// A key that identifies a Rust type without holding an instance of it.
///
/// Equality and hashing are driven by [`TypeId`]; the type name is carried
/// along purely for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Create the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Trailing path segment of the type name, used in error messages.
    pub fn short_name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Names an abstraction registered in a container.
///
/// Identifiers are never mutated after registration and are compared by
/// value. String identifiers cover the "symbolic token" case as well; type
/// identifiers let a trait or struct stand for itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceIdentifier {
    /// A named abstraction, e.g. `"Logger"`.
    Name(Cow<'static, str>),
    /// A Rust type standing for the abstraction, e.g. `dyn Logger`.
    Type(TypeKey),
}

impl ServiceIdentifier {
    /// Identifier for the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeKey::of::<T>())
    }
}

impl From<&'static str> for ServiceIdentifier {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for ServiceIdentifier {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<TypeKey> for ServiceIdentifier {
    fn from(key: TypeKey) -> Self {
        Self::Type(key)
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Type(key) => f.write_str(key.short_name()),
        }
    }
}
