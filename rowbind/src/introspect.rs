//! Type metadata for mapped and bound types
//!
//! Descriptors are generated at compile time by `#[derive(Record)]` and
//! `#[derive(Composite)]`. [`DescriptorCache`] memoizes them per type; it is
//! owned by whoever maps rows (usually a handle), never global.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::traits::Record;

/// Identity of a declared Rust type, used to look up column decoders.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type name, for messages.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One parameter of a type's designated constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Parameter name, matched case-insensitively against column labels.
    pub name: &'static str,
    /// Declared type; decoders are looked up by it.
    pub declared: TypeKey,
    /// Whether the parameter accepts null (`Option<_>`).
    pub nullable: bool,
    /// Whether the constructor supplies a default when it is omitted.
    pub has_default: bool,
}

impl ParameterDescriptor {
    pub fn of<T: Any>(name: &'static str, nullable: bool, has_default: bool) -> Self {
        Self {
            name,
            declared: TypeKey::of::<T>(),
            nullable,
            has_default,
        }
    }

    /// Neither nullable nor defaulted: must be bound or construction fails.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

/// One declared property of a composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub declared: TypeKey,
    pub nullable: bool,
}

impl PropertyDescriptor {
    pub fn of<T: Any>(name: &'static str, nullable: bool) -> Self {
        Self {
            name,
            declared: TypeKey::of::<T>(),
            nullable,
        }
    }
}

/// Metadata of a target type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_name: &'static str,
    constructor: Option<Vec<ParameterDescriptor>>,
}

impl TypeDescriptor {
    /// A type reconstructed through a constructor taking `parameters`.
    pub fn with_constructor(type_name: &'static str, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            type_name,
            constructor: Some(parameters),
        }
    }

    /// A type that exposes no designated constructor.
    pub fn without_constructor(type_name: &'static str) -> Self {
        Self {
            type_name,
            constructor: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Parameters of the designated constructor.
    pub fn parameters(&self) -> Result<&[ParameterDescriptor]> {
        self.constructor
            .as_deref()
            .ok_or(Error::NoPrimaryConstructor(self.type_name))
    }

    /// Find a constructor parameter by case-insensitive name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        let name = name.to_lowercase();
        self.constructor
            .as_deref()?
            .iter()
            .find(|p| p.name.to_lowercase() == name)
    }
}

/// Describe `T`, failing if it has no designated constructor.
pub fn describe<T: Record>() -> Result<TypeDescriptor> {
    let descriptor = T::describe();
    if !descriptor.has_constructor() {
        return Err(Error::NoPrimaryConstructor(descriptor.type_name()));
    }
    Ok(descriptor)
}

/// Per-type descriptor cache with compute-if-absent semantics.
///
/// Readers never block each other. Two threads racing on the first lookup of
/// a type may both compute its descriptor; the first insert wins.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached descriptor of `T`, computing it on first use.
    pub fn describe<T: Record>(&self) -> Result<Arc<TypeDescriptor>> {
        let key = TypeId::of::<T>();
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(found));
        }

        let descriptor = Arc::new(describe::<T>()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(descriptor)))
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached descriptor.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::ConstructorArguments;

    struct Point;

    impl Record for Point {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::with_constructor(
                "Point",
                vec![
                    ParameterDescriptor::of::<i32>("x", false, false),
                    ParameterDescriptor::of::<Option<i32>>("yValue", true, false),
                ],
            )
        }

        fn construct(_args: ConstructorArguments) -> Result<Self> {
            Ok(Point)
        }
    }

    struct Opaque;

    impl Record for Opaque {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::without_constructor("Opaque")
        }

        fn construct(_args: ConstructorArguments) -> Result<Self> {
            Ok(Opaque)
        }
    }

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<Option<i32>>());
        assert!(TypeKey::of::<String>().name().ends_with("String"));
    }

    #[test]
    fn test_parameter_lookup_ignores_case() {
        let descriptor = describe::<Point>().unwrap();
        assert_eq!(descriptor.parameter("YVALUE").unwrap().name, "yValue");
        assert!(descriptor.parameter("z").is_none());
        assert!(descriptor.parameters().unwrap()[0].is_required());
    }

    #[test]
    fn test_no_primary_constructor() {
        let err = describe::<Opaque>().unwrap_err();
        assert!(matches!(err, Error::NoPrimaryConstructor("Opaque")));

        let cache = DescriptorCache::new();
        assert!(cache.describe::<Opaque>().is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_computes_once() {
        let cache = DescriptorCache::new();
        let first = cache.describe::<Point>().unwrap();
        let second = cache.describe::<Point>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
