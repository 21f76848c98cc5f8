//! Field bindings and the registry the evaluator resolves names against.
//!
//! A [`FieldBinding`] pairs a name with an accessor for one concrete object
//! type. The accessor is stored behind `dyn Any` so that a single registry,
//! and the evaluator owning it, need not be generic over the object type.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A value extracted from an object, in one of the comparable domains.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, compared lexicographically.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Single precision float. Literals are parsed as `f32` too.
    F32(f32),
    /// Double precision float.
    F64(f64),
}

impl FieldValue {
    /// Returns true for the numeric domains.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldValue::Text(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::UInt(value) => write!(f, "{value}"),
            FieldValue::F32(value) => write!(f, "{value}"),
            FieldValue::F64(value) => write!(f, "{value}"),
        }
    }
}

macro_rules! impl_from_for_field_value {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue {
                fn from(value: $source) -> Self {
                    FieldValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_for_field_value!(Int, i64: i8, i16, i32, i64);
impl_from_for_field_value!(UInt, u64: u8, u16, u32, u64);
impl_from_for_field_value!(F32, f32: f32);
impl_from_for_field_value!(F64, f64: f64);
impl_from_for_field_value!(Text, String: String, &str, char);

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        // isize is at most 64 bits on every supported target.
        FieldValue::Int(value as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::UInt(value as u64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

type Extractor = dyn Fn(&dyn Any) -> Option<FieldValue> + Send + Sync;

/// A named accessor bound to one object type.
///
/// Bindings are cheap to clone; clones share the accessor.
#[derive(Clone)]
pub struct FieldBinding {
    name: String,
    object_type: &'static str,
    extractor: Arc<Extractor>,
}

impl FieldBinding {
    /// Binds `name` to an accessor over objects of type `T`.
    pub fn new<T, V, F>(name: impl Into<String>, accessor: F) -> Self
    where
        T: Any,
        V: Into<FieldValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let extractor = move |object: &dyn Any| {
            object
                .downcast_ref::<T>()
                .map(|object| accessor(object).into())
        };
        Self {
            name: name.into(),
            object_type: type_name::<T>(),
            extractor: Arc::new(extractor),
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the object type the accessor was registered for.
    pub fn object_type(&self) -> &'static str {
        self.object_type
    }

    /// Extracts the value from `object`.
    ///
    /// Returns `None` when `object` is not the registered type.
    pub fn extract(&self, object: &dyn Any) -> Option<FieldValue> {
        (self.extractor)(object)
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("object_type", &self.object_type)
            .finish_non_exhaustive()
    }
}

/// Builds one registry entry from a field name and an accessor.
///
/// # Example
///
/// ```
/// use booleval::{make_field, FieldValue};
///
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let age = make_field("age", |p: &Person| p.age);
/// let name = make_field("name", |p: &Person| p.name.clone());
///
/// let person = Person { name: "John".into(), age: 25 };
/// assert_eq!(age.extract(&person), Some(FieldValue::UInt(25)));
/// assert_eq!(name.extract(&person), Some(FieldValue::Text("John".into())));
/// assert_eq!(age.extract(&"not a person"), None);
/// ```
pub fn make_field<T, V, F>(name: impl Into<String>, accessor: F) -> FieldBinding
where
    T: Any,
    V: Into<FieldValue>,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    FieldBinding::new(name, accessor)
}

/// Mapping from field name to binding.
///
/// Registering a name that already exists replaces the previous binding.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldBinding>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, returning the one it replaced, if any.
    pub fn register(&mut self, binding: FieldBinding) -> Option<FieldBinding> {
        self.fields.insert(binding.name.clone(), binding)
    }

    /// Looks up a binding by name.
    pub fn lookup(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.get(name)
    }

    /// Returns true if a binding with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Suggests the registered name closest to `name`, for diagnostics.
    ///
    /// Only names within a small edit distance are suggested, and never an
    /// exact match.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let query = name.to_lowercase();

        let (best_match, best_distance) = self
            .names()
            .into_iter()
            .map(|candidate| (candidate, levenshtein(&query, &candidate.to_lowercase())))
            .min_by_key(|(_, distance)| *distance)?;

        if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
            Some(best_match)
        } else {
            None
        }
    }
}

impl FromIterator<FieldBinding> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = FieldBinding>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl Extend<FieldBinding> for FieldRegistry {
    fn extend<I: IntoIterator<Item = FieldBinding>>(&mut self, iter: I) {
        for binding in iter {
            self.register(binding);
        }
    }
}
