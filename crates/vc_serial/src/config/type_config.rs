use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_utils::TypeIdMap;

use super::TextCase;

/// Writes a value as text in place of the reflected form.
pub type SerializeFn = Arc<dyn Fn(&dyn Reflect) -> Result<String, String> + Send + Sync>;

/// Reads a value back from the text produced by a [`SerializeFn`].
pub type DeserializeFn = Arc<dyn Fn(&str) -> Result<Box<dyn Reflect>, String> + Send + Sync>;

/// Runs on every fully populated instance; its result replaces the instance.
pub type OnDeserializedFn = Arc<dyn Fn(Box<dyn Reflect>) -> Box<dyn Reflect> + Send + Sync>;

// -----------------------------------------------------------------------------
// TypeConfig

/// Overrides for one exact type.
///
/// Applies only while members of that type are written or read, never to
/// containing or contained types. Register with [`configure_type`].
///
/// ```
/// use vc_reflect::derive::Reflect;
/// use vc_serial::config::{TypeConfig, configure_type};
///
/// #[derive(Reflect, Clone, Default)]
/// struct Money {
///     cents: i64,
/// }
///
/// configure_type::<Money>(|config| {
///     config.set_serialize_fn(|m: &Money| Ok(format!("{}.{:02}", m.cents / 100, m.cents % 100)));
/// });
/// assert!(TypeConfig::of::<Money>().unwrap().serialize_fn.is_some());
/// # vc_serial::config::Config::reset();
/// ```
#[derive(Clone, Default)]
pub struct TypeConfig {
    pub text_case: Option<TextCase>,
    /// `(declared, wire)` names, taking precedence over aliases.
    pub rename: Vec<(String, String)>,
    /// Declared names of members that are never written.
    pub exclude_property_names: Vec<String>,
    /// Always write a type hint for this type.
    pub include_type_info: bool,
    /// Never write a type hint for this type.
    pub exclude_type_info: bool,
    pub serialize_fn: Option<SerializeFn>,
    pub deserialize_fn: Option<DeserializeFn>,
    pub on_deserialized: Option<OnDeserializedFn>,
    /// Write members of this type even when they hold the default value.
    pub include_default_value: bool,
    /// `(declared, header)` columns for CSV; restricts and orders the output.
    pub csv_headers: Vec<(String, String)>,
}

impl TypeConfig {
    /// The registered overrides of `T`.
    #[inline]
    pub fn of<T: Typed>() -> Option<Arc<TypeConfig>> {
        type_config_table().get(TypeId::of::<T>()).cloned()
    }

    /// Sets the wire name of the declared member `declared`.
    pub fn rename(&mut self, declared: &str, wire: &str) -> &mut Self {
        self.rename.retain(|(name, _)| name != declared);
        self.rename.push((declared.to_string(), wire.to_string()));
        self
    }

    pub fn exclude(&mut self, declared: &str) -> &mut Self {
        if !self.exclude_property_names.iter().any(|name| name == declared) {
            self.exclude_property_names.push(declared.to_string());
        }
        self
    }

    /// Adds a CSV column for `declared`, titled `header`.
    pub fn csv_header(&mut self, declared: &str, header: &str) -> &mut Self {
        self.csv_headers.push((declared.to_string(), header.to_string()));
        self
    }

    /// Writes values of type `T` with `f`.
    pub fn set_serialize_fn<T: Reflect>(
        &mut self,
        f: impl Fn(&T) -> Result<String, String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.serialize_fn = Some(Arc::new(move |value: &dyn Reflect| {
            match value.downcast_ref::<T>() {
                Some(value) => f(value),
                None => Err(String::from("value has an unexpected type")),
            }
        }));
        self
    }

    /// Reads values of type `T` with `f`.
    pub fn set_deserialize_fn<T: Reflect>(
        &mut self,
        f: impl Fn(&str) -> Result<T, String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.deserialize_fn = Some(Arc::new(move |text: &str| {
            f(text).map(|value| Box::new(value) as Box<dyn Reflect>)
        }));
        self
    }

    /// Post-processes every deserialized `T`.
    pub fn set_on_deserialized<T: Reflect>(
        &mut self,
        f: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_deserialized = Some(Arc::new(move |value: Box<dyn Reflect>| {
            match value.take::<T>() {
                Ok(value) => Box::new(f(value)),
                Err(value) => value,
            }
        }));
        self
    }

    /// The overriding wire name of `declared`.
    pub fn renamed(&self, declared: &str) -> Option<&str> {
        self.rename
            .iter()
            .find(|(name, _)| name == declared)
            .map(|(_, wire)| wire.as_str())
    }

    #[inline]
    pub fn excludes(&self, declared: &str) -> bool {
        self.exclude_property_names.iter().any(|name| name == declared)
    }
}

impl fmt::Debug for TypeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConfig")
            .field("text_case", &self.text_case)
            .field("rename", &self.rename)
            .field("exclude_property_names", &self.exclude_property_names)
            .field("include_type_info", &self.include_type_info)
            .field("exclude_type_info", &self.exclude_type_info)
            .field("serialize_fn", &self.serialize_fn.is_some())
            .field("deserialize_fn", &self.deserialize_fn.is_some())
            .field("on_deserialized", &self.on_deserialized.is_some())
            .field("include_default_value", &self.include_default_value)
            .field("csv_headers", &self.csv_headers)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeConfigTable

/// An immutable snapshot of every registered [`TypeConfig`].
#[derive(Clone, Default)]
pub struct TypeConfigTable(Option<Arc<TypeIdMap<Arc<TypeConfig>>>>);

impl TypeConfigTable {
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Arc<TypeConfig>> {
        self.0.as_ref()?.get(&type_id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|table| table.is_empty())
    }
}

impl fmt::Debug for TypeConfigTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(table) => f.debug_map().entries(table.iter()).finish(),
            None => f.write_str("{}"),
        }
    }
}

static TABLE: RwLock<TypeConfigTable> = RwLock::new(TypeConfigTable(None));

/// A snapshot of the per-type overrides.
#[inline]
pub fn type_config_table() -> TypeConfigTable {
    TABLE.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Changes the overrides of `T`, creating them on first use.
///
/// Calls already running keep the snapshot they started with.
pub fn configure_type<T: Typed>(f: impl FnOnce(&mut TypeConfig)) {
    let mut table = TABLE.write().unwrap_or_else(PoisonError::into_inner);
    let mut next = table.0.as_deref().cloned().unwrap_or_default();

    let mut config = next
        .get(&TypeId::of::<T>())
        .map(|config| TypeConfig::clone(config))
        .unwrap_or_default();
    f(&mut config);
    next.insert(TypeId::of::<T>(), Arc::new(config));

    log::debug!("type config updated for `{}`", T::type_path());
    *table = TypeConfigTable(Some(Arc::new(next)));
}

pub(super) fn clear() {
    *TABLE.write().unwrap_or_else(PoisonError::into_inner) = TypeConfigTable(None);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TypeConfig, configure_type, type_config_table};
    use crate::config::tests::lock_global;

    #[test]
    fn snapshots_are_copy_on_write() {
        let _guard = lock_global();

        configure_type::<u8>(|c| {
            c.exclude("a");
        });
        let before = type_config_table();
        configure_type::<u8>(|c| {
            c.rename("a", "b");
        });

        let old = before.get(core::any::TypeId::of::<u8>()).unwrap();
        assert!(old.renamed("a").is_none());
        let new = TypeConfig::of::<u8>().unwrap();
        assert_eq!(new.renamed("a"), Some("b"));
        assert!(new.excludes("a"));
    }

    #[test]
    fn typed_hooks_erase_their_type() {
        let mut config = TypeConfig::default();
        config.set_serialize_fn(|v: &u8| Ok(format!("#{v}")));
        config.set_on_deserialized(|v: u8| v + 1);

        let ser = config.serialize_fn.as_ref().unwrap();
        assert_eq!(ser(&7_u8).unwrap(), "#7");
        assert!(ser(&7_i8).is_err());

        let hook = config.on_deserialized.as_ref().unwrap();
        assert_eq!(hook(Box::new(1_u8)).downcast_ref::<u8>(), Some(&2));
    }
}
