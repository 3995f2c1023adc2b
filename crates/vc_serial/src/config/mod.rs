//! Serializer settings.
//!
//! Effective settings come from three layers, innermost first:
//!
//! 1. [`TypeConfig`]: overrides for one exact type, applied only while that
//!    type's own members are written or read.
//! 2. The innermost [`ConfigScope`] of the current thread.
//! 3. The process-wide global config, see [`Config::init`].
//!
//! Every public entry point takes a snapshot with [`Config::current`], so
//! changes made during a call do not affect it.

// -----------------------------------------------------------------------------
// Modules

mod global;
mod scope;
mod shorthand;
mod type_config;

// -----------------------------------------------------------------------------
// Exports

pub use scope::{ConfigScope, with_config};
pub use type_config::{
    DeserializeFn, OnDeserializedFn, SerializeFn, TypeConfig, TypeConfigTable, configure_type,
    type_config_table,
};

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Setting enums

/// Naming convention applied to declared member names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextCase {
    /// Declared names are written unchanged.
    #[default]
    Default,
    PascalCase,
    CamelCase,
    SnakeCase,
}

/// How member names are matched when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyConvention {
    /// Wire name, then a case-insensitive match.
    #[default]
    Strict,
    /// Like `Strict`, then ignoring `_` and `-` as well.
    Lenient,
}

/// How dates are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateHandler {
    /// `/Date(ms)/` in JSON with the offset of non-UTC values; the short
    /// XSD form in JSV and CSV.
    #[default]
    TimestampOffset,
    /// `/Date(ms)/` without an offset for unzoned values.
    DcjsCompatible,
    Iso8601,
    Iso8601DateOnly,
    Iso8601DateTime,
    Rfc1123,
    /// Seconds since the epoch, as a number.
    UnixTime,
    /// Milliseconds since the epoch, as a number.
    UnixTimeMs,
}

/// How `TimeDelta` values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSpanHandler {
    /// XSD duration, `P1DT2H3M4.5S`.
    #[default]
    DurationFormat,
    /// `[-][d.]hh:mm:ss[.fffffff]`.
    StandardFormat,
}

// -----------------------------------------------------------------------------
// CsvConfig

/// Separators used by the CSV reader and writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Between fields, `,` by default.
    pub item_separator: String,
    /// Wraps fields that need quoting, `"` by default. May be several
    /// characters long.
    pub item_delimiter: String,
    /// Between rows, `\r\n` by default. Bare `\n` is also accepted when
    /// reading.
    pub row_separator: String,
    pub omit_headers: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            item_separator: String::from(","),
            item_delimiter: String::from("\""),
            row_separator: String::from("\r\n"),
            omit_headers: false,
        }
    }
}

// -----------------------------------------------------------------------------
// Config

/// A bundle of serializer settings.
///
/// ```
/// use vc_serial::config::{Config, TextCase};
///
/// let config = Config::parse("eccn,inv,md:8").unwrap();
/// assert_eq!(config.text_case, TextCase::CamelCase);
/// assert!(config.include_null_values);
/// assert_eq!(config.max_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub text_case: TextCase,
    pub property_convention: PropertyConvention,
    /// Write struct members whose value is null.
    pub include_null_values: bool,
    /// Write map entries whose value is null.
    pub include_null_values_in_dictionaries: bool,
    /// Write enum members holding their type's default value.
    pub include_default_enums: bool,
    /// Omit struct members equal to their type's default value.
    pub exclude_default_values: bool,
    /// Write every enum by discriminant.
    pub treat_enum_as_integer: bool,
    pub date_handler: DateHandler,
    pub time_span_handler: TimeSpanHandler,
    /// Containers nested deeper than this are written empty.
    pub max_depth: usize,
    /// Key of the type hint member.
    pub type_attr: String,
    pub indent: bool,
    /// Escape `<`, `>` and `&` in JSON strings.
    pub escape_html_chars: bool,
    /// Escape every non-ASCII character in JSON strings.
    pub escape_unicode: bool,
    /// Never write type hints.
    pub exclude_type_info: bool,
    /// Write a type hint for every struct.
    pub include_type_info: bool,
    /// Write the short type name as hint when it is unambiguous.
    pub prefer_interfaces: bool,
    /// Read untyped numbers into the narrowest lossless type.
    pub try_parse_into_best_fit: bool,
    /// Read untyped text that looks like a number or bool as one.
    pub try_parse_primitive_values: bool,
    /// Read untyped text that looks like a date as one.
    pub parse_primitive_dates: bool,
    /// Fail on member coercion errors instead of skipping the member.
    pub throw_on_error: bool,
    /// Read zoned text into unzoned dates as UTC wall time.
    pub assume_utc: bool,
    /// Append `+0000` to UTC timestamps.
    pub append_utc_offset: bool,
    /// Keep the original offset instead of converting to UTC in ISO-8601.
    pub skip_date_time_conversion: bool,
    /// `"TypeName.member"` entries that are never written.
    pub exclude_property_references: Vec<String>,
    /// Type paths or names whose values are never written as members.
    pub exclude_types: Vec<String>,
    pub csv: CsvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_case: TextCase::Default,
            property_convention: PropertyConvention::Strict,
            include_null_values: false,
            include_null_values_in_dictionaries: false,
            include_default_enums: true,
            exclude_default_values: false,
            treat_enum_as_integer: false,
            date_handler: DateHandler::TimestampOffset,
            time_span_handler: TimeSpanHandler::DurationFormat,
            max_depth: 50,
            type_attr: String::from("__type"),
            indent: false,
            escape_html_chars: false,
            escape_unicode: false,
            exclude_type_info: false,
            include_type_info: false,
            prefer_interfaces: false,
            try_parse_into_best_fit: false,
            try_parse_primitive_values: false,
            parse_primitive_dates: false,
            throw_on_error: false,
            assume_utc: false,
            append_utc_offset: false,
            skip_date_time_conversion: false,
            exclude_property_references: Vec::new(),
            exclude_types: Vec::new(),
            csv: CsvConfig::default(),
        }
    }
}

impl Config {
    /// Builds a config from the shorthand grammar, starting from defaults.
    pub fn parse(shorthand: &str) -> crate::Result<Self> {
        let mut config = Self::default();
        config.apply_shorthand(shorthand)?;
        Ok(config)
    }

    /// Applies `"key:value,flag,noflag:0"` settings on top of `self`.
    ///
    /// On error `self` is left unchanged.
    pub fn apply_shorthand(&mut self, shorthand: &str) -> crate::Result<()> {
        let mut next = self.clone();
        shorthand::apply(&mut next, shorthand)?;
        *self = next;
        Ok(())
    }

    /// Overrides `self` with `other`, keeping the union of the list settings.
    pub fn merge(&mut self, other: &Config) {
        let mut references = core::mem::take(&mut self.exclude_property_references);
        let mut types = core::mem::take(&mut self.exclude_types);
        *self = other.clone();

        for item in &other.exclude_property_references {
            if !references.contains(item) {
                references.push(item.clone());
            }
        }
        for item in &other.exclude_types {
            if !types.contains(item) {
                types.push(item.clone());
            }
        }
        self.exclude_property_references = references;
        self.exclude_types = types;
    }

    /// Whether `"type_name.member"` is listed in
    /// [`exclude_property_references`](Config::exclude_property_references).
    pub fn excludes_reference(&self, type_name: &str, member: &str) -> bool {
        self.exclude_property_references.iter().any(|reference| {
            reference
                .split_once('.')
                .is_some_and(|(ty, name)| ty == type_name && name == member)
        })
    }

    /// The effective settings of this thread: the innermost scope, or the
    /// global config.
    pub fn current() -> Self {
        scope::current().unwrap_or_else(global::snapshot)
    }

    /// A copy of the process-wide config.
    #[inline]
    pub fn global() -> Self {
        global::snapshot()
    }

    /// Sets the global config and locks it against [`Config::update_global`].
    ///
    /// Later calls merge into the global config, unless strict mode is on,
    /// in which case they fail with [`Error::ConfigLocked`].
    ///
    /// [`Error::ConfigLocked`]: crate::Error::ConfigLocked
    pub fn init(config: Config) -> crate::Result<()> {
        global::init(config)
    }

    /// Mutates the global config; fails once [`Config::init`] has run.
    pub fn update_global(f: impl FnOnce(&mut Config)) -> crate::Result<()> {
        global::update(f)
    }

    #[inline]
    pub fn is_locked() -> bool {
        global::is_locked()
    }

    /// In strict mode a second [`Config::init`] fails.
    #[inline]
    pub fn set_strict_mode(strict: bool) {
        global::set_strict_mode(strict);
    }

    /// Restores defaults: unlocks and resets the global config, clears every
    /// [`TypeConfig`] and resets the runtime type allow-list.
    pub fn reset() {
        global::reset();
        type_config::clear();
        crate::resolver::reset();
    }

    /// Activates `config` on this thread until the returned scope is dropped.
    #[inline]
    pub fn with(config: Config) -> ConfigScope {
        ConfigScope::push(config)
    }

    /// Activates a copy of the current config, to be changed through
    /// [`ConfigScope::update`].
    #[inline]
    pub fn begin_scope() -> ConfigScope {
        ConfigScope::push(Self::current())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::{Config, TextCase};

    static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the process-wide test lock; global state is reset on entry
    /// and again on drop.
    pub(crate) struct GlobalGuard {
        _lock: MutexGuard<'static, ()>,
    }

    impl Drop for GlobalGuard {
        fn drop(&mut self) {
            Config::reset();
        }
    }

    /// Serializes tests touching process-wide state: the global config,
    /// type configs and the runtime type allow-list.
    pub(crate) fn lock_global() -> GlobalGuard {
        let lock = GLOBAL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Config::reset();
        GlobalGuard { _lock: lock }
    }

    #[test]
    fn type_configs_do_not_outlive_the_guard() {
        #[derive(vc_reflect::derive::Reflect, Clone, Default)]
        struct Marker {
            id: i32,
        }

        {
            let _guard = lock_global();
            super::configure_type::<Marker>(|tc| {
                tc.exclude("id");
            });
            assert!(super::TypeConfig::of::<Marker>().is_some());
        }
        let _guard = lock_global();
        assert!(super::TypeConfig::of::<Marker>().is_none());
        drop(_guard);
        assert!(super::TypeConfig::of::<Marker>().is_none());
    }

    #[test]
    fn merge_unions_lists() {
        let mut base = Config {
            exclude_property_references: vec!["A.x".into()],
            ..Config::default()
        };
        let other = Config {
            text_case: TextCase::SnakeCase,
            exclude_property_references: vec!["A.x".into(), "B.y".into()],
            ..Config::default()
        };
        base.merge(&other);
        assert_eq!(base.text_case, TextCase::SnakeCase);
        assert_eq!(base.exclude_property_references, ["A.x", "B.y"]);
    }

    #[test]
    fn reference_matching() {
        let config = Config {
            exclude_property_references: vec!["Exclude.Id".into()],
            ..Config::default()
        };
        assert!(config.excludes_reference("Exclude", "Id"));
        assert!(!config.excludes_reference("Exclude", "Key"));
        assert!(!config.excludes_reference("Other", "Id"));
    }

    #[test]
    fn settings_load_through_serde() {
        let config: Config = serde_json::from_str(r#"{"max_depth":3,"text_case":"CamelCase"}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.text_case, TextCase::CamelCase);
        assert_eq!(config.type_attr, "__type");
    }

    #[test]
    fn init_locks_and_merges() {
        let _guard = lock_global();

        assert!(Config::update_global(|c| c.indent = true).is_ok());
        assert!(Config::global().indent);

        Config::init(Config {
            exclude_types: vec!["a::B".into()],
            ..Config::default()
        })
        .unwrap();
        assert!(Config::is_locked());
        assert!(matches!(
            Config::update_global(|c| c.indent = true),
            Err(crate::Error::ConfigLocked)
        ));

        Config::init(Config {
            exclude_types: vec!["c::D".into()],
            ..Config::default()
        })
        .unwrap();
        assert_eq!(Config::global().exclude_types, ["a::B", "c::D"]);

        Config::set_strict_mode(true);
        assert!(Config::init(Config::default()).is_err());

        Config::reset();
        assert!(!Config::is_locked());
        assert!(Config::init(Config::default()).is_ok());
        Config::reset();
    }
}
