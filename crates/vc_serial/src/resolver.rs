//! Resolution of type hints to constructible types.
//!
//! A type hint read from a payload is turned into a [`TypeInfo`] only when
//! the type is permitted:
//!
//! 1. An allow predicate set with [`set_allow_predicate`] that returns
//!    `true` permits the type without further checks.
//! 2. Scalars, the dynamic [`Value`] tree, and lists, maps and options of
//!    permitted types are always permitted.
//! 3. Types registered with [`register_type`] or listed with
//!    [`allow_type_path`], and types under a namespace added with
//!    [`allow_namespace`], are permitted.
//! 4. Everything else is refused with [`Error::NotSupported`].
//!
//! Registration is additive; only [`Config::reset`] restores the defaults.
//!
//! [`Config::reset`]: crate::config::Config::reset

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{LazyLock, PoisonError, RwLock};

use log::{trace, warn};
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::registry::{GetTypeMeta, TypeRegistry};
use vc_utils::hash::HashSet;

use crate::value::Value;
use crate::{Error, Result};

/// Decides whether a type hint may be instantiated.
pub type AllowPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Namespaces of this crate family, permitted from the start.
const SAFE_NAMESPACES: &[&str] = &["vc_serial::", "vc_reflect::"];

// -----------------------------------------------------------------------------
// ResolveState

/// The stages a type hint passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Unresolved,
    /// The allow-list was consulted.
    Checked { allowed: bool },
    Resolved,
    Rejected,
}

// -----------------------------------------------------------------------------
// Resolver

struct Resolver {
    registry: TypeRegistry,
    allowed_paths: HashSet<String>,
    namespaces: Vec<String>,
    predicate: Option<AllowPredicate>,
}

impl Resolver {
    fn new() -> Self {
        let mut registry = TypeRegistry::new();
        registry.register::<Value>();
        if registry.auto_register() {
            trace!("type resolver loaded {} auto registered types", registry.len());
        }
        Self {
            registry,
            allowed_paths: HashSet::default(),
            namespaces: SAFE_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            predicate: None,
        }
    }

    fn find(&self, name: &str) -> Option<&'static TypeInfo> {
        self.registry
            .get_with_type_path(name)
            .or_else(|| self.registry.get_with_type_name(name))
            .map(|meta| meta.type_info())
    }

    /// Looks the hint up and consults the allow-list.
    fn check(&self, name: &str) -> (Option<&'static TypeInfo>, bool) {
        let found = self.find(name);
        let canonical: &str = match found {
            Some(info) => info.type_path(),
            None => name,
        };
        let by_predicate = self.predicate.as_ref().is_some_and(|allow| allow(canonical));
        (found, by_predicate || found.is_some_and(|info| self.is_allowed(info)))
    }

    fn is_allowed(&self, info: &'static TypeInfo) -> bool {
        match info {
            TypeInfo::Scalar(_) | TypeInfo::Object(_) => true,
            TypeInfo::Opaque(_) => info.is::<Value>(),
            TypeInfo::Option(option) => self.is_allowed(option.item_info()),
            TypeInfo::List(list) => self.is_allowed(list.item_info()),
            TypeInfo::Map(map) => self.is_allowed(map.key_info()) && self.is_allowed(map.value_info()),
            TypeInfo::Struct(_) | TypeInfo::Enum(_) => {
                let path = info.type_path();
                self.allowed_paths.contains(path) || self.namespaces.iter().any(|ns| path.starts_with(ns.as_str()))
            }
        }
    }
}

static RESOLVER: LazyLock<RwLock<Resolver>> = LazyLock::new(|| RwLock::new(Resolver::new()));

fn read<R>(f: impl FnOnce(&Resolver) -> R) -> R {
    f(&RESOLVER.read().unwrap_or_else(PoisonError::into_inner))
}

fn write<R>(f: impl FnOnce(&mut Resolver) -> R) -> R {
    f(&mut RESOLVER.write().unwrap_or_else(PoisonError::into_inner))
}

// -----------------------------------------------------------------------------
// API

/// Registers `T` and permits it as a type hint.
pub fn register_type<T: GetTypeMeta + Typed>() {
    write(|resolver| {
        resolver.registry.register::<T>();
        resolver.allowed_paths.insert(T::type_info().type_path().to_string());
    });
    log::debug!("allowed runtime type `{}`", T::type_info().type_path());
}

/// Permits the registered type whose type path is `path`.
pub fn allow_type_path(path: &str) {
    write(|resolver| resolver.allowed_paths.insert(path.to_string()));
    log::debug!("allowed runtime type path `{path}`");
}

/// Permits every type whose type path starts with `namespace`.
///
/// A trailing `::` is added when missing, so `"app::dto"` does not match
/// `app::dto_internal::X`.
pub fn allow_namespace(namespace: &str) {
    let mut namespace = namespace.trim_end_matches(':').to_string();
    namespace.push_str("::");
    log::debug!("allowed runtime type namespace `{namespace}`");
    write(|resolver| resolver.namespaces.push(namespace));
}

/// Installs a predicate that permits type hints before any other check.
pub fn set_allow_predicate(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) {
    write(|resolver| resolver.predicate = Some(Arc::new(predicate)));
}

/// Resolves a type hint such as `"app::dto::Customer"`,
/// `"app::dto::Customer, app"` or, for an unambiguous name, `"Customer"`.
///
/// ```
/// use vc_serial::resolver;
///
/// let info = resolver::resolve("alloc::string::String, alloc").unwrap();
/// assert_eq!(info.type_name(), "String");
/// assert!(resolver::resolve("app::Evil, app").unwrap_err().is_not_supported());
/// ```
pub fn resolve(hint: &str) -> Result<&'static TypeInfo> {
    let name = normalize(hint);
    let mut state = ResolveState::Unresolved;
    trace!("resolving type hint `{hint}`: {state:?}");

    let outcome = read(|resolver| resolver.check(name));

    state = ResolveState::Checked { allowed: outcome.1 };
    trace!("type hint `{hint}`: {state:?}");

    match outcome {
        (Some(info), true) => {
            state = ResolveState::Resolved;
            trace!("type hint `{hint}`: {state:?} as `{}`", info.type_path());
            Ok(info)
        }
        _ => {
            state = ResolveState::Rejected;
            warn!("type hint `{hint}`: {state:?}");
            Err(Error::not_supported(hint))
        }
    }
}

/// Whether `hint` would resolve.
pub fn is_allowed(hint: &str) -> bool {
    let name = normalize(hint);
    matches!(read(|resolver| resolver.check(name)), (Some(_), true))
}

/// The hint written for `info`: its type path, or its short name when
/// `short` is set and the name is unambiguous.
pub(crate) fn type_hint(info: &'static TypeInfo, short: bool) -> &'static str {
    if short {
        let name = info.type_name();
        let unique = read(|resolver| {
            resolver
                .registry
                .get_with_type_name(name)
                .is_some_and(|meta| meta.type_id() == info.type_id())
        });
        if unique {
            return name;
        }
    }
    info.type_path()
}

pub(crate) fn reset() {
    write(|resolver| *resolver = Resolver::new());
}

/// Drops a trailing `, crate` qualifier.
fn normalize(hint: &str) -> &str {
    let hint = hint.trim();
    match hint.rsplit_once(',') {
        Some((path, qualifier)) if !qualifier.contains(['<', '>']) => path.trim_end(),
        _ => hint,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_reflect::derive::Reflect;

    use super::{allow_namespace, is_allowed, normalize, register_type, resolve, set_allow_predicate, type_hint};
    use crate::config::tests::lock_global;

    mod dto {
        use vc_reflect::derive::Reflect;

        #[derive(Reflect, Clone, Default)]
        #[reflect(type_path = "app::orders::Order")]
        pub struct Order {
            pub id: i32,
        }
    }

    #[derive(Reflect, Clone, Default)]
    #[reflect(type_path = "app::crm::Customer")]
    struct Customer {
        name: String,
    }

    #[test]
    fn hints_are_normalized() {
        assert_eq!(normalize(" app::dto::Customer, app "), "app::dto::Customer");
        assert_eq!(normalize("app::Pair<i32, i64>"), "app::Pair<i32, i64>");
        assert_eq!(normalize("app::Pair<i32, i64>, app"), "app::Pair<i32, i64>");
    }

    #[test]
    fn unknown_and_unregistered_types_are_refused() {
        let _guard = lock_global();
        assert!(resolve("app::Evil, app").unwrap_err().is_not_supported());

        let path = <Customer as vc_reflect::info::TypePath>::type_path();
        assert!(!is_allowed(path));
        register_type::<Customer>();
        assert!(is_allowed(path));
        assert!(is_allowed("Customer"));
        assert_eq!(resolve(&alloc::format!("{path}, app")).unwrap().type_path(), path);
    }

    #[test]
    fn namespaces_and_predicates() {
        let _guard = lock_global();
        let info = <dto::Order as vc_reflect::info::Typed>::type_info();
        crate::resolver::write(|resolver| resolver.registry.register::<dto::Order>());
        assert!(resolve(info.type_path()).is_err());

        allow_namespace(info.type_path().trim_end_matches("::Order"));
        assert!(resolve(info.type_path()).is_ok());

        crate::config::Config::reset();
        crate::resolver::write(|resolver| resolver.registry.register::<dto::Order>());
        assert!(resolve(info.type_path()).is_err());
        set_allow_predicate(|path| path.ends_with("::Order"));
        assert!(resolve(info.type_path()).is_ok());
    }

    #[test]
    fn builtins_are_permitted() {
        let _guard = lock_global();
        assert!(is_allowed("i64"));
        assert!(is_allowed("vc_serial::value::Value"));
        assert!(is_allowed("vc_reflect::ops::Object"));
    }

    #[test]
    fn short_hints_need_a_unique_name() {
        let _guard = lock_global();
        let info = <Customer as vc_reflect::info::Typed>::type_info();
        assert_eq!(type_hint(info, true), info.type_path());
        register_type::<Customer>();
        assert_eq!(type_hint(info, true), "Customer");
        assert_eq!(type_hint(info, false), info.type_path());
    }
}
