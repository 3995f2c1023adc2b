use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::marker::PhantomData;

use super::Config;

std::thread_local! {
    static SCOPES: RefCell<Vec<(u64, Config)>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

pub(super) fn current() -> Option<Config> {
    SCOPES.with_borrow(|scopes| scopes.last().map(|(_, config)| config.clone()))
}

/// An active config override on the current thread.
///
/// Dropping the scope restores the settings that were active when it was
/// created. Scopes are expected to drop in reverse order of creation;
/// dropping an outer scope first also removes the scopes above it.
///
/// ```
/// use vc_serial::config::{Config, TextCase};
///
/// {
///     let _scope = Config::with(Config { text_case: TextCase::CamelCase, ..Config::default() });
///     assert_eq!(Config::current().text_case, TextCase::CamelCase);
/// }
/// assert_eq!(Config::current().text_case, TextCase::Default);
/// ```
#[must_use = "the override ends when the scope is dropped"]
pub struct ConfigScope {
    id: u64,
    // Thread-local: must be dropped on the thread that created it.
    _marker: PhantomData<*const ()>,
}

impl ConfigScope {
    pub(super) fn push(config: Config) -> Self {
        let id = NEXT_ID.get();
        NEXT_ID.set(id.wrapping_add(1));
        SCOPES.with_borrow_mut(|scopes| scopes.push((id, config)));
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Changes the settings of this scope.
    ///
    /// Has no effect once the scope was removed by dropping an outer one.
    pub fn update(&self, f: impl FnOnce(&mut Config)) {
        SCOPES.with_borrow_mut(|scopes| {
            if let Some((_, config)) = scopes.iter_mut().rev().find(|(id, _)| *id == self.id) {
                f(config);
            }
        });
    }

    /// A copy of this scope's settings.
    pub fn config(&self) -> Option<Config> {
        SCOPES.with_borrow(|scopes| {
            scopes
                .iter()
                .rev()
                .find(|(id, _)| *id == self.id)
                .map(|(_, config)| config.clone())
        })
    }
}

impl Drop for ConfigScope {
    fn drop(&mut self) {
        SCOPES.with_borrow_mut(|scopes| {
            let Some(position) = scopes.iter().rposition(|(id, _)| *id == self.id) else {
                return;
            };
            if position + 1 != scopes.len() {
                log::warn!(
                    "config scope dropped out of order, discarding {} inner scope(s)",
                    scopes.len() - position - 1
                );
            }
            scopes.truncate(position);
        });
    }
}

/// Runs `f` with `config` active on this thread.
///
/// ```
/// use vc_serial::config::{Config, with_config};
///
/// let depth = with_config(Config { max_depth: 2, ..Config::default() }, || Config::current().max_depth);
/// assert_eq!(depth, 2);
/// ```
pub fn with_config<R>(config: Config, f: impl FnOnce() -> R) -> R {
    let _scope = ConfigScope::push(config);
    f()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::super::{Config, TextCase};
    use super::with_config;

    fn camel() -> Config {
        Config {
            text_case: TextCase::CamelCase,
            ..Config::default()
        }
    }

    #[test]
    fn scopes_nest_and_restore() {
        let outer = Config::with(camel());
        {
            let inner = Config::begin_scope();
            inner.update(|c| c.max_depth = 3);
            assert_eq!(Config::current().max_depth, 3);
            assert_eq!(Config::current().text_case, TextCase::CamelCase);
        }
        assert_eq!(Config::current().max_depth, 50);
        drop(outer);
        assert_eq!(Config::current().text_case, TextCase::Default);
    }

    #[test]
    fn dropping_outer_scope_discards_inner() {
        let outer = Config::with(camel());
        let inner = Config::with(Config::default());
        drop(outer);
        assert!(inner.config().is_none());
        drop(inner);
        assert_eq!(Config::current().text_case, TextCase::Default);
    }

    #[test]
    fn scopes_are_per_thread() {
        with_config(camel(), || {
            let other = std::thread::spawn(|| Config::current().text_case);
            assert_eq!(other.join().unwrap(), TextCase::Default);
            assert_eq!(Config::current().text_case, TextCase::CamelCase);
        });
    }
}
