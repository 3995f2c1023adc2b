use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Config;
use crate::{Error, Result};

struct GlobalConfig {
    config: Option<Config>,
    locked: bool,
    strict: bool,
}

static GLOBAL: RwLock<GlobalConfig> = RwLock::new(GlobalConfig {
    config: None,
    locked: false,
    strict: false,
});

#[inline]
fn read() -> RwLockReadGuard<'static, GlobalConfig> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write() -> RwLockWriteGuard<'static, GlobalConfig> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

pub(super) fn snapshot() -> Config {
    read().config.clone().unwrap_or_default()
}

pub(super) fn init(config: Config) -> Result<()> {
    let mut global = write();
    let locked = global.locked;
    if locked && global.strict {
        return Err(Error::ConfigLocked);
    }

    match &mut global.config {
        Some(current) if locked => current.merge(&config),
        slot => *slot = Some(config),
    }
    global.locked = true;
    log::debug!("global serializer config initialized");
    Ok(())
}

pub(super) fn update(f: impl FnOnce(&mut Config)) -> Result<()> {
    let mut global = write();
    if global.locked {
        return Err(Error::ConfigLocked);
    }
    f(global.config.get_or_insert_with(Config::default));
    Ok(())
}

#[inline]
pub(super) fn is_locked() -> bool {
    read().locked
}

#[inline]
pub(super) fn set_strict_mode(strict: bool) {
    write().strict = strict;
}

pub(super) fn reset() {
    let mut global = write();
    global.config = None;
    global.locked = false;
    global.strict = false;
}
