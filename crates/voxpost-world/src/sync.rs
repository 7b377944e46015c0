//! Lock helpers.
//!
//! A panic while holding one of the world's locks cannot leave the guarded
//! sets half-updated (every mutation is a single insert, remove or swap), so
//! poisoned locks are recovered rather than propagated.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
