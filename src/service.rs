pub mod activity;
pub mod admin;
pub mod auth;
pub mod directory;
pub mod task;
pub mod workspace;

use std::sync::{Mutex, MutexGuard};

/// Locks a std mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
