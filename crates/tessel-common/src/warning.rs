//! Deduplicated warnings.
//!
//! Some non-fatal conditions repeat thousands of times in a single build (one
//! unmatched color can cover most of an image). These helpers emit each unique
//! message once through the `log` facade and drop the repeats.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a non-fatal condition (emitted once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("palette", "no palette entry for rgb(12, 34, 56)");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_emit {
        log::warn!(target: "tessel", "[{component}] {message}");
    }
}

/// Whether `message` has already been emitted for `component`.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call before starting a new build)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
