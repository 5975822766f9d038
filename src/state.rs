// src/state.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

/// The single, process-wide scope value (e.g. the selected node).
///
/// The engine owns exactly one of these. Reads happen on every dispatch and in
/// the help generator; writes only come from an administrative operation. The
/// mutex serializes those writes when the hosting transport is asynchronous.
#[derive(Debug, Default)]
pub struct SessionContext {
    scope: Mutex<Option<String>>,
}

impl SessionContext {
    /// Starts with the given scope, if any.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            scope: Mutex::new(initial),
        }
    }

    /// Returns a copy of the current scope value, if any.
    pub fn get_scope(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Whether a scope value is selected.
    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    /// Replaces the scope value and returns the previous one.
    pub fn set_scope(&self, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        log::info!("Session scope set to '{}'.", value);
        self.lock().replace(value)
    }

    /// Empties the scope and returns what it held.
    pub fn clear(&self) -> Option<String> {
        log::info!("Session scope cleared.");
        self.lock().take()
    }

    // A panicking operation body must not lock the session forever.
    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.scope.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_empty_by_default() {
        let session = SessionContext::default();
        assert!(!session.is_set());
        assert_eq!(session.get_scope(), None);
    }

    #[test]
    fn test_set_and_clear_return_previous_value() {
        // --- Setup ---
        let session = SessionContext::new(Some("pve1".to_string()));

        // --- Execute & Assert ---
        assert_eq!(session.set_scope("pve2"), Some("pve1".to_string()));
        assert_eq!(session.get_scope().as_deref(), Some("pve2"));
        assert_eq!(session.clear(), Some("pve2".to_string()));
        assert!(!session.is_set());
        assert_eq!(session.clear(), None);
    }
}
