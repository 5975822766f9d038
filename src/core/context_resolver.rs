//! # External Collaborators
//!
//! The engine never talks to the management backend itself. It gets a
//! connected handle from a `Connector` once per dispatch and asks an
//! `IdentifierResolver` to turn short, user-typed identifiers into canonical
//! ones. Both traits are implemented for plain closures so a host can wire
//! them up without defining types.

/// Opens (or reuses) a connection to the management backend.
pub trait Connector<H>: Send + Sync {
    /// # Errors
    /// Any error means the backend is unreachable; the dispatch stops there.
    fn connect(&self) -> anyhow::Result<H>;
}

impl<H, F> Connector<H> for F
where
    F: Fn() -> anyhow::Result<H> + Send + Sync,
{
    fn connect(&self) -> anyhow::Result<H> {
        self()
    }
}

/// Maps `(scope, raw identifier)` to a canonical identifier.
pub trait IdentifierResolver<H>: Send + Sync {
    /// Returns `None` when `raw` does not name anything within `scope`.
    fn resolve(&self, handle: &H, scope: Option<&str>, raw: &str) -> Option<String>;
}

impl<H, F> IdentifierResolver<H> for F
where
    F: Fn(&H, Option<&str>, &str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, handle: &H, scope: Option<&str>, raw: &str) -> Option<String> {
        self(handle, scope, raw)
    }
}

/// Accepts every identifier as already canonical.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl<H> IdentifierResolver<H> for PassthroughResolver {
    fn resolve(&self, _handle: &H, _scope: Option<&str>, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_implement_the_traits() {
        // --- Setup ---
        let connector = || -> anyhow::Result<u32> { Ok(7) };
        let resolver = |handle: &u32, scope: Option<&str>, raw: &str| -> Option<String> {
            (raw == "web").then(|| format!("{}:{}:{}", handle, scope.unwrap_or("-"), 101))
        };

        // --- Execute ---
        let handle = connector.connect().unwrap();

        // --- Assert ---
        assert_eq!(
            resolver.resolve(&handle, Some("pve1"), "web").as_deref(),
            Some("7:pve1:101")
        );
        assert_eq!(resolver.resolve(&handle, None, "db"), None);
        assert_eq!(
            IdentifierResolver::<u32>::resolve(&PassthroughResolver, &handle, None, "db").as_deref(),
            Some("db")
        );
    }
}
