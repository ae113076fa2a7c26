//! Environment lookups used by size and theme resolution.

use std::collections::HashMap;

/// Overrides the cursor size for every client.
pub const XCURSOR_SIZE: &str = "XCURSOR_SIZE";

/// Overrides the cursor theme for every client.
pub const XCURSOR_THEME: &str = "XCURSOR_THEME";

/// Read-only source of environment variables.
///
/// Injected into the cursor context so resolution can be exercised
/// without touching the process environment.
pub trait Environment {
    /// Value of `name`, or `None` if unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
///
/// Non-UTF-8 values are converted lossily rather than treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_environment_lookup() {
        let env = HashMap::from([(XCURSOR_SIZE.to_string(), "32".to_string())]);
        assert_eq!(env.var(XCURSOR_SIZE).as_deref(), Some("32"));
        assert_eq!(env.var(XCURSOR_THEME), None);
    }

    #[test]
    fn process_environment_unset_variable() {
        assert_eq!(
            ProcessEnvironment.var("XCURSORCTX_TEST_SURELY_UNSET_VARIABLE"),
            None
        );
    }
}
