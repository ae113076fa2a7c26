//! Cursor theme selection.

use crate::env::{Environment, XCURSOR_THEME};
use crate::resource::{ResourceKey, Resources};

/// Theme used when nothing is configured.
pub const DEFAULT_THEME: &str = "default";

/// Pick the cursor theme: `XCURSOR_THEME`, then `Xcursor.theme`, then
/// [`DEFAULT_THEME`]. Empty values count as unset.
pub fn resolve_theme(env: &impl Environment, resources: &Resources) -> String {
    if let Some(theme) = env.var(XCURSOR_THEME).filter(|t| !t.is_empty()) {
        tracing::debug!(theme = %theme, "cursor theme from XCURSOR_THEME");
        return theme;
    }

    if let Some(theme) = resources
        .get(ResourceKey::CursorTheme)
        .filter(|t| !t.is_empty())
    {
        tracing::debug!(theme, "cursor theme from Xcursor.theme");
        return theme.to_string();
    }

    DEFAULT_THEME.to_string()
}
