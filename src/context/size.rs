//! Default cursor size policy.
//!
//! Sources, first match wins:
//! 1. `XCURSOR_SIZE` from the environment.
//! 2. `Xcursor.size` from the resource database.
//! 3. `Xft.dpi * 16 / 72`, only when the DPI is positive.
//! 4. The smaller screen dimension divided by 48.
//!
//! Sources 1 and 2 are explicit user configuration and are returned
//! as-is, even when they parse to 0.

use crate::env::{Environment, XCURSOR_SIZE};
use crate::resource::{ResourceKey, Resources, is_c_space};
use crate::transport::ScreenGeometry;

/// Compute the default cursor size in pixels.
///
/// A negative `XCURSOR_SIZE` or `Xcursor.size` resolves to 0 rather than
/// wrapping to a huge unsigned value. The source still counts as set, so
/// lower tiers are not consulted.
pub fn resolve_default_size(
    env: &impl Environment,
    resources: &Resources,
    screen: ScreenGeometry,
) -> u32 {
    if let Some(value) = env.var(XCURSOR_SIZE) {
        let size = clamp_size(atoi(&value));
        tracing::debug!(value = %value, size, "cursor size from XCURSOR_SIZE");
        return size;
    }

    if let Some(value) = resources.get(ResourceKey::CursorSize) {
        let size = clamp_size(atoi(value));
        tracing::debug!(value, size, "cursor size from Xcursor.size");
        return size;
    }

    if let Some(value) = resources.get(ResourceKey::FontDpi) {
        let dpi = atoi(value);
        if dpi > 0 {
            let size = clamp_size(i64::from(dpi) * 16 / 72);
            tracing::debug!(dpi, size, "cursor size from Xft.dpi");
            return size;
        }
        tracing::debug!(value, "ignoring non-positive Xft.dpi");
    }

    let size = u32::from(screen.width.min(screen.height) / 48);
    tracing::debug!(
        width = screen.width,
        height = screen.height,
        size,
        "cursor size from screen geometry"
    );
    size
}

/// Negative sizes become 0; the caller still treats the source as set.
fn clamp_size(value: impl Into<i64>) -> u32 {
    u32::try_from(value.into().max(0)).unwrap_or(u32::MAX)
}

/// Integer parse with C `atoi` semantics.
///
/// Leading whitespace and an optional sign are accepted, digits are read
/// up to the first non-digit, and an input without digits is 0.
/// Out-of-range values saturate.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start_matches(is_c_space);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }

    i32::try_from(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX))).unwrap_or(0)
}
