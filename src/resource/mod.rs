//! Resource database parser: `RESOURCE_MANAGER` text to recognized keys.
//!
//! The X server stores desktop-wide preferences on the root window as a
//! newline-separated list of `key: value` lines. Only three keys matter
//! for cursor setup; everything else is ignored.

use std::io;
use std::path::Path;

/// The resource keys this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// `Xcursor.theme`: preferred cursor theme name.
    CursorTheme,
    /// `Xcursor.size`: preferred cursor size in pixels.
    CursorSize,
    /// `Xft.dpi`: font DPI, used to guess a cursor size.
    FontDpi,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 3] = [
        ResourceKey::CursorTheme,
        ResourceKey::CursorSize,
        ResourceKey::FontDpi,
    ];

    /// The literal key as it appears in the resource database.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKey::CursorTheme => "Xcursor.theme",
            ResourceKey::CursorSize => "Xcursor.size",
            ResourceKey::FontDpi => "Xft.dpi",
        }
    }

    /// Match a database key exactly (case-sensitive, no trimming).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    fn index(self) -> usize {
        match self {
            ResourceKey::CursorTheme => 0,
            ResourceKey::CursorSize => 1,
            ResourceKey::FontDpi => 2,
        }
    }
}

/// Values of the recognized resource keys.
///
/// A missing key (`None`) is distinct from a key present with an empty
/// value (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    values: [Option<String>; 3],
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, if the database contained it.
    pub fn get(&self, key: ResourceKey) -> Option<&str> {
        self.values[key.index()].as_deref()
    }

    /// Store a value, replacing any previous one for the same key.
    pub fn set(&mut self, key: ResourceKey, value: impl Into<String>) {
        self.values[key.index()] = Some(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Iterate over the keys that are present, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &str)> {
        ResourceKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
    }
}

/// Parse a `RESOURCE_MANAGER` payload.
///
/// `None` and empty payloads yield an empty mapping. The payload is read
/// like a C string: anything after the first NUL byte is ignored.
///
/// Lines are split at the first `:`. The key must match a
/// [`ResourceKey`] exactly; the value has its leading whitespace removed
/// and is otherwise kept verbatim. When a key repeats, the last line
/// wins.
///
/// A non-empty line without any `:` aborts parsing, and everything
/// collected so far is dropped. Empty lines are skipped.
///
/// Values are stored as `String`: bytes that are not valid UTF-8 are
/// replaced with U+FFFD, so such a theme name will not match its
/// directory on disk.
pub fn parse(raw: Option<&[u8]>) -> Resources {
    let Some(raw) = raw.filter(|bytes| !bytes.is_empty()) else {
        return Resources::new();
    };

    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text = String::from_utf8_lossy(&raw[..end]);

    let mut resources = Resources::new();
    for line in text.split('\n').filter(|line| !line.is_empty()) {
        let Some((key, value)) = line.split_once(':') else {
            tracing::debug!(line, "malformed resource line, discarding database");
            return Resources::new();
        };

        if let Some(key) = ResourceKey::from_name(key) {
            resources.set(key, value.trim_start_matches(is_c_space));
        }
    }

    resources
}

/// Read and parse a resource database dump, e.g. the output of
/// `xrdb -query`.
pub fn read_file(path: &Path) -> io::Result<Resources> {
    let bytes = std::fs::read(path)?;
    Ok(parse(Some(bytes.as_slice())))
}

/// Whitespace as classified by C `isspace` in the "C" locale.
pub(crate) fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}
