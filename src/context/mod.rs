//! Cursor context: resolved theme, size and picture format for a
//! display connection.
//!
//! Construction issues the `RESOURCE_MANAGER` and `QueryPictFormats`
//! requests back to back, opens the legacy `cursor` font, then collects
//! both replies. Missing replies degrade to "no data"; only id
//! allocation and screen lookup can fail.

mod size;
mod theme;

pub use size::{atoi, resolve_default_size};
pub use theme::{DEFAULT_THEME, resolve_theme};

use x11rb::connection::Connection;
use x11rb::protocol::render::{Pictforminfo, QueryPictFormatsReply};
use x11rb::protocol::xproto::{Font, Window};

use crate::env::{Environment, ProcessEnvironment};
use crate::format::{StandardFormat, find_standard_format};
use crate::resource::{self, ResourceKey, Resources};
use crate::transport::{CursorTransport, PendingReply, ScreenGeometry, X11Transport};

/// Name of the server-side glyph font holding the core cursors.
pub const CURSOR_FONT: &[u8] = b"cursor";

/// Errors that abort context construction.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The server ran out of resource ids for this client.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The connection setup has no screen with this number.
    #[error("no screen {0} in connection setup")]
    NoScreen(usize),

    /// The transport failed while allocating an id.
    #[error("connection: {0}")]
    Connection(String),
}

/// Cursor configuration discovered for one screen.
///
/// Owns every value it resolved; the connection itself is only borrowed
/// through the transport.
#[derive(Debug)]
pub struct CursorContext<T: CursorTransport> {
    transport: T,
    screen: ScreenGeometry,
    cursor_font: Font,
    resources: Resources,
    pict_formats: Option<QueryPictFormatsReply>,
    /// Index of the ARGB32 entry in `pict_formats.formats`.
    argb32: Option<usize>,
    size: u32,
    theme: String,
}

impl<'c, C: Connection> CursorContext<X11Transport<'c, C>> {
    /// Build a context for `screen_num` of an x11rb connection, reading
    /// overrides from the process environment.
    pub fn from_connection(conn: &'c C, screen_num: usize) -> Result<Self, ContextError> {
        Self::with_environment(X11Transport::new(conn), screen_num, &ProcessEnvironment)
    }

    /// The borrowed connection.
    pub fn conn(&self) -> &'c C {
        self.transport.conn()
    }
}

impl<T: CursorTransport> CursorContext<T> {
    /// Build a context for the first screen, reading overrides from the
    /// process environment.
    pub fn new(transport: T) -> Result<Self, ContextError> {
        Self::with_environment(transport, 0, &ProcessEnvironment)
    }

    /// Build a context for `screen_num` with an explicit environment.
    pub fn with_environment(
        transport: T,
        screen_num: usize,
        env: &impl Environment,
    ) -> Result<Self, ContextError> {
        let screen = transport
            .screen(screen_num)
            .ok_or(ContextError::NoScreen(screen_num))?;

        // Allocated before any request goes out so failure leaves
        // nothing in flight.
        let cursor_font = transport.generate_id()?;

        let rm_cookie = transport.request_resource_manager(screen.root);
        let pf_cookie = transport.request_pict_formats();
        transport.open_font(cursor_font, CURSOR_FONT);

        let resources = resource::parse(rm_cookie.wait().as_deref());

        let pict_formats = pf_cookie.wait();
        let argb32 = pict_formats
            .as_ref()
            .and_then(|reply| find_standard_format(reply, StandardFormat::Argb32));

        let size = resolve_default_size(env, &resources, screen);
        let theme = resolve_theme(env, &resources);

        tracing::debug!(
            root = screen.root,
            cursor_font,
            size,
            theme = %theme,
            argb32 = argb32.is_some(),
            "cursor context ready"
        );

        Ok(Self {
            transport,
            screen,
            cursor_font,
            resources,
            pict_formats,
            argb32,
            size,
            theme,
        })
    }

    /// Release the context. The connection stays open.
    pub fn destroy(self) {
        tracing::trace!(cursor_font = self.cursor_font, "cursor context destroyed");
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Root window of the screen the context was built for.
    pub fn root(&self) -> Window {
        self.screen.root
    }

    pub fn screen(&self) -> ScreenGeometry {
        self.screen
    }

    /// Id under which the legacy `cursor` font was opened.
    pub fn cursor_font(&self) -> Font {
        self.cursor_font
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resource(&self, key: ResourceKey) -> Option<&str> {
        self.resources.get(key)
    }

    /// Default cursor size in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Cursor theme name, [`DEFAULT_THEME`] when nothing is configured.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The full picture format list, if the server answered.
    pub fn pict_formats(&self) -> Option<&QueryPictFormatsReply> {
        self.pict_formats.as_ref()
    }

    /// The standard ARGB32 picture format, if the server offers one.
    pub fn pict_format(&self) -> Option<&Pictforminfo> {
        let index = self.argb32?;
        self.pict_formats.as_ref()?.formats.get(index)
    }

    /// Look up another standard format in the stored reply.
    pub fn standard_format(&self, format: StandardFormat) -> Option<&Pictforminfo> {
        let reply = self.pict_formats.as_ref()?;
        find_standard_format(reply, format).map(|index| &reply.formats[index])
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::env::{XCURSOR_SIZE, XCURSOR_THEME};
    use crate::format::tests::{format_info, reply_with};

    type CallLog = Rc<RefCell<Vec<String>>>;

    struct FakeCookie<T> {
        label: &'static str,
        log: CallLog,
        value: Option<T>,
    }

    impl<T> PendingReply for FakeCookie<T> {
        type Output = T;

        fn wait(self) -> Option<T> {
            self.log.borrow_mut().push(format!("wait {}", self.label));
            self.value
        }
    }

    #[derive(Debug)]
    struct FakeDisplay {
        screens: Vec<ScreenGeometry>,
        resource_manager: Option<Vec<u8>>,
        formats: Option<QueryPictFormatsReply>,
        ids_exhausted: bool,
        next_id: Cell<u32>,
        log: CallLog,
    }

    impl FakeDisplay {
        fn new() -> Self {
            Self {
                screens: vec![ScreenGeometry {
                    root: 0x1e1,
                    width: 1080,
                    height: 1920,
                }],
                resource_manager: None,
                formats: None,
                ids_exhausted: false,
                next_id: Cell::new(0x0040_0000),
                log: Rc::default(),
            }
        }

        fn with_resources(mut self, text: &str) -> Self {
            self.resource_manager = Some(text.as_bytes().to_vec());
            self
        }

        fn with_formats(mut self, formats: Vec<Pictforminfo>) -> Self {
            self.formats = Some(reply_with(formats));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl CursorTransport for FakeDisplay {
        type ResourceCookie = FakeCookie<Vec<u8>>;
        type FormatsCookie = FakeCookie<QueryPictFormatsReply>;

        fn screen(&self, screen_num: usize) -> Option<ScreenGeometry> {
            self.screens.get(screen_num).copied()
        }

        fn generate_id(&self) -> Result<u32, ContextError> {
            self.log.borrow_mut().push("generate_id".into());
            if self.ids_exhausted {
                return Err(ContextError::ResourceExhausted("ids exhausted".into()));
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            Ok(id)
        }

        fn request_resource_manager(&self, root: Window) -> FakeCookie<Vec<u8>> {
            self.log
                .borrow_mut()
                .push(format!("get_property 0x{root:x}"));
            FakeCookie {
                label: "get_property",
                log: Rc::clone(&self.log),
                value: self.resource_manager.clone(),
            }
        }

        fn request_pict_formats(&self) -> FakeCookie<QueryPictFormatsReply> {
            self.log.borrow_mut().push("query_pict_formats".into());
            FakeCookie {
                label: "query_pict_formats",
                log: Rc::clone(&self.log),
                value: self.formats.clone(),
            }
        }

        fn open_font(&self, font: Font, name: &[u8]) {
            self.log.borrow_mut().push(format!(
                "open_font 0x{font:x} {}",
                String::from_utf8_lossy(name)
            ));
        }
    }

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn requests_are_pipelined() {
        let display = FakeDisplay::new();
        CursorContext::with_environment(&display, 0, &no_env()).unwrap();

        assert_eq!(
            display.calls(),
            vec![
                "generate_id",
                "get_property 0x1e1",
                "query_pict_formats",
                "open_font 0x400000 cursor",
                "wait get_property",
                "wait query_pict_formats",
            ]
        );
    }

    #[test]
    fn new_uses_first_screen() {
        let display = FakeDisplay::new().with_resources("Xft.dpi: 96\n");
        let ctx = CursorContext::new(&display).unwrap();

        assert_eq!(ctx.root(), 0x1e1);
        assert_eq!(ctx.cursor_font(), 0x0040_0000);
        assert_eq!(ctx.resource(ResourceKey::FontDpi), Some("96"));
        if std::env::var_os(XCURSOR_SIZE).is_none() {
            assert_eq!(ctx.size(), 21);
        }
        assert_eq!(
            display.calls(),
            vec![
                "generate_id",
                "get_property 0x1e1",
                "query_pict_formats",
                "open_font 0x400000 cursor",
                "wait get_property",
                "wait query_pict_formats",
            ]
        );
    }

    #[test]
    fn populated_context() {
        let display = FakeDisplay::new()
            .with_resources("Xcursor.theme: Foo\nXcursor.size: 32\nXft.dpi: 96\n")
            .with_formats(vec![
                format_info(0x21, StandardFormat::A8),
                format_info(0x24, StandardFormat::Argb32),
            ]);

        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();
        assert_eq!(ctx.root(), 0x1e1);
        assert_eq!(ctx.cursor_font(), 0x0040_0000);
        assert_eq!(ctx.resource(ResourceKey::CursorTheme), Some("Foo"));
        assert_eq!(ctx.resource(ResourceKey::FontDpi), Some("96"));
        assert_eq!(ctx.theme(), "Foo");
        assert_eq!(ctx.size(), 32);
        assert_eq!(ctx.pict_format().map(|f| f.id), Some(0x24));
        assert_eq!(
            ctx.standard_format(StandardFormat::A8).map(|f| f.id),
            Some(0x21)
        );
        ctx.destroy();
    }

    #[test]
    fn missing_replies_are_tolerated() {
        let display = FakeDisplay::new();
        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();

        assert!(ctx.resources().is_empty());
        assert!(ctx.pict_formats().is_none());
        assert!(ctx.pict_format().is_none());
        assert_eq!(ctx.theme(), DEFAULT_THEME);
        // min(1080, 1920) / 48
        assert_eq!(ctx.size(), 22);
    }

    #[test]
    fn formats_without_argb32() {
        let display = FakeDisplay::new().with_formats(vec![format_info(5, StandardFormat::Rgb24)]);
        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();

        assert!(ctx.pict_formats().is_some());
        assert!(ctx.pict_format().is_none());
    }

    #[test]
    fn malformed_database_falls_back_to_geometry() {
        let display = FakeDisplay::new().with_resources("Xcursor.size: 64\nbroken line\n");
        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();

        assert!(ctx.resources().is_empty());
        assert_eq!(ctx.size(), 22);
    }

    #[test]
    fn environment_overrides_database() {
        let display = FakeDisplay::new().with_resources("Xcursor.size: 64\nXcursor.theme: Foo\n");
        let env = HashMap::from([
            (XCURSOR_SIZE.to_string(), "24".to_string()),
            (XCURSOR_THEME.to_string(), "Bar".to_string()),
        ]);
        let ctx = CursorContext::with_environment(&display, 0, &env).unwrap();

        assert_eq!(ctx.size(), 24);
        assert_eq!(ctx.theme(), "Bar");
        // The database value is still recorded.
        assert_eq!(ctx.resource(ResourceKey::CursorSize), Some("64"));
    }

    #[test]
    fn dpi_tier() {
        let display = FakeDisplay::new().with_resources("Xft.dpi: 96\n");
        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();
        assert_eq!(ctx.size(), 21);
    }

    #[test]
    fn selects_requested_screen() {
        let mut display = FakeDisplay::new();
        display.screens.push(ScreenGeometry {
            root: 0x2e2,
            width: 3840,
            height: 2160,
        });

        let ctx = CursorContext::with_environment(&display, 1, &no_env()).unwrap();
        assert_eq!(ctx.root(), 0x2e2);
        assert_eq!(ctx.size(), 45);
        assert_eq!(display.calls()[1], "get_property 0x2e2");
    }

    #[test]
    fn missing_screen_is_an_error() {
        let display = FakeDisplay::new();
        let err = CursorContext::with_environment(&display, 3, &no_env()).unwrap_err();
        assert!(matches!(err, ContextError::NoScreen(3)));
        assert!(display.calls().is_empty());
    }

    #[test]
    fn id_exhaustion_issues_no_requests() {
        let mut display = FakeDisplay::new();
        display.ids_exhausted = true;

        let err = CursorContext::with_environment(&display, 0, &no_env()).unwrap_err();
        assert!(matches!(err, ContextError::ResourceExhausted(_)));
        assert_eq!(display.calls(), vec!["generate_id"]);
    }

    #[test]
    fn repeated_create_destroy() {
        let display = FakeDisplay::new()
            .with_resources("Xcursor.theme: Foo\nXft.dpi: 144\n")
            .with_formats(vec![format_info(0x24, StandardFormat::Argb32)]);

        for i in 0..100u32 {
            let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();
            assert_eq!(ctx.cursor_font(), 0x0040_0000 + i);
            assert_eq!(ctx.size(), 32);
            assert_eq!(ctx.pict_format().map(|f| f.id), Some(0x24));
            ctx.destroy();
        }
    }

    #[test]
    fn pict_format_lives_as_long_as_context() {
        let display = FakeDisplay::new().with_formats(vec![
            format_info(0x20, StandardFormat::Rgb24),
            format_info(0x24, StandardFormat::Argb32),
        ]);
        let ctx = CursorContext::with_environment(&display, 0, &no_env()).unwrap();

        let first = ctx.pict_format().map(|f| f.id);
        let again = ctx.pict_format().map(|f| (f.id, f.depth));
        assert_eq!(first, Some(0x24));
        assert_eq!(again, Some((0x24, 32)));
    }
}
