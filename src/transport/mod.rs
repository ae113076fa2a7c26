//! Transport abstraction: what the cursor context needs from a display
//! connection.
//!
//! The context never talks to the wire directly. It issues requests
//! through [`CursorTransport`] and later waits on the returned
//! [`PendingReply`] handles, which lets two queries be in flight at once.
//! The x11rb adapter lives in [`x11`].

pub mod x11;

pub use x11::X11Transport;

use x11rb::protocol::render::QueryPictFormatsReply;
use x11rb::protocol::xproto::{Font, Window};

use crate::context::ContextError;

/// Maximum `RESOURCE_MANAGER` length requested, in 32-bit units.
pub const RESOURCE_MANAGER_MAX_LENGTH: u32 = 16 * 1024;

/// Root window and size of one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub root: Window,
    pub width: u16,
    pub height: u16,
}

/// A request whose reply has not been awaited yet.
pub trait PendingReply {
    type Output;

    /// Block until the reply arrives.
    ///
    /// Any failure (request never sent, error reply, lost connection)
    /// yields `None`.
    fn wait(self) -> Option<Self::Output>;
}

/// An already-available (or already-failed) reply.
impl<T> PendingReply for Option<T> {
    type Output = T;

    fn wait(self) -> Option<T> {
        self
    }
}

/// Display-connection operations consumed by
/// [`CursorContext`](crate::CursorContext).
pub trait CursorTransport {
    /// Pending `RESOURCE_MANAGER` payload.
    type ResourceCookie: PendingReply<Output = Vec<u8>>;
    /// Pending picture format enumeration.
    type FormatsCookie: PendingReply<Output = QueryPictFormatsReply>;

    /// Geometry of screen `screen_num` from the connection setup.
    fn screen(&self, screen_num: usize) -> Option<ScreenGeometry>;

    /// Allocate a fresh resource id.
    fn generate_id(&self) -> Result<u32, ContextError>;

    /// Request the `RESOURCE_MANAGER` string property of `root`.
    fn request_resource_manager(&self, root: Window) -> Self::ResourceCookie;

    /// Request the list of supported picture formats.
    fn request_pict_formats(&self) -> Self::FormatsCookie;

    /// Open the server font `name` as `font`.
    ///
    /// Best effort: no reply is awaited and errors are not reported.
    fn open_font(&self, font: Font, name: &[u8]);
}

impl<T: CursorTransport + ?Sized> CursorTransport for &T {
    type ResourceCookie = T::ResourceCookie;
    type FormatsCookie = T::FormatsCookie;

    fn screen(&self, screen_num: usize) -> Option<ScreenGeometry> {
        (**self).screen(screen_num)
    }

    fn generate_id(&self) -> Result<u32, ContextError> {
        (**self).generate_id()
    }

    fn request_resource_manager(&self, root: Window) -> Self::ResourceCookie {
        (**self).request_resource_manager(root)
    }

    fn request_pict_formats(&self) -> Self::FormatsCookie {
        (**self).request_pict_formats()
    }

    fn open_font(&self, font: Font, name: &[u8]) {
        (**self).open_font(font, name)
    }
}
