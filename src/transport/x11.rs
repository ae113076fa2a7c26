//! x11rb adapter for [`CursorTransport`].
//!
//! Wraps any `x11rb::connection::Connection` by reference. The
//! connection is borrowed for the lifetime of the transport and is never
//! closed here.

use x11rb::connection::Connection;
use x11rb::cookie::Cookie;
use x11rb::errors::ReplyOrIdError;
use x11rb::protocol::render::{self, QueryPictFormatsReply};
use x11rb::protocol::xproto::{self, AtomEnum, Font, GetPropertyReply, Window};

use super::{CursorTransport, PendingReply, RESOURCE_MANAGER_MAX_LENGTH, ScreenGeometry};
use crate::context::ContextError;

/// [`CursorTransport`] over an x11rb connection.
#[derive(Debug)]
pub struct X11Transport<'c, C> {
    conn: &'c C,
}

impl<C> Clone for X11Transport<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for X11Transport<'_, C> {}

impl<'c, C: Connection> X11Transport<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn conn(&self) -> &'c C {
        self.conn
    }
}

/// In-flight `GetProperty` for `RESOURCE_MANAGER`.
pub struct PendingProperty<'c, C: Connection>(Option<Cookie<'c, C, GetPropertyReply>>);

impl<C: Connection> PendingReply for PendingProperty<'_, C> {
    type Output = Vec<u8>;

    fn wait(self) -> Option<Vec<u8>> {
        match self.0?.reply() {
            Ok(reply) => Some(reply.value),
            Err(e) => {
                tracing::debug!(error = %e, "RESOURCE_MANAGER reply failed");
                None
            }
        }
    }
}

/// In-flight RENDER `QueryPictFormats`.
pub struct PendingFormats<'c, C: Connection>(Option<Cookie<'c, C, QueryPictFormatsReply>>);

impl<C: Connection> PendingReply for PendingFormats<'_, C> {
    type Output = QueryPictFormatsReply;

    fn wait(self) -> Option<QueryPictFormatsReply> {
        match self.0?.reply() {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::debug!(error = %e, "QueryPictFormats reply failed");
                None
            }
        }
    }
}

impl<'c, C: Connection> CursorTransport for X11Transport<'c, C> {
    type ResourceCookie = PendingProperty<'c, C>;
    type FormatsCookie = PendingFormats<'c, C>;

    fn screen(&self, screen_num: usize) -> Option<ScreenGeometry> {
        self.conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| ScreenGeometry {
                root: screen.root,
                width: screen.width_in_pixels,
                height: screen.height_in_pixels,
            })
    }

    fn generate_id(&self) -> Result<u32, ContextError> {
        Connection::generate_id(self.conn).map_err(|e| match e {
            ReplyOrIdError::IdsExhausted => {
                ContextError::ResourceExhausted("X11 resource ids exhausted".into())
            }
            other => ContextError::Connection(format!("generate_id: {other}")),
        })
    }

    fn request_resource_manager(&self, root: Window) -> PendingProperty<'c, C> {
        let cookie = xproto::get_property(
            self.conn,
            false,
            root,
            AtomEnum::RESOURCE_MANAGER,
            AtomEnum::STRING,
            0,
            RESOURCE_MANAGER_MAX_LENGTH,
        );
        match cookie {
            Ok(cookie) => PendingProperty(Some(cookie)),
            Err(e) => {
                tracing::debug!(error = %e, "get_property RESOURCE_MANAGER send failed");
                PendingProperty(None)
            }
        }
    }

    fn request_pict_formats(&self) -> PendingFormats<'c, C> {
        match render::query_pict_formats(self.conn) {
            Ok(cookie) => PendingFormats(Some(cookie)),
            Err(e) => {
                // Also the path taken when the server lacks RENDER.
                tracing::debug!(error = %e, "query_pict_formats send failed");
                PendingFormats(None)
            }
        }
    }

    fn open_font(&self, font: Font, name: &[u8]) {
        match xproto::open_font(self.conn, font, name) {
            Ok(cookie) => cookie.ignore_error(),
            Err(e) => tracing::debug!(error = %e, font, "open_font send failed"),
        }
    }
}
