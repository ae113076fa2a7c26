//! Cursor configuration discovery for X11 connections.
//!
//! [`CursorContext`] gathers what a cursor loader needs before it can
//! load anything: the theme name, the default size, and the ARGB32
//! picture format. Theme files and images are not handled here.

pub mod context;
pub mod env;
pub mod format;
pub mod resource;
pub mod transport;

pub use context::{ContextError, CursorContext};
pub use env::{Environment, ProcessEnvironment};
pub use format::StandardFormat;
pub use resource::{ResourceKey, Resources};
pub use transport::{CursorTransport, PendingReply, ScreenGeometry, X11Transport};
