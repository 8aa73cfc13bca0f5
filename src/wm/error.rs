//! Error Module
//!
//! Errors raised by the window manager and the sink for asynchronous
//! protocol errors reported by the X server.

use std::fmt;

use thiserror::Error;
use tracing::error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::ErrorKind;
use x11rb::x11_utils::X11Error;

use crate::wm::Xid;

/// An error reply from the X server, detached from the connection that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub kind: ErrorKind,
    pub error_code: u8,
    pub major_opcode: u8,
    pub minor_opcode: u16,
    pub request_name: Option<&'static str>,
    /// Resource id (or bad value) the server complained about
    pub resource_id: u32,
}

impl ProtocolError {
    /// Human readable description of the error code, in Xlib wording
    pub fn description(&self) -> &'static str {
        describe(self.kind)
    }
}

impl From<X11Error> for ProtocolError {
    fn from(e: X11Error) -> Self {
        Self {
            kind: e.error_kind,
            error_code: e.error_code,
            major_opcode: e.major_opcode,
            minor_opcode: e.minor_opcode,
            request_name: e.request_name,
            resource_id: e.bad_value,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (request {}, resource 0x{:x})",
            self.description(),
            self.major_opcode,
            self.resource_id
        )
    }
}

impl std::error::Error for ProtocolError {}

/// Everything that can stop the window manager
#[derive(Debug, Error)]
pub enum WmError {
    #[error("failed to open X display {display}")]
    Connect {
        display: String,
        #[source]
        source: ConnectError,
    },

    #[error("connection to the X server failed")]
    Connection(#[from] ConnectionError),

    #[error("X server rejected a request: {0}")]
    Protocol(ProtocolError),

    #[error("no X resource ids left")]
    IdsExhausted,

    /// QueryTree on the root answered with a different root
    #[error("query_tree returned root 0x{returned:x}, expected 0x{expected:x}")]
    RootMismatch { expected: Xid, returned: Xid },

    #[error("failed to read attributes of window 0x{window:x}")]
    Attributes {
        window: Xid,
        #[source]
        source: Box<WmError>,
    },
}

impl WmError {
    /// The server error behind this failure, if the server sent one
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e) => Some(e),
            Self::Attributes { source, .. } => source.protocol(),
            _ => None,
        }
    }
}

impl From<ProtocolError> for WmError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<ReplyError> for WmError {
    fn from(e: ReplyError) -> Self {
        match e {
            ReplyError::ConnectionError(e) => Self::Connection(e),
            ReplyError::X11Error(e) => Self::Protocol(e.into()),
        }
    }
}

impl From<ReplyOrIdError> for WmError {
    fn from(e: ReplyOrIdError) -> Self {
        match e {
            ReplyOrIdError::IdsExhausted => Self::IdsExhausted,
            ReplyOrIdError::ConnectionError(e) => Self::Connection(e),
            ReplyOrIdError::X11Error(e) => Self::Protocol(e.into()),
        }
    }
}

pub type Result<T, E = WmError> = std::result::Result<T, E>;

/// Log an asynchronous protocol error and carry on.
///
/// Errors from unchecked requests arrive here through the event queue. None of
/// them is fatal: the request that caused it is not retried.
pub fn log_protocol_error(err: &ProtocolError) {
    error!(
        "Received X error: request {} ({}), minor {}, error code {} - {}, resource id 0x{:x}",
        err.major_opcode,
        err.request_name.unwrap_or("unknown"),
        err.minor_opcode,
        err.error_code,
        err.description(),
        err.resource_id
    );
}

fn describe(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Request => "BadRequest (invalid request code or no such operation)",
        ErrorKind::Value => "BadValue (integer parameter out of range for operation)",
        ErrorKind::Window => "BadWindow (invalid Window parameter)",
        ErrorKind::Pixmap => "BadPixmap (invalid Pixmap parameter)",
        ErrorKind::Atom => "BadAtom (invalid Atom parameter)",
        ErrorKind::Cursor => "BadCursor (invalid Cursor parameter)",
        ErrorKind::Font => "BadFont (invalid Font parameter)",
        ErrorKind::Match => "BadMatch (invalid parameter attributes)",
        ErrorKind::Drawable => "BadDrawable (invalid Pixmap or Window parameter)",
        ErrorKind::Access => "BadAccess (attempt to access private resource denied)",
        ErrorKind::Alloc => "BadAlloc (insufficient resources for operation)",
        ErrorKind::Colormap => "BadColor (invalid Colormap parameter)",
        ErrorKind::GContext => "BadGC (invalid GC parameter)",
        ErrorKind::IDChoice => "BadIDChoice (invalid resource ID chosen for this connection)",
        ErrorKind::Name => "BadName (named color or font does not exist)",
        ErrorKind::Length => "BadLength (poly request too large or internal Xlib length error)",
        ErrorKind::Implementation => "BadImplementation (server does not implement operation)",
        _ => "unknown or extension error",
    }
}
