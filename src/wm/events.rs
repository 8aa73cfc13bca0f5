//! Events Module
//!
//! Protocol events as the window manager sees them. Every x11rb event is
//! folded into [`WmEvent`]: one variant per kind the dispatcher acts on, an
//! `Error` variant for asynchronous protocol errors, and `Ignored` carrying
//! the exact kind that was skipped.

use std::collections::HashMap;

use x11rb::protocol::Event;

use crate::wm::configure::ConfigureRequest;
use crate::wm::error::ProtocolError;
use crate::wm::Xid;

/// An event delivered by the display server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmEvent {
    CreateNotify { window: Xid },
    DestroyNotify { window: Xid },
    ReparentNotify { window: Xid, parent: Xid },
    CirculateNotify { window: Xid },
    ConfigureNotify { window: Xid },
    MapNotify { window: Xid },
    GravityNotify { window: Xid },
    /// `event` is the window the notification was reported on: the
    /// unmapped window itself or its parent
    UnmapNotify { event: Xid, window: Xid },
    KeyPress { window: Xid, keycode: u8 },
    ConfigureRequest(ConfigureRequest),
    MapRequest { window: Xid },
    Error(ProtocolError),
    Ignored(IgnoredKind),
}

/// Event kinds the window manager deliberately does nothing with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredKind {
    MappingNotify,
    VisibilityNotify,
    KeyRelease,
    ButtonPress,
    ButtonRelease,
    MotionNotify,
    EnterNotify,
    LeaveNotify,
    FocusIn,
    FocusOut,
    KeymapNotify,
    Expose,
    GraphicsExposure,
    NoExposure,
    CirculateRequest,
    ResizeRequest,
    ColormapNotify,
    ClientMessage,
    PropertyNotify,
    SelectionClear,
    SelectionNotify,
    SelectionRequest,
    /// Extension or unrecognized event
    Other,
}

impl WmEvent {
    /// Short kind name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNotify { .. } => "CreateNotify",
            Self::DestroyNotify { .. } => "DestroyNotify",
            Self::ReparentNotify { .. } => "ReparentNotify",
            Self::CirculateNotify { .. } => "CirculateNotify",
            Self::ConfigureNotify { .. } => "ConfigureNotify",
            Self::MapNotify { .. } => "MapNotify",
            Self::GravityNotify { .. } => "GravityNotify",
            Self::UnmapNotify { .. } => "UnmapNotify",
            Self::KeyPress { .. } => "KeyPress",
            Self::ConfigureRequest(_) => "ConfigureRequest",
            Self::MapRequest { .. } => "MapRequest",
            Self::Error(_) => "Error",
            Self::Ignored(_) => "Ignored",
        }
    }
}

impl From<Event> for WmEvent {
    fn from(event: Event) -> Self {
        use IgnoredKind as I;

        match event {
            Event::CreateNotify(e) => Self::CreateNotify { window: e.window },
            Event::DestroyNotify(e) => Self::DestroyNotify { window: e.window },
            Event::ReparentNotify(e) => Self::ReparentNotify {
                window: e.window,
                parent: e.parent,
            },
            Event::CirculateNotify(e) => Self::CirculateNotify { window: e.window },
            Event::ConfigureNotify(e) => Self::ConfigureNotify { window: e.window },
            Event::MapNotify(e) => Self::MapNotify { window: e.window },
            Event::GravityNotify(e) => Self::GravityNotify { window: e.window },
            Event::UnmapNotify(e) => Self::UnmapNotify {
                event: e.event,
                window: e.window,
            },
            Event::KeyPress(e) => Self::KeyPress {
                window: e.event,
                keycode: e.detail,
            },
            Event::ConfigureRequest(e) => Self::ConfigureRequest(ConfigureRequest::from(&e)),
            Event::MapRequest(e) => Self::MapRequest { window: e.window },
            Event::Error(e) => Self::Error(e.into()),

            Event::MappingNotify(_) => Self::Ignored(I::MappingNotify),
            Event::VisibilityNotify(_) => Self::Ignored(I::VisibilityNotify),
            Event::KeyRelease(_) => Self::Ignored(I::KeyRelease),
            Event::ButtonPress(_) => Self::Ignored(I::ButtonPress),
            Event::ButtonRelease(_) => Self::Ignored(I::ButtonRelease),
            Event::MotionNotify(_) => Self::Ignored(I::MotionNotify),
            Event::EnterNotify(_) => Self::Ignored(I::EnterNotify),
            Event::LeaveNotify(_) => Self::Ignored(I::LeaveNotify),
            Event::FocusIn(_) => Self::Ignored(I::FocusIn),
            Event::FocusOut(_) => Self::Ignored(I::FocusOut),
            Event::KeymapNotify(_) => Self::Ignored(I::KeymapNotify),
            Event::Expose(_) => Self::Ignored(I::Expose),
            Event::GraphicsExposure(_) => Self::Ignored(I::GraphicsExposure),
            Event::NoExposure(_) => Self::Ignored(I::NoExposure),
            Event::CirculateRequest(_) => Self::Ignored(I::CirculateRequest),
            Event::ResizeRequest(_) => Self::Ignored(I::ResizeRequest),
            Event::ColormapNotify(_) => Self::Ignored(I::ColormapNotify),
            Event::ClientMessage(_) => Self::Ignored(I::ClientMessage),
            Event::PropertyNotify(_) => Self::Ignored(I::PropertyNotify),
            Event::SelectionClear(_) => Self::Ignored(I::SelectionClear),
            Event::SelectionNotify(_) => Self::Ignored(I::SelectionNotify),
            Event::SelectionRequest(_) => Self::Ignored(I::SelectionRequest),
            _ => Self::Ignored(I::Other),
        }
    }
}

/// Running counts of what the dispatcher has seen
#[derive(Debug, Default)]
pub struct DispatchStats {
    pub handled: u64,
    ignored: HashMap<IgnoredKind, u64>,
}

impl DispatchStats {
    /// Count an ignored event; returns how many of that kind so far
    pub fn record_ignored(&mut self, kind: IgnoredKind) -> u64 {
        let count = self.ignored.entry(kind).or_insert(0);
        *count += 1;
        *count
    }

    pub fn ignored(&self, kind: IgnoredKind) -> u64 {
        self.ignored.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_ignored(&self) -> u64 {
        self.ignored.values().sum()
    }
}
