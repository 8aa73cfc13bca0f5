//! ConfigureRequest handling
//!
//! Clients ask to move, resize or restack themselves; the manager honors the
//! request as-is and mirrors it onto the frame so decoration and client stay
//! in sync.

use tracing::info;
use x11rb::protocol::xproto::{ConfigWindow, ConfigureRequestEvent, ConfigureWindowAux, StackMode};

use crate::wm::display::XConn;
use crate::wm::error::Result;
use crate::wm::{WindowManager, Xid};

/// A ConfigureRequest as received from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: Xid,
    pub parent: Xid,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub sibling: Xid,
    pub stack_mode: StackMode,
    /// Which of the fields above the client actually asked for
    pub value_mask: ConfigWindow,
}

impl ConfigureRequest {
    fn requested(&self, field: ConfigWindow) -> bool {
        u16::from(self.value_mask) & u16::from(field) != 0
    }
}

impl From<&ConfigureRequestEvent> for ConfigureRequest {
    fn from(e: &ConfigureRequestEvent) -> Self {
        Self {
            window: e.window,
            parent: e.parent,
            x: e.x,
            y: e.y,
            width: e.width,
            height: e.height,
            border_width: e.border_width,
            sibling: e.sibling,
            stack_mode: e.stack_mode,
            value_mask: e.value_mask,
        }
    }
}

/// Changes to apply to a window; `None` leaves the attribute alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub sibling: Option<Xid>,
    pub stack_mode: Option<StackMode>,
}

impl WindowChanges {
    /// Exactly the fields selected by the request's value mask
    pub fn from_request(req: &ConfigureRequest) -> Self {
        Self {
            x: req.requested(ConfigWindow::X).then_some(req.x as i32),
            y: req.requested(ConfigWindow::Y).then_some(req.y as i32),
            width: req.requested(ConfigWindow::WIDTH).then_some(req.width as u32),
            height: req.requested(ConfigWindow::HEIGHT).then_some(req.height as u32),
            border_width: req
                .requested(ConfigWindow::BORDER_WIDTH)
                .then_some(req.border_width as u32),
            sibling: req.requested(ConfigWindow::SIBLING).then_some(req.sibling),
            stack_mode: req.requested(ConfigWindow::STACK_MODE).then_some(req.stack_mode),
        }
    }
}

impl From<&WindowChanges> for ConfigureWindowAux {
    fn from(changes: &WindowChanges) -> Self {
        let mut aux = ConfigureWindowAux::new();
        aux.x = changes.x;
        aux.y = changes.y;
        aux.width = changes.width;
        aux.height = changes.height;
        aux.border_width = changes.border_width;
        aux.sibling = changes.sibling;
        aux.stack_mode = changes.stack_mode;
        aux
    }
}

impl<C: XConn> WindowManager<C> {
    /// Pass a ConfigureRequest through, mirroring it onto the client's frame
    pub(crate) fn on_configure_request(&mut self, req: &ConfigureRequest) -> Result<()> {
        let changes = WindowChanges::from_request(req);

        if let Some(frame) = self.registry.frame_of(req.window) {
            self.conn.configure_window(frame, &changes)?;
            info!("Resize frame 0x{:x} to {}x{}", frame, req.width, req.height);
        }

        self.conn.configure_window(req.window, &changes)?;
        info!("Resize 0x{:x} to {}x{}", req.window, req.width, req.height);
        Ok(())
    }
}
