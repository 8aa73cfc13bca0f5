//! Window decorations
//!
//! Framing wraps a client in a bordered window owned by the manager;
//! unframing hands the client back to the root and throws the frame away.

use tracing::{debug, info, warn};
use x11rb::protocol::xproto::SetMode;

use crate::config::FrameConfig;
use crate::wm::display::{WindowStyle, XConn};
use crate::wm::error::{Result, WmError};
use crate::wm::{WindowManager, Xid};

/// Why a window is being framed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Found at startup; left alone unless it is visible and manageable
    Preexisting,
    /// Asked to be mapped while we are running
    New,
}

/// Look of a frame and where the client sits inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub window: WindowStyle,
    pub client_offset: (i32, i32),
}

impl From<&FrameConfig> for FrameStyle {
    fn from(config: &FrameConfig) -> Self {
        Self {
            window: WindowStyle {
                border_width: config.border_width,
                border_pixel: config.border_color,
                background_pixel: config.background_color,
            },
            client_offset: (config.client_offset_x, config.client_offset_y),
        }
    }
}

impl<C: XConn> WindowManager<C> {
    /// Wrap `client` in a new frame.
    ///
    /// Returns `Ok(false)` when the window was left alone: a pre-existing
    /// window that is override-redirect or not viewable, or a client that
    /// already has a frame.
    pub fn frame(&mut self, client: Xid, mode: FrameMode) -> Result<bool> {
        let attrs = self
            .conn
            .window_attributes(client)
            .map_err(|source| WmError::Attributes {
                window: client,
                source: Box::new(source),
            })?;

        if mode == FrameMode::Preexisting && (attrs.override_redirect || !attrs.viewable) {
            debug!(
                "Skipping window 0x{:x} (override_redirect={}, viewable={})",
                client, attrs.override_redirect, attrs.viewable
            );
            return Ok(false);
        }

        if let Some(frame) = self.registry.frame_of(client) {
            warn!("Window 0x{:x} is already framed by 0x{:x}", client, frame);
            return Ok(false);
        }

        let frame = self
            .conn
            .create_window(self.root, attrs.geometry, &self.style.window)?;
        self.conn.select_substructure(frame)?;

        // Reparented back to root by the server if we die
        self.conn.change_save_set(SetMode::INSERT, client)?;

        let (offset_x, offset_y) = self.style.client_offset;
        self.conn.reparent_window(client, frame, offset_x, offset_y)?;
        self.conn.map_window(frame)?;

        if let Err(conflict) = self.registry.insert(client, frame) {
            // Frame ids are fresh, so only a server handing out a live id gets here
            warn!("Registry refused 0x{:x} -> 0x{:x}: {:?}", client, frame, conflict);
        }

        info!("Framed window 0x{:x} [0x{:x}]", client, frame);
        Ok(true)
    }

    /// Undo [`frame`](Self::frame) for `client`.
    ///
    /// Unknown windows are a no-op and return `Ok(false)`.
    pub fn unframe(&mut self, client: Xid) -> Result<bool> {
        let Some(frame) = self.registry.frame_of(client) else {
            warn!("Asked to unframe 0x{:x}, which has no frame", client);
            return Ok(false);
        };

        self.conn.unmap_window(frame)?;
        self.conn.reparent_window(client, self.root, 0, 0)?;
        self.conn.change_save_set(SetMode::DELETE, client)?;
        self.conn.destroy_window(frame)?;
        self.registry.remove(client);

        info!("Unframed window 0x{:x} [0x{:x}]", client, frame);
        Ok(true)
    }
}
