//! Window Manager Module
//!
//! A reparenting window manager: every top-level client is wrapped in a frame
//! owned by us, and structural requests from clients pass through here before
//! the server applies them.

pub mod client;
pub mod configure;
pub mod decorations;
pub mod display;
pub mod error;
pub mod events;
pub mod startup;

#[cfg(test)]
pub(crate) mod testing;

use tracing::{debug, error, info, warn};

use crate::config::{Config, DemoWindowConfig};
use crate::shared::Geometry;
use crate::wm::client::ClientRegistry;
use crate::wm::decorations::{FrameMode, FrameStyle};
use crate::wm::display::{WindowStyle, X11Conn, XConn};
use crate::wm::error::{log_protocol_error, Result};
use crate::wm::events::{DispatchStats, IgnoredKind, WmEvent};

/// X11 window id
pub type Xid = u32;

pub struct WindowManager<C: XConn> {
    conn: C,
    root: Xid,
    registry: ClientRegistry,
    style: FrameStyle,
    demo_window: DemoWindowConfig,
    stats: DispatchStats,
}

impl WindowManager<X11Conn> {
    /// Connect to the display named by `$DISPLAY`
    pub fn create(config: &Config) -> Result<Self> {
        let conn = match X11Conn::connect(None) {
            Ok(conn) => conn,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };
        Ok(Self::new(conn, config))
    }
}

impl<C: XConn> WindowManager<C> {
    pub fn new(conn: C, config: &Config) -> Self {
        let root = conn.root();
        Self {
            conn,
            root,
            registry: ClientRegistry::new(),
            style: FrameStyle::from(&config.frame),
            demo_window: config.demo_window.clone(),
            stats: DispatchStats::default(),
        }
    }

    pub fn conn(&self) -> &C {
        &self.conn
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Become the window manager, adopt existing windows, then process events
    /// until the connection fails.
    ///
    /// Returns `Ok(())` without touching anything if another window manager
    /// already owns the root.
    pub fn run(&mut self) -> Result<()> {
        if self.claim_root()? {
            return Ok(());
        }

        self.adopt_existing()?;

        info!("Entering event loop");
        loop {
            let event = self.conn.next_event()?;
            debug!("Received event: {}", event.name());
            self.dispatch(event)?;
        }
    }

    /// Handle one event
    pub fn dispatch(&mut self, event: WmEvent) -> Result<()> {
        match event {
            // Framing happens on MapRequest and cleanup on UnmapNotify, so the
            // plain notifications carry nothing we act on
            WmEvent::CreateNotify { .. }
            | WmEvent::DestroyNotify { .. }
            | WmEvent::ReparentNotify { .. }
            | WmEvent::CirculateNotify { .. }
            | WmEvent::ConfigureNotify { .. }
            | WmEvent::MapNotify { .. }
            | WmEvent::GravityNotify { .. } => {}
            WmEvent::UnmapNotify { event, window } => self.on_unmap_notify(event, window)?,
            WmEvent::KeyPress { keycode, .. } => self.on_key_press(keycode)?,
            WmEvent::ConfigureRequest(req) => self.on_configure_request(&req)?,
            WmEvent::MapRequest { window } => self.on_map_request(window)?,
            WmEvent::Error(e) => log_protocol_error(&e),
            WmEvent::Ignored(kind) => {
                let count = self.stats.record_ignored(kind);
                if kind == IgnoredKind::Other {
                    warn!("Ignored event (#{})", count);
                } else {
                    debug!("Ignored {:?} (#{})", kind, count);
                }
                return Ok(());
            }
        }

        self.stats.handled += 1;
        Ok(())
    }

    fn on_map_request(&mut self, window: Xid) -> Result<()> {
        self.frame(window, FrameMode::New)?;
        self.conn.map_window(window)?;
        Ok(())
    }

    fn on_unmap_notify(&mut self, event: Xid, window: Xid) -> Result<()> {
        if !self.registry.contains(window) {
            debug!("Ignore UnmapNotify for non-client window 0x{:x}", window);
            return Ok(());
        }

        // Reported on the root: a side effect of reparenting a mapped client
        // into its frame, not the client withdrawing itself
        if event == self.root {
            debug!("Ignore UnmapNotify for 0x{:x} reported on root", window);
            return Ok(());
        }

        self.unframe(window)?;
        Ok(())
    }

    /// Placeholder binding: every key opens a framed demo window
    fn on_key_press(&mut self, keycode: u8) -> Result<()> {
        debug!("KeyPress {}, opening demo window", keycode);
        let geometry = Geometry::new(0, 0, self.demo_window.width, self.demo_window.height);
        let window = self
            .conn
            .create_window(self.root, geometry, &WindowStyle::default())?;
        self.frame(window, FrameMode::New)?;
        self.conn.map_window(window)?;
        Ok(())
    }
}
