//! Display Module
//!
//! The connection to the X server. Everything the window manager asks of the
//! server goes through the [`XConn`] trait; [`X11Conn`] implements it on top of
//! x11rb's pure-Rust connection.

use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::shared::{Geometry, WindowAttributes};
use crate::wm::configure::WindowChanges;
use crate::wm::error::{Result, WmError};
use crate::wm::events::WmEvent;
use crate::wm::Xid;

/// Result of a QueryTree request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub root: Xid,
    pub parent: Xid,
    /// Children in bottom-to-top stacking order
    pub children: Vec<Xid>,
}

/// Border and background of a window created by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStyle {
    pub border_width: u32,
    pub border_pixel: u32,
    pub background_pixel: u32,
}

/// Requests the window manager sends to the display server.
///
/// Requests without a reply are unchecked: if the server rejects one, the
/// error comes back later through [`XConn::next_event`] as [`WmEvent::Error`].
pub trait XConn {
    /// Root window of the managed screen
    fn root(&self) -> Xid;

    /// Name of the display, for diagnostics
    fn display_name(&self) -> &str;

    /// Select substructure redirection on the root and wait for the server's
    /// answer. Fails with an `Access` protocol error if another client already
    /// holds redirection.
    fn redirect_root(&self) -> Result<()>;

    /// Select substructure redirect and notify events on `window`
    fn select_substructure(&self, window: Xid) -> Result<()>;

    fn grab_server(&self) -> Result<()>;

    fn ungrab_server(&self) -> Result<()>;

    fn query_tree(&self, window: Xid) -> Result<Tree>;

    fn window_attributes(&self, window: Xid) -> Result<WindowAttributes>;

    /// Create an input-output window; returns its id
    fn create_window(&self, parent: Xid, geometry: Geometry, style: &WindowStyle) -> Result<Xid>;

    fn destroy_window(&self, window: Xid) -> Result<()>;

    fn map_window(&self, window: Xid) -> Result<()>;

    fn unmap_window(&self, window: Xid) -> Result<()>;

    fn reparent_window(&self, window: Xid, parent: Xid, x: i32, y: i32) -> Result<()>;

    fn change_save_set(&self, mode: SetMode, window: Xid) -> Result<()>;

    fn configure_window(&self, window: Xid, changes: &WindowChanges) -> Result<()>;

    /// Flush pending requests and block until the server delivers an event
    fn next_event(&self) -> Result<WmEvent>;
}

/// Connection to a real X server
pub struct X11Conn {
    conn: RustConnection,
    screen_num: usize,
    root: Xid,
    display: String,
}

impl X11Conn {
    /// Connect to `display`, or to `$DISPLAY` when `None`
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let display_name = display
            .map(str::to_owned)
            .or_else(|| std::env::var("DISPLAY").ok())
            .unwrap_or_default();

        let (conn, screen_num) = x11rb::connect(display).map_err(|source| WmError::Connect {
            display: display_name.clone(),
            source,
        })?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        info!(
            "Connected to X server {}, screen {}, root window 0x{:x}",
            display_name, screen_num, root
        );
        debug!("Screen size: {}x{}", screen.width_in_pixels, screen.height_in_pixels);

        Ok(Self {
            conn,
            screen_num,
            root,
            display: display_name,
        })
    }

    fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }
}

impl XConn for X11Conn {
    fn root(&self) -> Xid {
        self.root
    }

    fn display_name(&self) -> &str {
        &self.display
    }

    fn redirect_root(&self) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY | EventMask::KEY_PRESS;
        self.conn
            .change_window_attributes(self.root, &ChangeWindowAttributesAux::new().event_mask(mask))?
            .check()?;
        Ok(())
    }

    fn select_substructure(&self, window: Xid) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        self.conn
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().event_mask(mask))?;
        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        self.conn.grab_server()?;
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.conn.ungrab_server()?;
        self.conn.flush()?;
        Ok(())
    }

    fn query_tree(&self, window: Xid) -> Result<Tree> {
        let reply = self.conn.query_tree(window)?.reply()?;
        Ok(Tree {
            root: reply.root,
            parent: reply.parent,
            children: reply.children,
        })
    }

    fn window_attributes(&self, window: Xid) -> Result<WindowAttributes> {
        // Both requests go out before waiting on either reply
        let attrs = self.conn.get_window_attributes(window)?;
        let geom = self.conn.get_geometry(window)?;
        let attrs = attrs.reply()?;
        let geom = geom.reply()?;

        Ok(WindowAttributes {
            geometry: Geometry::new(
                geom.x as i32,
                geom.y as i32,
                geom.width as u32,
                geom.height as u32,
            ),
            border_width: geom.border_width as u32,
            override_redirect: attrs.override_redirect,
            viewable: attrs.map_state == MapState::VIEWABLE,
        })
    }

    fn create_window(&self, parent: Xid, geometry: Geometry, style: &WindowStyle) -> Result<Xid> {
        let window = self.conn.generate_id()?;
        self.conn.create_window(
            self.screen().root_depth,
            window,
            parent,
            geometry.x as i16,
            geometry.y as i16,
            geometry.width.max(1) as u16,
            geometry.height.max(1) as u16,
            style.border_width as u16,
            WindowClass::INPUT_OUTPUT,
            0,
            &CreateWindowAux::new()
                .background_pixel(style.background_pixel)
                .border_pixel(style.border_pixel),
        )?;
        Ok(window)
    }

    fn destroy_window(&self, window: Xid) -> Result<()> {
        self.conn.destroy_window(window)?;
        Ok(())
    }

    fn map_window(&self, window: Xid) -> Result<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: Xid) -> Result<()> {
        self.conn.unmap_window(window)?;
        Ok(())
    }

    fn reparent_window(&self, window: Xid, parent: Xid, x: i32, y: i32) -> Result<()> {
        self.conn.reparent_window(window, parent, x as i16, y as i16)?;
        Ok(())
    }

    fn change_save_set(&self, mode: SetMode, window: Xid) -> Result<()> {
        self.conn.change_save_set(mode, window)?;
        Ok(())
    }

    fn configure_window(&self, window: Xid, changes: &WindowChanges) -> Result<()> {
        self.conn.configure_window(window, &ConfigureWindowAux::from(changes))?;
        Ok(())
    }

    fn next_event(&self) -> Result<WmEvent> {
        self.conn.flush()?;
        let event = self.conn.wait_for_event()?;
        Ok(WmEvent::from(event))
    }
}
