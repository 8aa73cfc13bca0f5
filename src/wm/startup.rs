//! Startup
//!
//! Claiming the root window and adopting the windows that were already there.

use tracing::{debug, error, info};
use x11rb::protocol::ErrorKind;

use crate::wm::decorations::FrameMode;
use crate::wm::display::XConn;
use crate::wm::error::{Result, WmError};
use crate::wm::WindowManager;

/// Try to take substructure redirection on the root.
///
/// Only one client per root may hold it, so an `Access` error means another
/// window manager is running: returns `Ok(true)`. Other errors are returned.
pub fn detect_rival<C: XConn>(conn: &C) -> Result<bool> {
    match conn.redirect_root() {
        Ok(()) => Ok(false),
        Err(WmError::Protocol(e)) if e.kind == ErrorKind::Access => {
            debug!("Root redirect refused: {}", e);
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

impl<C: XConn> WindowManager<C> {
    /// Probe for another window manager. Logs and returns `true` if found.
    pub(crate) fn claim_root(&self) -> Result<bool> {
        let rival = detect_rival(&self.conn)?;
        if rival {
            error!(
                "Detected another window manager on display {}",
                self.conn.display_name()
            );
        } else {
            info!("Registered as window manager on root 0x{:x}", self.root);
        }
        Ok(rival)
    }

    /// Frame every top-level window that existed before we started.
    ///
    /// The server is grabbed for the duration so nothing is created, destroyed
    /// or reparented between listing the windows and framing them. Returns the
    /// number of windows framed.
    pub fn adopt_existing(&mut self) -> Result<usize> {
        self.conn.grab_server()?;
        let adopted = self.frame_children_of_root();
        self.conn.ungrab_server()?;

        let adopted = adopted?;
        info!("Adopted {} pre-existing windows", adopted);
        Ok(adopted)
    }

    fn frame_children_of_root(&mut self) -> Result<usize> {
        let tree = self.conn.query_tree(self.root)?;
        if tree.root != self.root {
            return Err(WmError::RootMismatch {
                expected: self.root,
                returned: tree.root,
            });
        }

        let mut adopted = 0;
        for child in tree.children {
            if self.frame(child, FrameMode::Preexisting)? {
                adopted += 1;
            }
        }
        Ok(adopted)
    }
}
