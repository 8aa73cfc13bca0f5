//! In-memory stand-in for the X server, used by the unit tests.
//!
//! `FakeConn` keeps a window tree, the save set and the grab state, and logs
//! every request it receives so tests can assert on exact request sequences.
//! Unchecked requests against unknown windows queue an error event the way a
//! real server would.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet, VecDeque};

use x11rb::errors::ConnectionError;
use x11rb::protocol::xproto::SetMode;
use x11rb::protocol::ErrorKind;

use crate::shared::{Geometry, WindowAttributes};
use crate::wm::configure::WindowChanges;
use crate::wm::display::{Tree, WindowStyle, XConn};
use crate::wm::error::{ProtocolError, Result, WmError};
use crate::wm::events::WmEvent;
use crate::wm::Xid;

const ROOT: Xid = 0x1;
const FIRST_ID: Xid = 0x20_0001;

/// A request as seen by the fake server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    RedirectRoot,
    SelectSubstructure(Xid),
    GrabServer,
    UngrabServer,
    QueryTree(Xid),
    WindowAttributes(Xid),
    CreateWindow { parent: Xid, window: Xid },
    Destroy(Xid),
    Map(Xid),
    Unmap(Xid),
    Reparent { window: Xid, parent: Xid, x: i32, y: i32 },
    ChangeSaveSet(SetMode, Xid),
    Configure { window: Xid, changes: WindowChanges },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub parent: Xid,
    pub geometry: Geometry,
    pub style: WindowStyle,
    pub override_redirect: bool,
    pub mapped: bool,
    pub substructure_selected: bool,
}

#[derive(Debug, Default)]
struct State {
    windows: BTreeMap<Xid, FakeWindow>,
    next_id: Xid,
    grabbed: bool,
    save_set: HashSet<Xid>,
    requests: Vec<Request>,
    events: VecDeque<WmEvent>,
    root_redirected: bool,
    redirect_error: Option<ErrorKind>,
    reported_root: Option<Xid>,
    created: Vec<Xid>,
}

impl State {
    fn viewable(&self, window: Xid) -> bool {
        let mut current = window;
        while current != ROOT {
            match self.windows.get(&current) {
                Some(w) if w.mapped => current = w.parent,
                _ => return false,
            }
        }
        true
    }

    /// Run `f` on `window`, or queue a BadWindow event if it does not exist
    fn with_window(&mut self, window: Xid, major_opcode: u8, f: impl FnOnce(&mut FakeWindow)) {
        match self.windows.get_mut(&window) {
            Some(w) => f(w),
            None => self
                .events
                .push_back(WmEvent::Error(bad_window(window, major_opcode))),
        }
    }

    fn destroy(&mut self, window: Xid) {
        let children: Vec<Xid> = self
            .windows
            .iter()
            .filter(|(_, w)| w.parent == window)
            .map(|(&id, _)| id)
            .collect();
        for child in children {
            self.destroy(child);
        }
        self.windows.remove(&window);
        self.save_set.remove(&window);
    }
}

fn bad_window(window: Xid, major_opcode: u8) -> ProtocolError {
    ProtocolError {
        kind: ErrorKind::Window,
        error_code: 3,
        major_opcode,
        minor_opcode: 0,
        request_name: None,
        resource_id: window,
    }
}

pub struct FakeConn {
    state: RefCell<State>,
}

impl FakeConn {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_id: FIRST_ID,
                ..Default::default()
            }),
        }
    }

    /// A server where another client already holds root redirection
    pub fn with_rival() -> Self {
        let conn = Self::new();
        conn.fail_root_redirect(ErrorKind::Access);
        conn
    }

    pub fn fail_root_redirect(&self, kind: ErrorKind) {
        self.state.borrow_mut().redirect_error = Some(kind);
    }

    /// Make QueryTree answer with `root` instead of the real root
    pub fn report_wrong_root(&self, root: Xid) {
        self.state.borrow_mut().reported_root = Some(root);
    }

    /// Create a top-level window as some other client would
    pub fn add_window(&self, geometry: Geometry, mapped: bool) -> Xid {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.windows.insert(
            id,
            FakeWindow {
                parent: ROOT,
                geometry,
                style: WindowStyle::default(),
                override_redirect: false,
                mapped,
                substructure_selected: false,
            },
        );
        id
    }

    pub fn set_override_redirect(&self, window: Xid, value: bool) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.override_redirect = value;
        }
    }

    pub fn push_event(&self, event: WmEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn window(&self, window: Xid) -> Option<FakeWindow> {
        self.state.borrow().windows.get(&window).cloned()
    }

    pub fn in_save_set(&self, window: Xid) -> bool {
        self.state.borrow().save_set.contains(&window)
    }

    pub fn grabbed(&self) -> bool {
        self.state.borrow().grabbed
    }

    pub fn root_redirected(&self) -> bool {
        self.state.borrow().root_redirected
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    /// Windows created through `create_window`, in order
    pub fn created_windows(&self) -> Vec<Xid> {
        self.state.borrow().created.clone()
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().events.len()
    }

    fn log(&self, request: Request) {
        self.state.borrow_mut().requests.push(request);
    }
}

impl XConn for FakeConn {
    fn root(&self) -> Xid {
        ROOT
    }

    fn display_name(&self) -> &str {
        ":fake"
    }

    fn redirect_root(&self) -> Result<()> {
        self.log(Request::RedirectRoot);
        let mut state = self.state.borrow_mut();
        if let Some(kind) = state.redirect_error {
            return Err(WmError::Protocol(ProtocolError {
                kind,
                error_code: 10,
                major_opcode: 2,
                minor_opcode: 0,
                request_name: Some("ChangeWindowAttributes"),
                resource_id: ROOT,
            }));
        }
        state.root_redirected = true;
        Ok(())
    }

    fn select_substructure(&self, window: Xid) -> Result<()> {
        self.log(Request::SelectSubstructure(window));
        self.state
            .borrow_mut()
            .with_window(window, 2, |w| w.substructure_selected = true);
        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        self.log(Request::GrabServer);
        self.state.borrow_mut().grabbed = true;
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.log(Request::UngrabServer);
        self.state.borrow_mut().grabbed = false;
        Ok(())
    }

    fn query_tree(&self, window: Xid) -> Result<Tree> {
        self.log(Request::QueryTree(window));
        let state = self.state.borrow();
        let parent = match state.windows.get(&window) {
            Some(w) => w.parent,
            None if window == ROOT => 0,
            None => return Err(WmError::Protocol(bad_window(window, 15))),
        };
        let children = state
            .windows
            .iter()
            .filter(|(_, w)| w.parent == window)
            .map(|(&id, _)| id)
            .collect();
        Ok(Tree {
            root: state.reported_root.unwrap_or(ROOT),
            parent,
            children,
        })
    }

    fn window_attributes(&self, window: Xid) -> Result<WindowAttributes> {
        self.log(Request::WindowAttributes(window));
        let state = self.state.borrow();
        let w = state
            .windows
            .get(&window)
            .ok_or_else(|| WmError::Protocol(bad_window(window, 3)))?;
        Ok(WindowAttributes {
            geometry: w.geometry,
            border_width: w.style.border_width,
            override_redirect: w.override_redirect,
            viewable: state.viewable(window),
        })
    }

    fn create_window(&self, parent: Xid, geometry: Geometry, style: &WindowStyle) -> Result<Xid> {
        let mut state = self.state.borrow_mut();
        let window = state.next_id;
        state.next_id += 1;
        state.requests.push(Request::CreateWindow { parent, window });
        state.windows.insert(
            window,
            FakeWindow {
                parent,
                geometry,
                style: *style,
                override_redirect: false,
                mapped: false,
                substructure_selected: false,
            },
        );
        state.created.push(window);
        Ok(window)
    }

    fn destroy_window(&self, window: Xid) -> Result<()> {
        self.log(Request::Destroy(window));
        let mut state = self.state.borrow_mut();
        if state.windows.contains_key(&window) {
            state.destroy(window);
        } else {
            state.events.push_back(WmEvent::Error(bad_window(window, 4)));
        }
        Ok(())
    }

    fn map_window(&self, window: Xid) -> Result<()> {
        self.log(Request::Map(window));
        self.state.borrow_mut().with_window(window, 8, |w| w.mapped = true);
        Ok(())
    }

    fn unmap_window(&self, window: Xid) -> Result<()> {
        self.log(Request::Unmap(window));
        self.state.borrow_mut().with_window(window, 10, |w| w.mapped = false);
        Ok(())
    }

    fn reparent_window(&self, window: Xid, parent: Xid, x: i32, y: i32) -> Result<()> {
        self.log(Request::Reparent { window, parent, x, y });
        self.state.borrow_mut().with_window(window, 7, |w| {
            w.parent = parent;
            w.geometry.x = x;
            w.geometry.y = y;
        });
        Ok(())
    }

    fn change_save_set(&self, mode: SetMode, window: Xid) -> Result<()> {
        self.log(Request::ChangeSaveSet(mode, window));
        let mut state = self.state.borrow_mut();
        if mode == SetMode::INSERT {
            state.save_set.insert(window);
        } else {
            state.save_set.remove(&window);
        }
        Ok(())
    }

    fn configure_window(&self, window: Xid, changes: &WindowChanges) -> Result<()> {
        self.log(Request::Configure {
            window,
            changes: *changes,
        });
        self.state.borrow_mut().with_window(window, 12, |w| {
            if let Some(x) = changes.x {
                w.geometry.x = x;
            }
            if let Some(y) = changes.y {
                w.geometry.y = y;
            }
            if let Some(width) = changes.width {
                w.geometry.width = width;
            }
            if let Some(height) = changes.height {
                w.geometry.height = height;
            }
            if let Some(border_width) = changes.border_width {
                w.style.border_width = border_width;
            }
        });
        Ok(())
    }

    fn next_event(&self) -> Result<WmEvent> {
        self.state
            .borrow_mut()
            .events
            .pop_front()
            .ok_or(WmError::Connection(ConnectionError::UnknownError))
    }
}
