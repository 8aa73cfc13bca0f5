//! Window state shared between the manager and its connection layer.

/// Window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Merged reply of GetWindowAttributes and GetGeometry for one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub geometry: Geometry,
    pub border_width: u32,
    /// Set by applications that opt out of window management
    pub override_redirect: bool,
    /// Mapped and all ancestors mapped
    pub viewable: bool,
}
