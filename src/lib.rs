//! framewm
//!
//! A minimal reparenting window manager for X11. Top-level clients are wrapped
//! in bordered frames owned by the manager, and structural requests from
//! clients are passed through with the frame kept in step.

pub mod config;
pub mod shared;
pub mod wm;
