//! Client registry
//!
//! Which client windows are framed, and by which frame. The registry is the
//! single source of truth for "is this window managed".

use std::collections::HashMap;

use crate::wm::Xid;

/// Why an insertion was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryConflict {
    /// The client already has a frame
    ClientFramed { frame: Xid },
    /// The frame already wraps another client
    FrameInUse { client: Xid },
}

/// Bijective client <-> frame mapping
#[derive(Debug, Default)]
pub struct ClientRegistry {
    frames: HashMap<Xid, Xid>,
    clients: HashMap<Xid, Xid>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `client` is wrapped by `frame`
    pub fn insert(&mut self, client: Xid, frame: Xid) -> Result<(), RegistryConflict> {
        if let Some(&frame) = self.frames.get(&client) {
            return Err(RegistryConflict::ClientFramed { frame });
        }
        if let Some(&client) = self.clients.get(&frame) {
            return Err(RegistryConflict::FrameInUse { client });
        }
        self.frames.insert(client, frame);
        self.clients.insert(frame, client);
        Ok(())
    }

    /// Forget `client`; returns the frame it had
    pub fn remove(&mut self, client: Xid) -> Option<Xid> {
        let frame = self.frames.remove(&client)?;
        self.clients.remove(&frame);
        Some(frame)
    }

    pub fn frame_of(&self, client: Xid) -> Option<Xid> {
        self.frames.get(&client).copied()
    }

    pub fn client_of(&self, frame: Xid) -> Option<Xid> {
        self.clients.get(&frame).copied()
    }

    pub fn contains(&self, client: Xid) -> bool {
        self.frames.contains_key(&client)
    }

    pub fn is_frame(&self, window: Xid) -> bool {
        self.clients.contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All (client, frame) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Xid, Xid)> + '_ {
        self.frames.iter().map(|(&client, &frame)| (client, frame))
    }
}
