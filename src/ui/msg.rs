//! Messages and commands
//!
//! A [`Msg`] is the only way anything reaches the update function:
//! key presses, the clock tick, and completions of network work. A
//! [`Cmd`] is the only way the update function causes side effects.

use crossterm::event::KeyEvent;

use crate::error::Result;
use crate::inventory::{InventoryCollection, ItemDraft};
use crate::session::Session;

pub enum Msg {
    /// A key press
    Key(KeyEvent),

    /// Periodic tick; expires notifications
    Tick,

    /// Login attempt finished
    LoginDone {
        generation: u64,
        result: Result<Session>,
    },

    /// An inventory operation finished. Mutations carry the refreshed
    /// collection snapshot taken after their follow-up list.
    SyncDone {
        generation: u64,
        kind: SyncKind,
        result: Result<InventoryCollection>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    Load,
    Create,
    Update,
    Delete,
}

/// Side effects requested by the update function, executed by the
/// runtime
#[derive(Debug, PartialEq)]
pub enum Cmd {
    Login {
        generation: u64,
        username: String,
        password: String,
    },
    Load {
        generation: u64,
    },
    Create {
        generation: u64,
        draft: ItemDraft,
    },
    Update {
        generation: u64,
        id: i64,
        draft: ItemDraft,
    },
    Delete {
        generation: u64,
        id: i64,
    },
    /// Clear the session and the persisted token; always succeeds
    Logout,
}
