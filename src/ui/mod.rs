//! Terminal presentation layer
//!
//! A unidirectional cycle: key events and operation completions become
//! [`msg::Msg`]s, [`update::update`] is the only place state changes,
//! and [`render::draw`] re-derives the whole screen from state on
//! every frame. Network work runs in spawned tasks whose results come
//! back as generation-tagged messages, so a late response can never
//! reactivate a dismissed screen.

pub mod events;
pub mod msg;
pub mod render;
pub mod runtime;
pub mod state;
pub mod update;
