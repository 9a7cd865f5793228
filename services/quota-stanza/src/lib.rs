//! Renders per-user disk quota limits from the local quota database into
//! the `%quota:` stanza file consumed by `setquota`-driven tooling.
//!
//! The pipeline is strictly linear: [`stanza::resolve_users`] maps requested
//! names to ids, [`stanza::aggregate_limits`] groups each user's limits by
//! device and [`stanza::render_stanza`] turns the result into text lines that
//! [`stanza::write_stanza_file`] persists.

pub mod config;
pub mod stanza;
pub mod storage;

pub use config::StanzaConfig;
pub use stanza::{
    aggregate_limits, build_stanza, render_stanza, resolve_users, write_stanza_file, LimitRecord,
    StanzaBlock, StanzaError, UserSelector, UsersLimits,
};
pub use storage::{QuotaDatabase, StorageError, User};
