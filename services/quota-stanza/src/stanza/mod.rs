pub mod aggregator;
pub mod error;
pub mod formatter;
pub mod resolver;

pub use aggregator::{aggregate_limits, LimitRecord, UsersLimits};
pub use error::StanzaError;
pub use formatter::{render_stanza, write_stanza_file, StanzaBlock};
pub use resolver::{resolve_users, UserSelector};

use crate::storage::QuotaDatabase;

/// Keyword selecting every user in the store.
pub const ALL_USERS: &str = "all";

/// Resolves the selected users, collects their limits and renders the stanza lines.
pub fn build_stanza(
    database: &QuotaDatabase,
    selector: &UserSelector,
) -> Result<Vec<String>, StanzaError> {
    let users = resolve_users(database, selector)?;
    let limits = aggregate_limits(database, &users)?;
    Ok(render_stanza(&limits))
}
