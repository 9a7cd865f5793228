use indexmap::IndexMap;
use tracing::{debug, info};

use crate::storage::{QuotaDatabase, User, LIMIT_FIELD_COUNT};

use super::error::StanzaError;

/// device -> user name -> limits, both levels kept in insertion order.
pub type UsersLimits = IndexMap<String, IndexMap<String, LimitRecord>>;

/// The ten limit values of one (device, user) pair, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitRecord {
    pub block_soft: String,
    pub block_hard: String,
    pub block_unit: String,
    pub block_grace: String,
    pub block_grace_unit: String,
    pub files_soft: String,
    pub files_hard: String,
    pub files_unit: String,
    pub files_grace: String,
    pub files_grace_unit: String,
}

impl From<[String; LIMIT_FIELD_COUNT]> for LimitRecord {
    fn from(fields: [String; LIMIT_FIELD_COUNT]) -> Self {
        let [
            block_soft,
            block_hard,
            block_unit,
            block_grace,
            block_grace_unit,
            files_soft,
            files_hard,
            files_unit,
            files_grace,
            files_grace_unit,
        ] = fields;

        Self {
            block_soft,
            block_hard,
            block_unit,
            block_grace,
            block_grace_unit,
            files_soft,
            files_hard,
            files_unit,
            files_grace,
            files_grace_unit,
        }
    }
}

pub fn aggregate_limits(
    database: &QuotaDatabase,
    users: &[User],
) -> Result<UsersLimits, StanzaError> {
    let mut limits = UsersLimits::new();

    for user in users {
        let rows = database.limits_for_user(&user.id)?;
        if rows.is_empty() {
            debug!(user = %user.name, "user has no quota limits");
            continue;
        }

        for row in rows {
            let replaced = limits
                .entry(row.device)
                .or_default()
                .insert(user.name.clone(), LimitRecord::from(row.fields));
            if replaced.is_some() {
                debug!(user = %user.name, "duplicate device limits, keeping the later row");
            }
        }
    }

    info!(
        users = users.len(),
        devices = limits.len(),
        "aggregated quota limits"
    );
    Ok(limits)
}
