use tracing::debug;

use crate::storage::{QuotaDatabase, User};

use super::error::StanzaError;
use super::ALL_USERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSelector {
    All,
    Names(Vec<String>),
}

impl UserSelector {
    /// Any occurrence of `all` in the requested names selects every user.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|name| name == ALL_USERS) {
            UserSelector::All
        } else {
            UserSelector::Names(names)
        }
    }
}

/// Maps the selector to `(id, name)` pairs, failing on the first name the
/// store does not know.
pub fn resolve_users(
    database: &QuotaDatabase,
    selector: &UserSelector,
) -> Result<Vec<User>, StanzaError> {
    let names = match selector {
        UserSelector::All => {
            let users = database.list_users()?;
            debug!(count = users.len(), "resolved all users");
            return Ok(users);
        }
        UserSelector::Names(names) => names,
    };

    let mut users = Vec::with_capacity(names.len());
    for name in names {
        let id = database
            .find_user_id(name)?
            .ok_or_else(|| StanzaError::UnknownUser(name.clone()))?;
        debug!(user = %name, id = ?id, "resolved user");
        users.push(User {
            id,
            name: name.clone(),
        });
    }

    Ok(users)
}
