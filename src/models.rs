use crate::config::UNRESOLVED;
use serde::Serialize;

/// A row of the old user directory. Drives output row count and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldUserRecord {
    pub old_user_id: String,
    pub username: String,
}

/// A row of the MAC export; `user_id` is in the old user id space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacRecord {
    pub user_id: String,
    pub mac_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub new_user_id: String,
    pub username: String,
}

/// One output row per old user. `None` marks an unresolved field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub old_user_id: String,
    pub mac_address: Option<String>,
    pub new_user_id: Option<String>,
    pub username: String,
}

impl MappingRow {
    pub fn has_mac(&self) -> bool {
        self.mac_address.is_some()
    }

    /// Borrowed view with unresolved fields rendered as the marker
    pub fn display(&self) -> DisplayRow<'_> {
        DisplayRow {
            old_user_id: &self.old_user_id,
            mac_address: self.mac_address.as_deref().unwrap_or(UNRESOLVED),
            new_user_id: self.new_user_id.as_deref().unwrap_or(UNRESOLVED),
            username: &self.username,
        }
    }
}

/// Output shape of a mapping row, shared by preview and export
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DisplayRow<'a> {
    pub old_user_id: &'a str,
    pub mac_address: &'a str,
    pub new_user_id: &'a str,
    pub username: &'a str,
}

impl<'a> DisplayRow<'a> {
    pub fn fields(&self) -> [&'a str; 4] {
        [
            self.old_user_id,
            self.mac_address,
            self.new_user_id,
            self.username,
        ]
    }
}
