use crate::models::{MacRecord, MappingRow, NewUserRecord, OldUserRecord};
use crate::normalize::{identifier_key, normalize_mac, username_key, MacEncoding};
use clap::ValueEnum;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Which record wins when two records share a join key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// The later record in file order replaces the earlier one
    #[default]
    LastWins,
    /// The first record in file order is kept
    FirstWins,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    pub mac_encoding: MacEncoding,
    pub on_duplicate: DuplicatePolicy,
}

/// Non-fatal conditions observed while loading and joining
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileDiagnostics {
    /// Rows dropped by the loader across all three files
    pub malformed_rows: usize,
    pub invalid_macs: usize,
    pub duplicate_mac_keys: usize,
    pub duplicate_usernames: usize,
    /// MAC index entries matched by no old user
    pub orphaned_macs: usize,
    /// New user index entries matched by no old user
    pub orphaned_new_users: usize,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub rows: Vec<MappingRow>,
    pub diagnostics: ReconcileDiagnostics,
}

/// Insert under the duplicate policy. Returns true if the key was already present.
fn insert_keyed<K: Eq + Hash, V>(
    index: &mut FxHashMap<K, V>,
    key: K,
    value: V,
    policy: DuplicatePolicy,
) -> bool {
    match index.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            false
        }
        Entry::Occupied(mut slot) => {
            if policy == DuplicatePolicy::LastWins {
                slot.insert(value);
            }
            true
        }
    }
}

/// Index of normalized user id to canonical MAC. Invalid MACs are never indexed.
struct MacIndex<'a> {
    by_user: FxHashMap<&'a str, String>,
    invalid: usize,
    duplicates: usize,
}

impl<'a> MacIndex<'a> {
    fn build(macs: &'a [MacRecord], options: &ReconcileOptions) -> Self {
        let mut by_user: FxHashMap<&str, String> = FxHashMap::default();
        by_user.reserve(macs.len());
        let mut invalid = 0;
        let mut duplicates = 0;

        for record in macs {
            let Some(mac) = normalize_mac(&record.mac_address, options.mac_encoding) else {
                debug!(
                    user_id = %record.user_id,
                    mac = %record.mac_address,
                    "Invalid MAC address"
                );
                invalid += 1;
                continue;
            };
            let key = identifier_key(&record.user_id);
            if insert_keyed(&mut by_user, key, mac, options.on_duplicate) {
                debug!(user_id = key, "Duplicate MAC record for user");
                duplicates += 1;
            }
        }

        Self {
            by_user,
            invalid,
            duplicates,
        }
    }
}

/// Index of folded username to new user record
struct NewUserIndex<'a> {
    by_username: FxHashMap<String, &'a NewUserRecord>,
    duplicates: usize,
}

impl<'a> NewUserIndex<'a> {
    fn build(new_users: &'a [NewUserRecord], policy: DuplicatePolicy) -> Self {
        let mut by_username: FxHashMap<String, &NewUserRecord> = FxHashMap::default();
        by_username.reserve(new_users.len());
        let mut duplicates = 0;

        for record in new_users {
            let key = username_key(&record.username);
            if insert_keyed(&mut by_username, key, record, policy) {
                debug!(username = %record.username, "Duplicate new user username");
                duplicates += 1;
            }
        }

        Self {
            by_username,
            duplicates,
        }
    }
}

/// Produce one mapping row per old user, in old user order.
///
/// MAC and new user records that match no old user do not appear in the
/// output; they are only counted in the diagnostics.
pub fn reconcile(
    old_users: &[OldUserRecord],
    macs: &[MacRecord],
    new_users: &[NewUserRecord],
    options: &ReconcileOptions,
) -> Reconciliation {
    let mac_index = MacIndex::build(macs, options);
    let user_index = NewUserIndex::build(new_users, options.on_duplicate);

    let mut matched_macs: FxHashSet<&str> = FxHashSet::default();
    let mut matched_users: FxHashSet<&str> = FxHashSet::default();
    let mut rows = Vec::with_capacity(old_users.len());

    for old in old_users {
        let id = identifier_key(&old.old_user_id);
        let mac_address = mac_index.by_user.get_key_value(id).map(|(key, mac)| {
            matched_macs.insert(*key);
            mac.clone()
        });

        let name = username_key(&old.username);
        let new_user_id = user_index
            .by_username
            .get_key_value(name.as_str())
            .map(|(key, record)| {
                matched_users.insert(key.as_str());
                record.new_user_id.clone()
            });

        rows.push(MappingRow {
            old_user_id: old.old_user_id.clone(),
            mac_address,
            new_user_id,
            username: old.username.clone(),
        });
    }

    let diagnostics = ReconcileDiagnostics {
        malformed_rows: 0,
        invalid_macs: mac_index.invalid,
        duplicate_mac_keys: mac_index.duplicates,
        duplicate_usernames: user_index.duplicates,
        orphaned_macs: mac_index.by_user.len() - matched_macs.len(),
        orphaned_new_users: user_index.by_username.len() - matched_users.len(),
    };

    if diagnostics.duplicate_mac_keys > 0 || diagnostics.duplicate_usernames > 0 {
        warn!(
            duplicate_mac_keys = diagnostics.duplicate_mac_keys,
            duplicate_usernames = diagnostics.duplicate_usernames,
            policy = ?options.on_duplicate,
            "Duplicate join keys resolved by policy"
        );
    }

    info!(
        rows = rows.len(),
        invalid_macs = diagnostics.invalid_macs,
        orphaned_macs = diagnostics.orphaned_macs,
        orphaned_new_users = diagnostics.orphaned_new_users,
        "Reconciliation complete"
    );

    Reconciliation { rows, diagnostics }
}
