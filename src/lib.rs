//! macmap: user directory reconciliation across a migration
//!
//! Takes three delimited-text exports and builds one mapping row per old user,
//! tying the old identity to its MAC address and its new identity:
//!
//! 1. **Load** -- Parse each file, matching header aliases case-insensitively, and
//!    drop malformed rows without aborting
//! 2. **Normalize** -- Canonical `aa:bb:cc:dd:ee:ff` MACs, trimmed and case-folded
//!    usernames, trimmed user ids
//! 3. **Reconcile** -- Index MACs by user id and new users by username, then walk the
//!    old users in file order
//! 4. **Render** -- A bounded JSON preview or the full CSV export
//!
//! Every call is a pure function of its three inputs. There is no state shared
//! between calls and nothing is cached.
//!
//! # Key Modules
//!
//! - [`loader`] -- Header validation and typed record parsing
//! - [`normalize`] -- MAC, username and identifier join keys
//! - [`reconcile`] -- Join indexes, duplicate policy, diagnostics
//! - [`stats`] -- Summary counts over a mapping
//! - [`output`] -- Preview JSON and CSV export
//! - [`pipeline`] -- Request-level entry points
//! - [`error`] -- Fatal error kinds and their client-facing detail
//! - [`config`] -- Constants and header aliases
//!
//! # Example Usage
//!
//! ```bash
//! # Inspect counts and the first rows
//! macmap preview --old-file old.csv --mags-file mags.csv --new-file new.csv
//!
//! # Write the full mapping
//! macmap export --old-file old.csv --mags-file mags.csv --new-file new.csv -o user_mac_mapping.csv
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod stats;

pub use error::{FileKind, MapError};
pub use normalize::MacEncoding;
pub use pipeline::{export, preview_json, run, Inputs, Mapping};
pub use reconcile::{DuplicatePolicy, ReconcileOptions};
