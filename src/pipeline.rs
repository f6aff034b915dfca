//! Request-scoped entry points: three input blobs in, one mapping out.
//!
//! Each call loads, indexes and joins from scratch. Nothing is cached or
//! shared between calls.

use crate::error::{FileKind, MapError, Result};
use crate::loader::{self, Dataset};
use crate::models::{MacRecord, MappingRow, NewUserRecord, OldUserRecord};
use crate::output::{self, Export, Preview};
use crate::reconcile::{self, ReconcileDiagnostics, ReconcileOptions};
use crate::stats::MappingStats;
use tracing::info;

/// The three submitted files. `None` means the file was not supplied.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub old_file: Option<Vec<u8>>,
    pub mags_file: Option<Vec<u8>>,
    pub new_file: Option<Vec<u8>>,
}

impl Inputs {
    pub fn new(old_file: Vec<u8>, mags_file: Vec<u8>, new_file: Vec<u8>) -> Self {
        Self {
            old_file: Some(old_file),
            mags_file: Some(mags_file),
            new_file: Some(new_file),
        }
    }

    fn get(&self, kind: FileKind) -> Option<&[u8]> {
        match kind {
            FileKind::Old => self.old_file.as_deref(),
            FileKind::Mags => self.mags_file.as_deref(),
            FileKind::New => self.new_file.as_deref(),
        }
    }

    /// All three blobs, or a `MissingInput` naming every absent file
    fn require(&self) -> Result<(&[u8], &[u8], &[u8])> {
        match (
            self.get(FileKind::Old),
            self.get(FileKind::Mags),
            self.get(FileKind::New),
        ) {
            (Some(old), Some(mags), Some(new)) => Ok((old, mags, new)),
            _ => Err(MapError::MissingInput {
                files: FileKind::ALL
                    .into_iter()
                    .filter(|kind| self.get(*kind).is_none())
                    .map(|kind| kind.as_str())
                    .collect(),
            }),
        }
    }
}

/// A completed reconciliation
#[derive(Debug, Clone)]
pub struct Mapping {
    pub rows: Vec<MappingRow>,
    pub diagnostics: ReconcileDiagnostics,
}

impl Mapping {
    pub fn stats(&self) -> MappingStats {
        MappingStats::from_rows(&self.rows)
    }

    pub fn preview(&self) -> Preview<'_> {
        Preview::new(&self.rows)
    }

    pub fn export(&self) -> Result<Export> {
        output::export(&self.rows)
    }
}

/// Load all three files and reconcile them.
///
/// Missing files are reported before any parsing. A schema error in any file
/// aborts the whole call.
pub fn run(inputs: &Inputs, options: &ReconcileOptions) -> Result<Mapping> {
    let (old_raw, mags_raw, new_raw) = inputs.require()?;

    let old: Dataset<OldUserRecord> = loader::load(old_raw)?;
    let macs: Dataset<MacRecord> = loader::load(mags_raw)?;
    let new: Dataset<NewUserRecord> = loader::load(new_raw)?;

    let result = reconcile::reconcile(&old.records, &macs.records, &new.records, options);
    let diagnostics = ReconcileDiagnostics {
        malformed_rows: old.malformed_rows + macs.malformed_rows + new.malformed_rows,
        ..result.diagnostics
    };

    info!(
        old_users = old.records.len(),
        mac_records = macs.records.len(),
        new_users = new.records.len(),
        malformed_rows = diagnostics.malformed_rows,
        "Mapping built"
    );

    Ok(Mapping {
        rows: result.rows,
        diagnostics,
    })
}

/// Preview operation: JSON summary with the first rows of the mapping
pub fn preview_json(inputs: &Inputs, options: &ReconcileOptions) -> Result<String> {
    run(inputs, options)?.preview().to_json()
}

/// Export operation: the complete mapping as CSV
pub fn export(inputs: &Inputs, options: &ReconcileOptions) -> Result<Export> {
    run(inputs, options)?.export()
}
