//! Preview and export renderings of a mapping.
//!
//! Both render unresolved fields as `N/A`. The preview is bounded to the first
//! [`PREVIEW_SAMPLE_SIZE`] rows; the export always contains every row.

use crate::config::{EXPORT_CONTENT_TYPE, EXPORT_FILENAME, EXPORT_HEADER, PREVIEW_SAMPLE_SIZE};
use crate::error::{MapError, Result};
use crate::models::{DisplayRow, MappingRow};
use crate::stats::MappingStats;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Preview<'a> {
    pub success: bool,
    pub total_mappings: usize,
    pub with_mac: usize,
    pub without_mac: usize,
    pub sample: Vec<DisplayRow<'a>>,
}

impl<'a> Preview<'a> {
    pub fn new(rows: &'a [MappingRow]) -> Self {
        let stats = MappingStats::from_rows(rows);
        Self {
            success: true,
            total_mappings: stats.total_mappings,
            with_mac: stats.with_mac,
            without_mac: stats.without_mac,
            sample: rows
                .iter()
                .take(PREVIEW_SAMPLE_SIZE)
                .map(MappingRow::display)
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MapError::internal)
    }
}

/// The complete mapping as a downloadable CSV document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

/// Render every row as CSV with a header line
pub fn render_csv(rows: &[MappingRow]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(64 * (rows.len() + 1)));

    writer
        .write_record(EXPORT_HEADER)
        .map_err(MapError::internal)?;
    for row in rows {
        writer
            .write_record(row.display().fields())
            .map_err(MapError::internal)?;
    }

    let bytes = writer.into_inner().map_err(MapError::internal)?;
    String::from_utf8(bytes).map_err(MapError::internal)
}

pub fn export(rows: &[MappingRow]) -> Result<Export> {
    Ok(Export {
        filename: EXPORT_FILENAME,
        content_type: EXPORT_CONTENT_TYPE,
        body: render_csv(rows)?,
    })
}
