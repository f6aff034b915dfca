use crate::models::MappingRow;
use rustc_hash::FxHashSet;

/// Summary counts over a mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    pub total_mappings: usize,
    pub with_mac: usize,
    pub without_mac: usize,
    pub with_new_id: usize,
    /// Distinct resolved MAC addresses
    pub unique_macs: usize,
}

impl MappingStats {
    pub fn from_rows(rows: &[MappingRow]) -> Self {
        let mut with_mac = 0;
        let mut with_new_id = 0;
        let mut macs = FxHashSet::default();

        for row in rows {
            if let Some(mac) = &row.mac_address {
                with_mac += 1;
                macs.insert(mac.as_str());
            }
            if row.new_user_id.is_some() {
                with_new_id += 1;
            }
        }

        Self {
            total_mappings: rows.len(),
            with_mac,
            without_mac: rows.len() - with_mac,
            with_new_id,
            unique_macs: macs.len(),
        }
    }
}
