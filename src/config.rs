/// Number of mapping rows included in a preview
pub const PREVIEW_SAMPLE_SIZE: usize = 10;

/// Marker written for a mapping field with no matching record
pub const UNRESOLVED: &str = "N/A";

/// Suggested filename for the exported mapping
pub const EXPORT_FILENAME: &str = "user_mac_mapping.csv";

/// Content type of the exported mapping
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Header row of the exported mapping, in column order
pub const EXPORT_HEADER: [&str; 4] = ["old_user_id", "mac_address", "new_user_id", "username"];

/// Values that database dumps write for a missing MAC; they never normalize
pub const NULL_MARKERS: &[&str] = &["\\N", "N/A"];

pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Separators stripped from textual MAC addresses before validation
pub const MAC_SEPARATORS: &[char] = &[':', '-', '.'];

/// Raw byte length of a MAC address
pub const MAC_BYTES: usize = 6;

// Recognized header spellings per column role, matched case-insensitively.
// The first alias present in a header wins.
pub const OLD_ID_ALIASES: &[&str] = &["id", "user_id", "old_user_id", "userid"];
pub const MAC_USER_ID_ALIASES: &[&str] = &["user_id", "id", "old_user_id", "userid"];
pub const NEW_ID_ALIASES: &[&str] = &["id", "user_id", "new_user_id", "userid"];
pub const USERNAME_ALIASES: &[&str] = &["username", "user_name", "login"];
pub const MAC_ALIASES: &[&str] = &["mac", "mac_address", "macaddress", "mac_addr"];
