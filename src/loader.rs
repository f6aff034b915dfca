use crate::config::{
    MAC_ALIASES, MAC_USER_ID_ALIASES, NEW_ID_ALIASES, OLD_ID_ALIASES,
    USERNAME_ALIASES, UTF8_BOM,
};
use crate::error::{FileKind, MapError, Result};
use crate::models::{MacRecord, NewUserRecord, OldUserRecord};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

/// A required column role and the header spellings accepted for it
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// A record type loadable from one of the input files
pub trait Tabular: Sized {
    const FILE: FileKind;
    const COLUMNS: [Column; 2];

    /// Build from raw field values, in `COLUMNS` order
    fn from_fields(fields: [String; 2]) -> Self;
}

impl Tabular for OldUserRecord {
    const FILE: FileKind = FileKind::Old;
    const COLUMNS: [Column; 2] = [
        Column {
            name: "id",
            aliases: OLD_ID_ALIASES,
        },
        Column {
            name: "username",
            aliases: USERNAME_ALIASES,
        },
    ];

    fn from_fields([old_user_id, username]: [String; 2]) -> Self {
        Self {
            old_user_id,
            username,
        }
    }
}

impl Tabular for MacRecord {
    const FILE: FileKind = FileKind::Mags;
    const COLUMNS: [Column; 2] = [
        Column {
            name: "user_id",
            aliases: MAC_USER_ID_ALIASES,
        },
        Column {
            name: "mac",
            aliases: MAC_ALIASES,
        },
    ];

    fn from_fields([user_id, mac_address]: [String; 2]) -> Self {
        Self {
            user_id,
            mac_address,
        }
    }
}

impl Tabular for NewUserRecord {
    const FILE: FileKind = FileKind::New;
    const COLUMNS: [Column; 2] = [
        Column {
            name: "id",
            aliases: NEW_ID_ALIASES,
        },
        Column {
            name: "username",
            aliases: USERNAME_ALIASES,
        },
    ];

    fn from_fields([new_user_id, username]: [String; 2]) -> Self {
        Self {
            new_user_id,
            username,
        }
    }
}

/// Records loaded from one file, in file order
#[derive(Debug)]
pub struct Dataset<T> {
    pub records: Vec<T>,
    pub malformed_rows: usize,
}

/// Parse delimited text with a header row into typed records.
///
/// Rows with a field count different from the header, or with an empty
/// required field, are skipped and counted. Only a required column missing
/// from the header fails the load.
pub fn load<T: Tabular>(raw: &[u8]) -> Result<Dataset<T>> {
    let file = T::FILE;
    let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    if std::str::from_utf8(bytes).is_err() {
        return Err(MapError::Encoding { file });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers().map_err(MapError::internal)?.clone();
    let positions = resolve_columns(&headers, &T::COLUMNS).map_err(|missing| {
        warn!(%file, ?missing, "Required columns missing from header");
        MapError::Schema { file, missing }
    })?;

    let mut records = Vec::new();
    let mut malformed_rows = 0usize;

    for result in reader.records() {
        let record = result.map_err(MapError::internal)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            debug!(
                %file,
                line,
                fields = record.len(),
                expected = headers.len(),
                "Skipping row with wrong field count"
            );
            malformed_rows += 1;
            continue;
        }

        match required_fields(&record, positions) {
            Some(fields) => records.push(T::from_fields(fields)),
            None => {
                debug!(%file, line, "Skipping row with empty required field");
                malformed_rows += 1;
            }
        }
    }

    info!(
        %file,
        records = records.len(),
        malformed = malformed_rows,
        "Loaded input file"
    );

    Ok(Dataset {
        records,
        malformed_rows,
    })
}

/// Header positions for each column, or the names of the columns with no
/// matching header.
fn resolve_columns(
    headers: &StringRecord,
    columns: &[Column; 2],
) -> std::result::Result<[usize; 2], Vec<&'static str>> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |column: &Column| {
        column
            .aliases
            .iter()
            .find_map(|alias| normalized.iter().position(|h| h == alias))
    };

    match (find(&columns[0]), find(&columns[1])) {
        (Some(a), Some(b)) => Ok([a, b]),
        (a, b) => Err(columns
            .iter()
            .zip([a, b])
            .filter(|(_, pos)| pos.is_none())
            .map(|(column, _)| column.name)
            .collect()),
    }
}

fn required_fields(record: &StringRecord, positions: [usize; 2]) -> Option<[String; 2]> {
    let field = |pos: usize| {
        let value = record.get(pos)?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    Some([field(positions[0])?, field(positions[1])?])
}
