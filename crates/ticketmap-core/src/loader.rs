use crate::model::{TicketRecord, non_empty};
use crate::{Error, Result};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["key", "depth"];

/// Extension tried when the given path does not exist and has none.
pub const DEFAULT_EXTENSION: &str = "csv";

/// Resolves the input path, retrying with `.csv` appended when `path` does not exist and
/// lacks an extension.
pub fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if path.extension().is_none() {
        let mut with_ext = OsString::from(path.as_os_str());
        with_ext.push(".");
        with_ext.push(DEFAULT_EXTENSION);
        let candidate = PathBuf::from(with_ext);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "added .{DEFAULT_EXTENSION} extension");
            return Ok(candidate);
        }
    }
    Err(Error::InputNotFound {
        path: path.to_path_buf(),
    })
}

/// Loads every ticket row from a CSV export, in file order.
pub fn load_tickets(path: impl AsRef<Path>) -> Result<Vec<TicketRecord>> {
    let path = resolve_input_path(path.as_ref())?;
    tracing::debug!(path = %path.display(), "loading tickets");
    let file = std::fs::File::open(&path)?;
    let records = read_tickets(file)?;
    tracing::debug!(count = records.len(), "loaded tickets from CSV");
    Ok(records)
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    key: usize,
    depth: usize,
    from_key: Option<usize>,
    link_via: Option<usize>,
    summary: Option<usize>,
    status: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
                found: headers.iter().map(str::to_string).collect(),
            })
        };

        Ok(Self {
            key: required(REQUIRED_COLUMNS[0])?,
            depth: required(REQUIRED_COLUMNS[1])?,
            from_key: position("from_key"),
            link_via: position("link_via"),
            summary: position("summary"),
            status: position("status"),
        })
    }
}

/// Parses ticket rows from any CSV source. Extra columns are ignored.
pub fn read_tickets<R: Read>(reader: R) -> Result<Vec<TicketRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    for (row_index, row) in rdr.records().enumerate() {
        let row = row?;
        let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

        let key = field(Some(columns.key));
        if key.is_empty() {
            tracing::warn!(row = row_index + 1, "skipping row without a ticket key");
            continue;
        }

        records.push(TicketRecord {
            key: key.to_string(),
            depth: parse_depth(field(Some(columns.depth))),
            from_key: non_empty(field(columns.from_key)),
            link_via: non_empty(field(columns.link_via)),
            summary: field(columns.summary).to_string(),
            status: non_empty(field(columns.status)),
        });
    }
    Ok(records)
}

/// Permissive depth coercion: anything that is not a non-negative integer is depth 0.
pub fn parse_depth(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}
