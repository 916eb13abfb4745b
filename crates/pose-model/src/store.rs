//! Wholesale load/save of coordinate tables.
//!
//! Two on-disk formats are supported, selected by file extension:
//!
//! - **JSON** (`.json`): a single document carrying the store key, scorer,
//!   individual and bodypart labels, and one row per frame of
//!   `[x, y, x, y, ...]` values in individual-major, bodypart order.
//!   Missing values are `null`.
//! - **CSV** (`.csv`): four header rows (`scorer`, `individuals`,
//!   `bodyparts`, `coords`) followed by one row per frame whose first cell is
//!   the frame index. Missing values are empty cells.
//!
//! Writes go to a temporary sibling file that replaces the store only once
//! it is complete, so a failed save leaves the previous store readable.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use posefix_common::{PosefixError, PosefixResult};

use crate::point::Point2D;
use crate::table::{CoordinateTable, DEFAULT_STORE_KEY};

const HEADER_LABELS: [&str; 4] = ["scorer", "individuals", "bodyparts", "coords"];

/// On-disk format of a coordinate store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Csv,
}

impl StoreFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> PosefixResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(PosefixError::malformed(format!(
                "unsupported store extension for {} (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

/// JSON store document.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "default_key")]
    key: String,
    #[serde(default)]
    scorer: String,
    individuals: Vec<String>,
    bodyparts: Vec<String>,
    frames: Vec<Vec<Option<f64>>>,
}

fn default_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

/// Load a coordinate table from a store file.
pub fn load_table(path: impl AsRef<Path>) -> PosefixResult<CoordinateTable> {
    let path = path.as_ref();
    let table = match StoreFormat::from_path(path)? {
        StoreFormat::Json => load_json(path)?,
        StoreFormat::Csv => load_csv(path)?,
    };
    tracing::debug!(
        path = %path.display(),
        frames = table.frame_count(),
        individuals = table.individuals().len(),
        bodyparts = table.bodyparts().len(),
        "Loaded coordinate table"
    );
    Ok(table)
}

/// Replace a store file with the full contents of `table`.
pub fn save_table(table: &CoordinateTable, path: impl AsRef<Path>) -> PosefixResult<()> {
    let path = path.as_ref();
    match StoreFormat::from_path(path)? {
        StoreFormat::Json => save_json(table, path)?,
        StoreFormat::Csv => save_csv(table, path)?,
    }
    tracing::info!(
        path = %path.display(),
        key = table.key(),
        frames = table.frame_count(),
        "Saved coordinate table"
    );
    Ok(())
}

fn load_json(path: &Path) -> PosefixResult<CoordinateTable> {
    let file = File::open(path).map_err(|e| PosefixError::io(path, e))?;
    let doc: StoreDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| PosefixError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let width = doc.individuals.len() * doc.bodyparts.len() * 2;
    let mut points = Vec::with_capacity(doc.frames.len() * width / 2);
    for (frame, row) in doc.frames.iter().enumerate() {
        if row.len() != width {
            return Err(PosefixError::malformed(format!(
                "{}: frame {frame} has {} values, expected {width}",
                path.display(),
                row.len()
            )));
        }
        points.extend(row.chunks_exact(2).map(|xy| {
            Point2D::new(
                xy[0].unwrap_or(f64::NAN),
                xy[1].unwrap_or(f64::NAN),
            )
        }));
    }

    CoordinateTable::from_points(doc.key, doc.scorer, doc.individuals, doc.bodyparts, points)
}

fn save_json(table: &CoordinateTable, path: &Path) -> PosefixResult<()> {
    let stride = table.individuals().len() * table.bodyparts().len();
    let frames = table
        .points()
        .chunks(stride)
        .map(|frame| {
            frame
                .iter()
                .flat_map(|p| [present_or_none(p.x), present_or_none(p.y)])
                .collect()
        })
        .collect();

    let doc = StoreDocument {
        key: table.key().to_string(),
        scorer: table.scorer().to_string(),
        individuals: table.individuals().to_vec(),
        bodyparts: table.bodyparts().to_vec(),
        frames,
    };

    persist_with(path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &doc).map_err(|e| PosefixError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        writer.flush().map_err(|e| PosefixError::io(path, e))
    })
}

fn load_csv(path: &Path) -> PosefixResult<CoordinateTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let mut records = reader.records();

    let mut header_rows = Vec::with_capacity(HEADER_LABELS.len());
    for label in HEADER_LABELS {
        let record = records
            .next()
            .ok_or_else(|| {
                PosefixError::missing_data(format!(
                    "{}: header row '{label}' missing",
                    path.display()
                ))
            })?
            .map_err(|e| csv_error(path, e))?;
        if record.get(0).map(str::trim) != Some(label) {
            return Err(PosefixError::missing_data(format!(
                "{}: expected header row '{label}', found '{}'",
                path.display(),
                record.get(0).unwrap_or_default()
            )));
        }
        header_rows.push(record);
    }

    let columns = ColumnLayout::from_headers(path, &header_rows)?;

    let mut values = Vec::new();
    for (row_index, record) in records.enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let frame: usize = record
            .get(0)
            .map(str::trim)
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                PosefixError::malformed(format!(
                    "{}: row {row_index} has no integer frame index",
                    path.display()
                ))
            })?;
        if frame != row_index {
            return Err(PosefixError::malformed(format!(
                "{}: frame index {frame} at row {row_index}; frames must be dense and 0-based",
                path.display()
            )));
        }

        let mut row = vec![f64::NAN; columns.slots.len()];
        for (column, slot) in columns.slots.iter().enumerate() {
            let cell = record.get(column + 1).unwrap_or_default().trim();
            row[*slot] = parse_cell(cell).ok_or_else(|| {
                PosefixError::malformed(format!(
                    "{}: non-numeric value '{cell}' at frame {frame}",
                    path.display()
                ))
            })?;
        }
        values.extend(row);
    }

    let points = values
        .chunks_exact(2)
        .map(|xy| Point2D::new(xy[0], xy[1]))
        .collect();

    CoordinateTable::from_points(
        DEFAULT_STORE_KEY,
        columns.scorer,
        columns.individuals,
        columns.bodyparts,
        points,
    )
}

fn save_csv(table: &CoordinateTable, path: &Path) -> PosefixResult<()> {
    let mut headers: [Vec<String>; 4] = HEADER_LABELS.map(|label| vec![label.to_string()]);
    for individual in table.individuals() {
        for bodypart in table.bodyparts() {
            for axis in ["x", "y"] {
                headers[0].push(table.scorer().to_string());
                headers[1].push(individual.clone());
                headers[2].push(bodypart.clone());
                headers[3].push(axis.to_string());
            }
        }
    }

    let stride = table.individuals().len() * table.bodyparts().len();
    persist_with(path, |file| {
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for row in &headers {
            writer.write_record(row).map_err(|e| csv_error(path, e))?;
        }
        for (frame, points) in table.points().chunks(stride).enumerate() {
            let mut row = Vec::with_capacity(stride * 2 + 1);
            row.push(frame.to_string());
            for p in points {
                row.push(format_cell(p.x));
                row.push(format_cell(p.y));
            }
            writer.write_record(&row).map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| PosefixError::io(path, e))
    })
}

/// How CSV data columns map onto the table's point layout.
struct ColumnLayout {
    scorer: String,
    individuals: Vec<String>,
    bodyparts: Vec<String>,
    /// Flat value slot (`2 * point index + axis`) for each data column.
    slots: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(path: &Path, rows: &[csv::StringRecord]) -> PosefixResult<Self> {
        let mut scorer: Option<&str> = None;
        for name in data_cells(&rows[0]) {
            match scorer {
                None => scorer = Some(name),
                Some(existing) if existing != name => {
                    return Err(PosefixError::malformed(format!(
                        "{}: multiple scorers '{existing}' and '{name}'",
                        path.display()
                    )));
                }
                Some(_) => {}
            }
        }
        let scorer = scorer
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PosefixError::missing_data(format!("{}: no scorer", path.display())))?
            .to_string();

        let individuals = first_appearance(data_cells(&rows[1]));
        let bodyparts = first_appearance(data_cells(&rows[2]));

        let mut slots = Vec::new();
        let mut filled = vec![false; individuals.len() * bodyparts.len() * 2];
        for (((individual, bodypart), axis), column) in data_cells(&rows[1])
            .zip(data_cells(&rows[2]))
            .zip(data_cells(&rows[3]))
            .zip(1usize..)
        {
            let axis = match axis {
                "x" => 0,
                "y" => 1,
                other => {
                    return Err(PosefixError::malformed(format!(
                        "{}: unsupported coordinate '{other}' in column {column}",
                        path.display()
                    )));
                }
            };
            let i = position(&individuals, individual);
            let b = position(&bodyparts, bodypart);
            let slot = (i * bodyparts.len() + b) * 2 + axis;
            if filled[slot] {
                return Err(PosefixError::malformed(format!(
                    "{}: duplicate column {individual}/{bodypart}/{}",
                    path.display(),
                    if axis == 0 { "x" } else { "y" }
                )));
            }
            filled[slot] = true;
            slots.push(slot);
        }

        if let Some(slot) = filled.iter().position(|f| !f) {
            let point = slot / 2;
            return Err(PosefixError::missing_data(format!(
                "{}: no column for {}/{}/{}",
                path.display(),
                individuals[point / bodyparts.len()],
                bodyparts[point % bodyparts.len()],
                if slot % 2 == 0 { "x" } else { "y" }
            )));
        }

        Ok(Self {
            scorer,
            individuals,
            bodyparts,
            slots,
        })
    }
}

/// Header cells after the row label.
fn data_cells(record: &csv::StringRecord) -> impl Iterator<Item = &str> {
    record.iter().skip(1).map(str::trim)
}

fn first_appearance<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    for name in names {
        if !ordered.iter().any(|n| n == name) {
            ordered.push(name.to_string());
        }
    }
    ordered
}

fn position(labels: &[String], name: &str) -> usize {
    labels.iter().position(|l| l == name).unwrap_or_default()
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn present_or_none(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn csv_error(path: &Path, err: csv::Error) -> PosefixError {
    if !err.is_io_error() {
        return PosefixError::malformed(format!("{}: {err}", path.display()));
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PosefixError::io(path, source),
        kind => PosefixError::malformed(format!("{}: {kind:?}", path.display())),
    }
}

/// Write through a temporary sibling file, then move it over `path`.
fn persist_with<F>(path: &Path, write: F) -> PosefixResult<()>
where
    F: FnOnce(&mut File) -> PosefixResult<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PosefixError::io(dir, e))?;
    write(tmp.as_file_mut())?;
    tmp.persist(path)
        .map_err(|e| PosefixError::io(path, e.error))?;
    Ok(())
}
