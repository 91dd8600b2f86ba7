use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::{MapError, MapResult};

/// Columns every relationship table must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 4] = ["source", "target", "relationship", "weight"];

/// One typed relationship row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
	/// Origin node label.
	pub source: String,
	/// Destination node label.
	pub target: String,
	/// Relationship kind, shown as the edge label.
	pub relationship: String,
	/// Relationship strength.
	pub weight: f64,
}

impl RelationshipRecord {
	/// Build a record from borrowed parts.
	pub fn new(source: &str, target: &str, relationship: &str, weight: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: relationship.into(),
			weight,
		}
	}
}

/// Untyped tabular relationship data: named columns and raw string cells.
///
/// Cells stay as text until the graph is built so that a bad `weight` is
/// reported against its row rather than rejected at load time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationshipTable {
	columns: Vec<String>,
	rows: Vec<Vec<String>>,
}

/// Resolved positions of the required columns inside a table.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ColumnIndex {
	pub source: usize,
	pub target: usize,
	pub relationship: usize,
	pub weight: usize,
}

/// A borrowed row, resolved through a [`ColumnIndex`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawRelationship<'a> {
	pub source: &'a str,
	pub target: &'a str,
	pub relationship: &'a str,
	pub weight: &'a str,
}

impl RelationshipTable {
	/// Create a table from column names and rows of cells.
	pub fn new<C, S>(columns: C, rows: Vec<Vec<String>>) -> Self
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			columns: columns.into_iter().map(Into::into).collect(),
			rows,
		}
	}

	/// Create an empty table with the given columns.
	pub fn with_columns<C, S>(columns: C) -> Self
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(columns, Vec::new())
	}

	/// Create a table with the canonical columns from typed records.
	pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RelationshipRecord>) -> Self {
		let rows = records
			.into_iter()
			.map(|r| {
				vec![
					r.source.clone(),
					r.target.clone(),
					r.relationship.clone(),
					r.weight.to_string(),
				]
			})
			.collect();
		Self::new(REQUIRED_COLUMNS, rows)
	}

	/// Parse delimited text whose first line is the header.
	pub fn from_csv_reader<R: Read>(reader: R) -> MapResult<Self> {
		let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
		let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
		let mut rows = Vec::new();
		for result in reader.records() {
			let record = result?;
			rows.push(record.iter().map(String::from).collect());
		}
		debug!("Parsed relationship table: {} columns, {} rows", columns.len(), rows.len());
		Ok(Self { columns, rows })
	}

	/// Parse CSV text held in memory.
	pub fn from_csv_str(text: &str) -> MapResult<Self> {
		Self::from_csv_reader(text.as_bytes())
	}

	/// Load a CSV file from disk.
	pub fn from_csv_path(path: impl AsRef<Path>) -> MapResult<Self> {
		let path = path.as_ref();
		debug!("Loading relationship table from {}", path.display());
		Self::from_csv_reader(File::open(path)?)
	}

	/// Append a row of cells.
	pub fn push_row<I, S>(&mut self, cells: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.rows.push(cells.into_iter().map(Into::into).collect());
	}

	/// Column names in order.
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Number of data rows.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Whether the table has no data rows.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Required columns that are absent, in canonical order.
	pub fn missing_columns(&self) -> Vec<String> {
		REQUIRED_COLUMNS
			.iter()
			.filter(|name| !self.columns.iter().any(|c| c == *name))
			.map(|name| name.to_string())
			.collect()
	}

	/// Check the schema once and resolve the required columns.
	pub(crate) fn column_index(&self) -> MapResult<ColumnIndex> {
		let missing = self.missing_columns();
		if !missing.is_empty() {
			return Err(MapError::MissingColumns(missing));
		}
		let position = |name: &str| self.columns.iter().position(|c| c == name).unwrap_or_default();
		Ok(ColumnIndex {
			source: position("source"),
			target: position("target"),
			relationship: position("relationship"),
			weight: position("weight"),
		})
	}

	/// Rows in input order, with absent trailing cells read as empty.
	pub(crate) fn relationships(
		&self,
		index: ColumnIndex,
	) -> impl Iterator<Item = RawRelationship<'_>> + '_ {
		self.rows.iter().map(move |row| {
			let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
			RawRelationship {
				source: cell(index.source),
				target: cell(index.target),
				relationship: cell(index.relationship),
				weight: cell(index.weight),
			}
		})
	}
}
