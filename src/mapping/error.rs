use thiserror::Error;

/// Hard failures raised while building an abstract map.
///
/// These are caller mistakes (bad schema, unknown layout, malformed values)
/// and are never downgraded to defaults.
#[derive(Debug, Error)]
pub enum MapError {
	/// One or more of the required relationship columns is absent.
	#[error("Missing required columns: {}", .0.join(", "))]
	MissingColumns(Vec<String>),

	/// The layout selector is not one of the recognized names.
	#[error("Unknown layout: {name}. Choose from [{}]", .valid.join(", "))]
	UnknownLayout {
		/// The rejected name.
		name: String,
		/// Every accepted layout name.
		valid: Vec<&'static str>,
	},

	/// A `weight` cell could not be coerced to a float.
	#[error("Invalid weight {value:?} in row {row}: expected a number")]
	InvalidWeight {
		/// Zero-based data row index.
		row: usize,
		/// The offending cell.
		value: String,
	},

	/// Delimited text could not be parsed.
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// The source file could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Options could not be deserialized.
	#[error("Configuration error: {0}")]
	Config(#[from] serde_json::Error),
}

/// Convenience alias used across the mapping module.
pub type MapResult<T> = Result<T, MapError>;
