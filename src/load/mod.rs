//! Entity database loaders.
//!
//! Loaders only turn files into [`EntityRecord`]s; mask validation happens
//! in [`crate::index::build_index`].

/// PrefixList XML reader.
pub mod xml;

use std::{fmt, fs, io, path::Path};

use crate::{
    index::{build_index, ConfigError, PrefixIndex},
    record::EntityRecord,
};

pub use xml::parse_prefix_xml;

/// Failure while reading the entity database.
#[derive(Debug)]
pub enum LoadError {
    /// File could not be read.
    Io(io::Error),
    /// Malformed XML.
    Xml(quick_xml::Error),
    /// Malformed JSON.
    Json(serde_json::Error),
    /// A field value could not be parsed.
    Field {
        /// Element name.
        field: String,
        /// Offending text.
        value: String,
    },
    /// The document ended inside a record.
    Truncated,
    /// Records loaded but the index could not be built.
    Config(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Xml(err) => write!(f, "xml: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::Field { field, value } => write!(f, "bad {field} value {value:?}"),
            Self::Truncated => f.write_str("document ended inside a record"),
            Self::Config(err) => write!(f, "index: {err}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ConfigError> for LoadError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Result alias for loaders.
pub type LoadResult<T> = Result<T, LoadError>;

/// Reads a JSON array of [`EntityRecord`]s.
pub fn parse_records_json(reader: impl io::Read) -> LoadResult<Vec<EntityRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads records from `path`; `.json` files are JSON, anything else PrefixList XML.
pub fn load_records(path: impl AsRef<Path>) -> LoadResult<Vec<EntityRecord>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let records = if is_json {
        parse_records_json(io::BufReader::new(fs::File::open(path)?))?
    } else {
        parse_prefix_xml(&fs::read_to_string(path)?)?
    };
    log::info!("loaded {} entity records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads `path` and builds the lookup index.
pub fn load_index(path: impl AsRef<Path>) -> LoadResult<PrefixIndex> {
    Ok(build_index(load_records(path)?)?)
}
