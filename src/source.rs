//! Source file loading.
//!
//! Profile data lives in four files in the data directory: `site`, `resume`,
//! `skills` and `projects`. Each may be written as YAML, TOML or JSON; the file
//! extension picks the parser. Whatever the format, the result is an untyped
//! JSON mapping. The validator inspects these mappings before anything is
//! deserialized into typed records, so schema problems can be reported all at
//! once instead of one serde error at a time.
//!
//! ```text
//! data/
//! ├── site.yml        # lang, visibility, seo, documents, i18n overrides
//! ├── resume.yml      # name, tagline, contact, experience, ...
//! ├── skills.yml      # categories → skills
//! └── projects.yml    # projects
//! ```

use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An untyped key/value mapping as parsed from a source file.
pub type Mapping = Map<String, Value>;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Required file \"{}\" not found", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse \"{}\": {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("\"{}\": {message}", .path.display())]
    Schema { path: PathBuf, message: String },
    #[error("IO error reading \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Structured-text formats accepted for source files and front-matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Pick a format from the file extension. Anything unrecognised is YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Format::Toml,
            "json" => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Why a piece of text could not become a mapping. Carries no path so it can
/// be reused for front-matter blocks, which live inside a larger file.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingFailure {
    Syntax(String),
    NotAMapping,
}

impl MappingFailure {
    fn at(self, path: &Path) -> LoadError {
        match self {
            MappingFailure::Syntax(message) => LoadError::Parse {
                path: path.to_path_buf(),
                message,
            },
            MappingFailure::NotAMapping => LoadError::Schema {
                path: path.to_path_buf(),
                message: "expected a mapping at the top level".to_string(),
            },
        }
    }
}

impl std::fmt::Display for MappingFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingFailure::Syntax(message) => f.write_str(message),
            MappingFailure::NotAMapping => f.write_str("does not contain a mapping"),
        }
    }
}

const SOURCE_EXTENSIONS: &[&str] = &["yml", "yaml", "toml", "json"];

/// Locate `<stem>.{yml,yaml,toml,json}` in `dir`, first match wins.
///
/// The `NotFound` error names the `.yml` path since that is the documented
/// default.
pub fn find_source(dir: &Path, stem: &str) -> Result<PathBuf, LoadError> {
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| LoadError::NotFound(dir.join(format!("{stem}.yml"))))
}

/// Read and parse a structured-text file into a mapping.
pub fn load_mapping(path: &Path) -> Result<Mapping, LoadError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_mapping(&content, Format::from_path(path)).map_err(|failure| failure.at(path))
}

/// Parse text in the given format into an untyped value.
///
/// Blank YAML yields `Null` rather than an error so that callers can decide
/// whether emptiness is acceptable.
pub fn parse_value(text: &str, format: Format) -> Result<Value, MappingFailure> {
    let parsed = match format {
        Format::Yaml if text.trim().is_empty() => Ok(Value::Null),
        Format::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str::<Value>(text).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str::<Value>(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(MappingFailure::Syntax)
}

/// Parse text into a mapping, rejecting scalars, sequences and empty documents.
pub fn parse_mapping(text: &str, format: Format) -> Result<Mapping, MappingFailure> {
    match parse_value(text, format)? {
        Value::Object(map) => Ok(map),
        _ => Err(MappingFailure::NotAMapping),
    }
}
