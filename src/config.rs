// Activity Loader: reads the YAML activities file and turns it into an
// ordered catalog keyed by activity name.
//
// The file is a top-level sequence of mappings with string fields `name`,
// `description` and `url`. The document is parsed first, then each record is
// deserialized on its own so a bad entry is reported with its position;
// unknown fields are ignored. Loading never touches the filesystem beyond the
// activities file itself.

use crate::error::ConfigError;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

/// One entry of the activities file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Display label, unique within a catalog.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Page path relative to the activities directory.
    pub url: String,
}

/// Ordered, read-only mapping from activity name to its record.
///
/// Order is the order of the source file. Names are unique: a duplicate is a
/// load error rather than a silent overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCatalog {
    records: Vec<ActivityRecord>,
    by_name: HashMap<String, usize>,
}

impl ActivityCatalog {
    /// Builds a catalog from records in order, rejecting duplicate names.
    pub fn from_records(records: Vec<ActivityRecord>) -> Result<Self, ConfigError> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if let Some(first) = by_name.insert(record.name.clone(), index) {
                return Err(ConfigError::DuplicateActivity {
                    name: record.name.clone(),
                    first,
                    second: index,
                });
            }
        }
        Ok(ActivityCatalog { records, by_name })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ActivityRecord> {
        self.by_name.get(name).map(|&index| &self.records[index])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get_index(&self, index: usize) -> Option<&ActivityRecord> {
        self.records.get(index)
    }

    /// Activity names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ActivityCatalog {
    type Item = &'a ActivityRecord;
    type IntoIter = std::slice::Iter<'a, ActivityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Load the activity catalog from a local YAML file.
pub fn load(activities_filepath: impl AsRef<Path>) -> Result<ActivityCatalog, ConfigError> {
    let path = activities_filepath.as_ref();
    let source_name = path.display().to_string();
    let doc = read_local_yaml(path)?;
    let catalog = catalog_from_value(doc, &source_name)?;
    info!(
        "loaded {} activities from {}",
        catalog.len(),
        source_name
    );
    Ok(catalog)
}

/// Load the activity catalog from a local path or an `http(s)://` URL.
pub fn load_source(source: &str) -> Result<ActivityCatalog, ConfigError> {
    if is_remote(source) {
        let doc = load_yaml(source)?;
        let catalog = catalog_from_value(doc, source)?;
        info!("loaded {} activities from {}", catalog.len(), source);
        Ok(catalog)
    } else {
        load(source)
    }
}

/// Read a YAML document from a local file or an `http(s)://` URL.
///
/// Returns the raw document; an empty file yields `Value::Null`.
pub fn load_yaml(source: &str) -> Result<Value, ConfigError> {
    if is_remote(source) {
        let text = fetch_remote(source)?;
        parse_yaml(&text, source)
    } else {
        read_local_yaml(Path::new(source))
    }
}

/// Convert a parsed YAML document into a catalog. No partial catalog is
/// returned: the first invalid record aborts the whole conversion.
pub fn catalog_from_value(doc: Value, source_name: &str) -> Result<ActivityCatalog, ConfigError> {
    let items: Option<Vec<Value>> = serde_yaml::from_value(doc).map_err(|e| {
        schema_error(
            source_name,
            format!("expected a top-level sequence of activities: {e}"),
        )
    })?;

    let records = items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_yaml::from_value::<ActivityRecord>(item)
                .map_err(|e| schema_error(source_name, format!("record {index}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    ActivityCatalog::from_records(records)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_local_yaml(path: &Path) -> Result<Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml(&text, &path.display().to_string())
}

fn fetch_remote(url: &str) -> Result<String, ConfigError> {
    let fetch_err = |message: String| ConfigError::Fetch {
        url: url.to_string(),
        message,
    };
    debug!("fetching activities from {url}");
    let client = Client::builder()
        .build()
        .map_err(|e| fetch_err(format!("failed to build HTTP client: {e}")))?;
    let res = client
        .get(url)
        .send()
        .map_err(|e| fetch_err(e.to_string()))?;
    if !res.status().is_success() {
        return Err(fetch_err(format!("server answered {}", res.status())));
    }
    res.text().map_err(|e| fetch_err(e.to_string()))
}

fn parse_yaml(text: &str, source_name: &str) -> Result<Value, ConfigError> {
    serde_yaml::from_str(text).map_err(|source| ConfigError::ConfigParseError {
        source_name: source_name.to_string(),
        source,
    })
}

fn schema_error(source_name: &str, message: String) -> ConfigError {
    ConfigError::ConfigSchemaError {
        source_name: source_name.to_string(),
        message,
    }
}
