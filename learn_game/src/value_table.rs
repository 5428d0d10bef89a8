use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Learned value of each board state, keyed by canonical hash.
///
/// Entries are only ever added or updated, never removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    values: HashMap<String, f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    #[default]
    Json,
    Pickle,
}

impl Deref for ValueTable {
    type Target = HashMap<String, f64>;
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.values
    }
}

impl From<HashMap<String, f64>> for ValueTable {
    fn from(values: HashMap<String, f64>) -> Self {
        ValueTable { values }
    }
}

impl ValueTable {
    pub fn new() -> Self {
        ValueTable {
            values: HashMap::with_capacity(6000),
        }
    }
    /// Unseen states are worth 0.0.
    pub fn value(&self, state_key: &str) -> f64 {
        self.values.get(state_key).copied().unwrap_or(0.0)
    }
    /// Moves the stored value for `state_key` toward `target` and returns the
    /// new value. A missing entry starts at 0.0.
    pub fn update(&mut self, state_key: &str, learning_rate: f64, target: f64) -> f64 {
        let value = self.values.entry(state_key.to_owned()).or_insert(0.0);
        *value += learning_rate * (target - *value);
        *value
    }
}

impl ModelFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Pickle => "pickle",
        }
    }
    /// File holding the model called `name`, e.g. `model[1000000].json`.
    pub fn model_path(self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("model[{}].{}", name, self.extension()))
    }
}

impl FromStr for ModelFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ModelFormat::Json),
            "pickle" => Ok(ModelFormat::Pickle),
            other => Err(format!("unknown model format '{other}' (expected 'json' or 'pickle')")),
        }
    }
}

pub fn value_table_to_disk(
    dir: &Path,
    name: &str,
    format: ModelFormat,
    table: &ValueTable,
) -> Result<PathBuf, GameError> {
    fs::create_dir_all(dir)?;
    let path = format.model_path(dir, name);
    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        ModelFormat::Json => serde_json::to_writer(&mut writer, table)?,
        ModelFormat::Pickle => {
            serde_pickle::to_writer(&mut writer, table, serde_pickle::SerOptions::new())?
        }
    }
    writer.flush()?;
    Ok(path)
}

pub fn value_table_from_disk(
    dir: &Path,
    name: &str,
    format: ModelFormat,
) -> Result<ValueTable, GameError> {
    let path = format.model_path(dir, name);
    let missing = |reason: String| GameError::MissingModel {
        path: path.clone(),
        reason,
    };
    let file = File::open(&path).map_err(|e| missing(e.to_string()))?;
    let reader = BufReader::new(file);
    match format {
        ModelFormat::Json => serde_json::from_reader(reader).map_err(|e| missing(e.to_string())),
        ModelFormat::Pickle => serde_pickle::from_reader(reader, serde_pickle::DeOptions::new())
            .map_err(|e| missing(e.to_string())),
    }
}
