//! Data file loading.

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use explorer_lib::error::RegistryError;
use explorer_lib::error::SourceError;
use explorer_lib::model::DynRecord;
use explorer_lib::registry::FieldDescriptor;
use explorer_lib::registry::FieldOption;
use explorer_lib::registry::FieldRegistry;
use explorer_lib::source::DataSource;
use serde::Deserialize;

/// The contents of a data file.
#[derive(Debug, Deserialize)]
pub struct DataFile {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub records: Vec<DynRecord>,
}

impl DataFile {
    pub fn parse(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the field registry declared by the file.
    pub fn registry(&self) -> Result<FieldRegistry<DynRecord>, RegistryError> {
        FieldRegistry::new(self.fields.iter().map(FieldSpec::descriptor))
    }
}

/// A field declaration.
#[derive(Debug, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<OptionSpec>>,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub default_visible: bool,
    #[serde(default)]
    pub feature: Option<String>,
}

/// An option, either a bare value or `{ "value": .., "label": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    Value(String),
    Labeled(FieldOption),
}

fn default_true() -> bool {
    true
}

impl FieldSpec {
    fn descriptor(&self) -> FieldDescriptor<DynRecord> {
        let label = self.label.clone().unwrap_or_else(|| self.key.clone());
        let mut field = FieldDescriptor::field(self.key.clone(), label);
        if let Some(options) = &self.options {
            field = field.with_options(options.iter().map(|o| match o {
                OptionSpec::Value(v) => FieldOption::from(v.as_str()),
                OptionSpec::Labeled(option) => option.clone(),
            }));
        }
        if !self.sortable {
            field = field.not_sortable();
        }
        if !self.default_visible {
            field = field.hidden();
        }
        if let Some(feature) = &self.feature {
            field = field.with_feature(feature.clone());
        }
        field
    }
}

/// Re-reads the records of a data file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads and parses the whole file.
    pub async fn load(&self) -> Result<DataFile, SourceError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        DataFile::parse(&json)
    }
}

#[async_trait]
impl DataSource<DynRecord> for JsonFileSource {
    async fn fetch_collection(&self) -> Result<Vec<DynRecord>, SourceError> {
        Ok(self.load().await?.records)
    }
}
