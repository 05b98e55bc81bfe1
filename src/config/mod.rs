//! Configuration types for the report run.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config declares no files")]
    EmptyFileList,

    #[error("file not declared in config: {0}")]
    UnknownFile(String),
}

/// Grid declaration for one measurement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// File name, relative to the data directory
    pub file: String,

    /// Number of distinct measurements recorded per go
    pub measurements_per_go: NonZeroUsize,

    /// Number of passes recorded in the file
    pub number_of_passes: NonZeroUsize,

    /// Free-text annotation printed with the report
    #[serde(default)]
    pub meta: String,
}

impl GridSpec {
    pub fn new(
        file: impl Into<String>,
        measurements_per_go: NonZeroUsize,
        number_of_passes: NonZeroUsize,
        meta: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            measurements_per_go,
            number_of_passes,
            meta: meta.into(),
        }
    }

    /// Number of slots one row of the grid spans.
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.measurements_per_go.get() * self.number_of_passes.get()
    }

    /// Resolve the file against a data directory.
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_files() -> Vec<GridSpec> {
    vec![GridSpec::new(
        "009.csv",
        NonZeroUsize::new(3).expect("non-zero literal"),
        NonZeroUsize::MIN,
        "C: 2,1 and CD top",
    )]
}

/// Ordered list of files to report, plus where to find them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the file names are resolved against
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Files in report order
    #[serde(default = "default_files")]
    pub files: Vec<GridSpec>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            files: default_files(),
        }
    }
}

impl ReportConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = serde_yaml::from_str(content)?;
        if config.files.is_empty() {
            return Err(ConfigError::EmptyFileList);
        }
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Restrict the run to the named files, keeping declaration order.
    pub fn select(&self, names: &[String]) -> Result<Self, ConfigError> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.files.iter().any(|spec| &spec.file == *name))
        {
            return Err(ConfigError::UnknownFile(unknown.clone()));
        }

        let files = self
            .files
            .iter()
            .filter(|spec| names.contains(&spec.file))
            .cloned()
            .collect();

        Ok(Self {
            data_dir: self.data_dir.clone(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.files.len(), 1);
        assert_eq!(config.files[0].file, "009.csv");
        assert_eq!(config.files[0].measurements_per_go, nz(3));
        assert_eq!(config.files[0].number_of_passes, nz(1));
        assert_eq!(config.files[0].meta, "C: 2,1 and CD top");
    }

    #[test]
    fn test_parse_yaml_keeps_order() {
        let yaml = r#"
data_dir: surveys
files:
  - file: 009.csv
    measurements_per_go: 3
    number_of_passes: 1
    meta: "C: 2,1 and CD top"
  - file: 001.csv
    measurements_per_go: 2
    number_of_passes: 2
"#;
        let config = ReportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("surveys"));
        let names: Vec<&str> = config.files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(names, vec!["009.csv", "001.csv"]);
        assert_eq!(config.files[1].meta, "");
        assert_eq!(config.files[1].total_slots(), 4);
    }

    #[test]
    fn test_zero_grid_is_rejected() {
        let yaml = "files:\n  - file: a.csv\n    measurements_per_go: 0\n    number_of_passes: 1\n";
        assert!(matches!(
            ReportConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_empty_file_list_is_rejected() {
        assert!(matches!(
            ReportConfig::from_yaml_str("files: []\n"),
            Err(ConfigError::EmptyFileList)
        ));
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.yaml");

        let config = ReportConfig::default();
        config.to_yaml(&path).unwrap();
        assert_eq!(ReportConfig::from_yaml(&path).unwrap(), config);
    }

    #[test]
    fn test_select_keeps_declaration_order() {
        let config = ReportConfig {
            data_dir: PathBuf::from("data"),
            files: vec![
                GridSpec::new("b.csv", nz(1), nz(1), ""),
                GridSpec::new("a.csv", nz(1), nz(1), ""),
                GridSpec::new("c.csv", nz(1), nz(1), ""),
            ],
        };

        let selected = config
            .select(&["a.csv".to_string(), "b.csv".to_string()])
            .unwrap();
        let names: Vec<&str> = selected.files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(names, vec!["b.csv", "a.csv"]);

        assert!(matches!(
            config.select(&["z.csv".to_string()]),
            Err(ConfigError::UnknownFile(name)) if name == "z.csv"
        ));
    }

    #[test]
    fn test_path_in() {
        let spec = GridSpec::new("009.csv", nz(3), nz(1), "");
        assert_eq!(spec.path_in(Path::new("data")), PathBuf::from("data/009.csv"));
    }
}
