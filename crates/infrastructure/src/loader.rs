//! Experiment definition loading
//!
//! Definitions are read from JSON, or from YAML when the file ends in
//! `.yaml` or `.yml`. Results are always written as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use domain::{DomainError, ExperimentDefinition, ExperimentResult};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading or writing experiment files
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File content is not valid YAML for the expected shape
    #[error("Failed to parse YAML {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Result could not be encoded as JSON
    #[error("Failed to serialize result for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Definition parsed but failed validation
    #[error("Invalid experiment in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Read `path` and decode it by extension
fn parse<T: DeserializeOwned>(path: &Path) -> Result<T, LoaderError> {
    let contents = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&contents).map_err(|source| LoaderError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&contents).map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read and validate an experiment definition
pub fn load_experiment(path: impl AsRef<Path>) -> Result<ExperimentDefinition, LoaderError> {
    let path = path.as_ref();
    let experiment: ExperimentDefinition = parse(path)?;

    experiment.validate().map_err(|source| LoaderError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        name = %experiment.name,
        faults = experiment.faults.len(),
        "Experiment loaded"
    );
    Ok(experiment)
}

/// Read a result previously written by [`save_result`]
pub fn load_result(path: impl AsRef<Path>) -> Result<ExperimentResult, LoaderError> {
    parse(path.as_ref())
}

/// Write a result as pretty-printed JSON
pub fn save_result(path: impl AsRef<Path>, result: &ExperimentResult) -> Result<(), LoaderError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(result).map_err(|source| LoaderError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::Utc;
    use domain::{ExperimentStatus, FaultKind};

    use super::*;

    fn file_with_suffix(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        file_with_suffix(".json", contents)
    }

    #[test]
    fn loads_minimal_definition_with_defaults() {
        let file = json_file(r#"{"name": "smoke"}"#);
        let experiment = load_experiment(file.path()).unwrap();

        assert_eq!(experiment.name, "smoke");
        assert!(experiment.id.is_empty());
        assert_eq!(experiment.duration_seconds, 60);
        assert!(experiment.faults.is_empty());
    }

    #[test]
    fn loads_faults_with_wire_names() {
        let file = json_file(
            r#"{
                "experiment_id": "exp-7",
                "name": "latency",
                "duration_seconds": 5,
                "target_components": ["search"],
                "faults": [
                    {"fault_type": "latency", "probability": 0.3, "duration_ms": 200},
                    {"fault_type": "error", "error_code": 503, "affected_components": ["db"]}
                ]
            }"#,
        );
        let experiment = load_experiment(file.path()).unwrap();

        assert_eq!(experiment.id, "exp-7");
        assert_eq!(experiment.faults[0].kind, FaultKind::Latency);
        assert_eq!(experiment.faults[0].duration_ms, Some(200));
        assert!((experiment.faults[1].probability - 1.0).abs() < f64::EPSILON);
        assert_eq!(experiment.components_for(&experiment.faults[1]), vec!["db"]);
    }

    #[test]
    fn loads_yaml_definition() {
        let file = file_with_suffix(
            ".yaml",
            "experiment_id: exp-yaml\n\
             name: yaml latency\n\
             duration_seconds: 3\n\
             target_components: [search]\n\
             faults:\n\
             \x20 - fault_type: latency\n\
             \x20   probability: 0.5\n\
             \x20   duration_ms: 100\n\
             \x20 - fault_type: resource_exhaustion\n\
             \x20   error_message: pool drained\n",
        );
        let experiment = load_experiment(file.path()).unwrap();

        assert_eq!(experiment.id, "exp-yaml");
        assert_eq!(experiment.name, "yaml latency");
        assert_eq!(experiment.duration_seconds, 3);
        assert_eq!(experiment.faults.len(), 2);
        assert_eq!(experiment.faults[0].duration_ms, Some(100));
        assert_eq!(experiment.faults[1].kind, FaultKind::ResourceExhaustion);
        assert_eq!(experiment.faults[1].message_or_default(), "pool drained");
        assert_eq!(experiment.components_for(&experiment.faults[0]), vec!["search"]);
    }

    #[test]
    fn yml_extension_is_yaml() {
        let file = file_with_suffix(".yml", "name: short\n");
        assert_eq!(load_experiment(file.path()).unwrap().name, "short");
    }

    #[test]
    fn malformed_yaml_is_yaml_parse_error() {
        let file = file_with_suffix(".yaml", "name: [unclosed\n");
        assert!(matches!(
            load_experiment(file.path()),
            Err(LoaderError::ParseYaml { .. })
        ));
    }

    #[test]
    fn invalid_yaml_definition_is_rejected() {
        let file = file_with_suffix(".yaml", "name: x\nduration_seconds: 0\n");
        let err = load_experiment(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Invalid { .. }));
        assert!(err.to_string().contains("duration_seconds"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_experiment(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let file = json_file("{ not json");
        assert!(matches!(
            load_experiment(file.path()),
            Err(LoaderError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_fault_type_is_parse_error() {
        let file = json_file(r#"{"name": "x", "faults": [{"fault_type": "meteor"}]}"#);
        assert!(matches!(
            load_experiment(file.path()),
            Err(LoaderError::Parse { .. })
        ));
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let file = json_file(
            r#"{"name": "x", "faults": [{"fault_type": "latency", "probability": 1.5, "duration_ms": 10}]}"#,
        );
        let err = load_experiment(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Invalid { .. }));
        assert!(err.to_string().contains("probability"));
    }

    #[test]
    fn result_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = ExperimentResult::running(ExperimentDefinition::new("saved"), Utc::now());

        save_result(&path, &result).unwrap();
        let loaded = load_result(&path).unwrap();

        assert_eq!(loaded.experiment.name, "saved");
        assert_eq!(loaded.status, ExperimentStatus::Running);
    }

    #[test]
    fn serialize_error_names_the_write() {
        let err = LoaderError::Serialize {
            path: PathBuf::from("result.json"),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };
        assert!(
            err.to_string()
                .starts_with("Failed to serialize result for result.json")
        );
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result.json");
        let result = ExperimentResult::running(ExperimentDefinition::new("lost"), Utc::now());

        assert!(matches!(
            save_result(&path, &result),
            Err(LoaderError::Io { .. })
        ));
    }
}
