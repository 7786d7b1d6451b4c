//! Pipeline configuration from YAML

use crate::core::Pipeline;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stage key that turns its mapping into a concurrent group
pub const CONCURRENT_KEY: &str = "concurrent";

/// Key holding the run-level options inside `pipeline`
pub const CONFIG_KEY: &str = "config";

/// Name used when a pipeline is not loaded from a file
pub const DEFAULT_PIPELINE_NAME: &str = "workflow";

/// Errors raised while loading a pipeline spec. All of them are fatal and
/// surface before any job runs.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing top-level `pipeline` key")]
    MissingPipeline,

    #[error("`{0}` must be a mapping")]
    NotAMapping(String),

    #[error("Stage names must be scalars, got {0}")]
    InvalidKey(String),

    #[error("Invalid `config` section: {0}")]
    InvalidConfig(#[source] serde_yaml::Error),

    #[error("Job '{0}' is missing the required `run` key")]
    MissingRun(String),

    #[error("Job '{name}' is invalid: {source}")]
    InvalidJob {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Job '{0}' has an empty `run` command")]
    EmptyCommand(String),

    #[error("Job '{0}' must have a timeout of at least one second")]
    InvalidTimeout(String),

    #[error("A concurrent group must contain at least one job")]
    EmptyGroup,
}

/// Run-level options from the `config` section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    /// Echo captured stdout/stderr as each job finishes
    #[serde(default, deserialize_with = "null_as_false")]
    pub verbose: bool,

    /// Stop launching new stages after the first failure
    #[serde(default, deserialize_with = "null_as_false")]
    pub fail_fast: bool,
}

/// An option given without a value (`verbose:`) is off
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Job configuration as defined in YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Shell command, executed verbatim
    pub run: String,

    /// Working directory
    #[serde(default = "default_context")]
    pub context: PathBuf,

    /// Kill the command after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

/// A job spec together with the key it was declared under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedJob {
    pub name: String,

    #[serde(flatten)]
    pub spec: JobConfig,
}

/// One entry of the pipeline's stage sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageConfig {
    Job(NamedJob),
    Concurrent { jobs: Vec<NamedJob> },
}

/// Parsed pipeline spec, stages in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub name: String,
    pub config: RunConfig,
    pub stages: Vec<StageConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PIPELINE_NAME.to_string(),
            config: RunConfig::default(),
            stages: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file, named after the file stem
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            config.name = stem.to_string();
        }
        Ok(config)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SpecError> {
        let document: Value = serde_yaml::from_str(yaml)?;
        let config = Self::from_document(&document)?;
        config.validate()?;
        Ok(config)
    }

    fn from_document(document: &Value) -> Result<Self, SpecError> {
        let pipeline = document
            .as_mapping()
            .and_then(|root| root.get("pipeline"))
            .ok_or(SpecError::MissingPipeline)?;

        let mut config = PipelineConfig::default();

        let body = match pipeline {
            // `pipeline:` with nothing under it runs nothing
            Value::Null => return Ok(config),
            Value::Mapping(body) => body,
            _ => return Err(SpecError::NotAMapping("pipeline".to_string())),
        };

        for (key, value) in body {
            let key = stage_name(key)?;

            match key.as_str() {
                CONFIG_KEY => {
                    if !value.is_null() {
                        config.config = serde_yaml::from_value(value.clone())
                            .map_err(SpecError::InvalidConfig)?;
                    }
                }
                CONCURRENT_KEY => {
                    let members = match value {
                        Value::Null => Mapping::new(),
                        Value::Mapping(members) => members.clone(),
                        _ => return Err(SpecError::NotAMapping(CONCURRENT_KEY.to_string())),
                    };
                    let jobs = members
                        .iter()
                        .map(|(name, spec)| parse_job(&stage_name(name)?, spec))
                        .collect::<Result<Vec<_>, _>>()?;
                    config.stages.push(StageConfig::Concurrent { jobs });
                }
                name => config.stages.push(StageConfig::Job(parse_job(name, value)?)),
            }
        }

        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<(), SpecError> {
        for stage in &self.stages {
            match stage {
                StageConfig::Job(job) => validate_job(job)?,
                StageConfig::Concurrent { jobs } => {
                    if jobs.is_empty() {
                        return Err(SpecError::EmptyGroup);
                    }
                    for job in jobs {
                        validate_job(job)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Total number of jobs, counting group members individually
    pub fn job_count(&self) -> usize {
        self.stages
            .iter()
            .map(|stage| match stage {
                StageConfig::Job(_) => 1,
                StageConfig::Concurrent { jobs } => jobs.len(),
            })
            .sum()
    }

    /// Convert config to a Pipeline domain model
    pub fn to_pipeline(&self) -> Pipeline {
        Pipeline::from_config(self)
    }
}

fn parse_job(name: &str, spec: &Value) -> Result<NamedJob, SpecError> {
    let mapping = spec
        .as_mapping()
        .ok_or_else(|| SpecError::NotAMapping(name.to_string()))?;
    if mapping.get("run").is_none() {
        return Err(SpecError::MissingRun(name.to_string()));
    }

    let spec: JobConfig =
        serde_yaml::from_value(spec.clone()).map_err(|source| SpecError::InvalidJob {
            name: name.to_string(),
            source,
        })?;

    Ok(NamedJob {
        name: name.to_string(),
        spec,
    })
}

fn validate_job(job: &NamedJob) -> Result<(), SpecError> {
    if job.spec.run.trim().is_empty() {
        return Err(SpecError::EmptyCommand(job.name.clone()));
    }
    if job.spec.timeout == Some(0) {
        return Err(SpecError::InvalidTimeout(job.name.clone()));
    }
    Ok(())
}

/// Name a stage after its key; numbers and booleans are used in their
/// written form
fn stage_name(key: &Value) -> Result<String, SpecError> {
    match key {
        Value::String(name) => Ok(name.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(SpecError::InvalidKey(describe_value(other))),
    }
}

fn describe_value(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}
