use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Script validation failed: {message}")]
    ValidationError { message: String },
}

/// Root script container.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    /// State the machine starts in.
    pub initial_state: String,
    pub states: BTreeMap<String, StateConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

/// One transition rule. Exactly one of `literal` and `regex` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionConfig {
    /// Matches a line by equality.
    pub literal: Option<String>,
    /// Matches a line if the pattern is found anywhere in it.
    pub regex: Option<String>,
    /// State to move to; stay put when absent.
    pub to: Option<String>,
    /// Command to send to the child when the transition fires.
    pub send: Option<String>,
}

impl ScriptConfig {
    /// Loads and validates a script from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| ScriptError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ScriptConfig =
            toml::from_str(&content).map_err(|e| ScriptError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the script.
    ///
    /// Checks:
    /// - The initial state and every transition target exist
    /// - Each transition has exactly one matcher
    /// - Regex patterns compile
    /// - Commands, when present, are non-empty
    pub fn validate(&self) -> Result<(), ScriptError> {
        if !self.states.contains_key(&self.initial_state) {
            return Err(validation(format!(
                "initial state '{}' is not defined",
                self.initial_state
            )));
        }

        for (name, state) in &self.states {
            for transition in &state.transitions {
                match (&transition.literal, &transition.regex) {
                    (Some(_), Some(_)) | (None, None) => {
                        return Err(validation(format!(
                            "state '{name}': each transition needs exactly one of 'literal' or 'regex'"
                        )));
                    }
                    (None, Some(pattern)) => {
                        if let Err(err) = regex::Regex::new(pattern) {
                            return Err(validation(format!(
                                "state '{name}': invalid regex '{pattern}': {err}"
                            )));
                        }
                    }
                    (Some(_), None) => {}
                }

                if let Some(to) = &transition.to {
                    if !self.states.contains_key(to) {
                        return Err(validation(format!(
                            "state '{name}': transition target '{to}' is not defined"
                        )));
                    }
                }

                if let Some(send) = &transition.send {
                    if send.is_empty() {
                        return Err(validation(format!(
                            "state '{name}': transition command must not be empty"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn validation(message: String) -> ScriptError {
    ScriptError::ValidationError { message }
}
