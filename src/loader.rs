//! This module provides the `Loader` struct, responsible for reading trace files and JSON
//! machine definitions from files and strings.

use crate::programs::Definition;
use crate::types::AutomatonError;
use std::fs;
use std::path::Path;

/// `Loader` is a utility struct for loading traces and machine definitions.
///
/// Trace files hold one trace per line. Raw traces are kept as text for the lexer; tokenized
/// traces are lines of whitespace separated tokens, as produced by the lexer.
pub struct Loader;

impl Loader {
    /// Loads raw traces from the specified file, one per line, without line terminators.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` with one entry per line.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    pub fn load_traces(path: &Path) -> Result<Vec<String>, AutomatonError> {
        Ok(Self::read(path)?.lines().map(str::to_string).collect())
    }

    /// Loads tokenized traces from the specified file, one per line.
    pub fn load_tokenized_traces(path: &Path) -> Result<Vec<Vec<String>>, AutomatonError> {
        Ok(Self::parse_tokenized(&Self::read(path)?))
    }

    /// Splits every line of `content` on whitespace.
    pub fn parse_tokenized(content: &str) -> Vec<Vec<String>> {
        content
            .lines()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    /// Loads a machine definition from the specified JSON file.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is read and parsed.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::ParseError)` if the content is not a valid definition.
    pub fn load_definition(path: &Path) -> Result<Definition, AutomatonError> {
        Self::load_definition_from_string(&Self::read(path)?)
    }

    /// Parses a machine definition from JSON text, e.g. `{"kind": "fa", ...}`.
    pub fn load_definition_from_string(content: &str) -> Result<Definition, AutomatonError> {
        serde_json::from_str(content).map_err(|e| AutomatonError::ParseError(e.to_string()))
    }

    fn read(path: &Path) -> Result<String, AutomatonError> {
        fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }
}
