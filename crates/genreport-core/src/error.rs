//! Error types for genreport-core

use thiserror::Error;

/// Result type alias for genreport-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in genreport-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Document is not well-formed XML
    #[error("failed to parse XML document: {message}")]
    XmlParse {
        /// Parser error description
        message: String,
    },

    /// Output document could not be serialized
    #[error("failed to write XML document: {message}")]
    XmlWrite {
        /// Writer error description
        message: String,
    },

    /// Reference document lacks a factor section
    #[error("reference data has no '{section}' section")]
    MissingReferenceSection {
        /// Section element name (`ValueFactor` or `EmissionsFactor`)
        section: String,
    },

    /// Factor entry whose text is not a number
    #[error("factor '{section}/{key}' has non-numeric value '{value}'")]
    MalformedFactorValue {
        /// Section element name
        section: String,
        /// Factor category key
        key: String,
        /// Raw text content
        value: String,
    },

    /// Factor category requested by the engine is not in the table
    #[error("no '{key}' entry in {table} factor table")]
    UnknownFactorKey {
        /// Which table was consulted
        table: String,
        /// Missing category key
        key: String,
    },

    /// Required child element is absent
    #[error("<{element}> is missing required <{field}>")]
    MissingField {
        /// Element that should contain the field
        element: String,
        /// Missing child element name
        field: String,
    },

    /// Numeric child element holds something other than a number
    #[error("<{field}> has non-numeric value '{value}'")]
    MalformedNumericField {
        /// Field element name
        field: String,
        /// Raw text content
        value: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
