//! Error types for the package configuration wizard
//!
//! The wizard itself is closed-world: almost nothing a visitor can do is an
//! error. These types cover the load-time checks (catalog, labels, config)
//! and the few caller mistakes the engine refuses.

use thiserror::Error;

use crate::language::Language;
use crate::state::WizardState;

/// Errors raised while driving a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("'{id}' is not a valid option in state {state}")]
    UnknownOption { state: WizardState, id: String },

    #[error("state {0} does not take a selection")]
    NotSelectable(WizardState),

    #[error("state {0} does not take free text")]
    NotFreeText(WizardState),

    #[error("no quote available in state {0}")]
    NoQuote(WizardState),
}

/// Catalog integrity errors, raised when a catalog is built or loaded
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog has no packages")]
    Empty,

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("package '{0}' declares no room options")]
    NoRooms(String),

    #[error("package '{0}' declares no hotel options")]
    NoHotels(String),

    #[error("hotel '{hotel}' in package '{package}' has no price for room '{room}'")]
    MissingPrice {
        package: String,
        hotel: String,
        room: String,
    },

    #[error("hotel '{hotel}' in package '{package}' prices unknown room '{room}'")]
    UnknownPricedRoom {
        package: String,
        hotel: String,
        room: String,
    },

    #[error("catalog has no transport options")]
    NoTransport,

    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Translation table errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("unknown language tag '{0}'")]
    UnknownLanguage(String),

    #[error("label '{key}' has no {language} translation")]
    MissingTranslation { key: String, language: Language },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
