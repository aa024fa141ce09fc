use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum OverlayError {
    #[error("Failed to parse {source_name}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(hcloverlay::parse)))]
    Parse {
        source_name: String,
        source: hcl_edit::parser::Error,
    },

    #[error("Attribute '{attribute}' in {source_name} is not a literal value: {reason}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(hcloverlay::evaluation),
            help("only literal values can overwrite existing attributes")
        )
    )]
    Evaluation {
        attribute: String,
        source_name: String,
        reason: String,
    },

    #[error("Failed to merge block {key}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(hcloverlay::merge)))]
    Merge {
        key: String,
        source: Box<OverlayError>,
    },

    #[error("Failed to render merged document: {0}")]
    Render(#[from] hcl::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file:\n{}", list(.0))]
    UnknownKeys(#[cfg_attr(feature = "rich-errors", related)] Vec<OverlayError>),

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Settings file {0} does not exist")]
    MissingConfigFile(PathBuf),
}

fn list(errors: &[OverlayError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl OverlayError {
    /// Wrap an error raised while merging the block identified by `key`.
    pub fn in_block(self, key: impl Into<String>) -> Self {
        OverlayError::Merge {
            key: key.into(),
            source: Box::new(self),
        }
    }
}
