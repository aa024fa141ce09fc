use std::marker::PhantomData;
use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OverlayError;
use crate::file;
use crate::ops::{self, ConfigResult};
use crate::overrides;
use crate::resolve::{self, ResolveInput};
use crate::types::{ConfigAction, SearchPath};

/// Builder for loading layered settings.
///
/// Layers, lowest priority first: compiled defaults, `{app_name}.toml` in the
/// platform config directory and then the working directory, an explicit
/// settings file, `{APP_NAME}__*` environment variables, CLI overrides.
pub struct SettingsBuilder<C: Config> {
    app_name: String,
    file_name: String,
    search_paths: Vec<SearchPath>,
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    cli_overrides: Vec<(String, toml::Value)>,
    _phantom: PhantomData<C>,
}

impl<C: Config> SettingsBuilder<C> {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            file_name: format!("{app_name}.toml"),
            search_paths: vec![SearchPath::Platform, SearchPath::Cwd],
            config_file: None,
            env_prefix: Some(app_name.to_uppercase()),
            cli_overrides: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// A settings file layered above everything found on the search paths.
    /// Unlike discovered files, it must exist.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Add a CLI override. `None` values are ignored (useful for optional clap args).
    pub fn cli_override<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    fn build_input(&self) -> Result<ResolveInput, OverlayError> {
        let valid = overrides::valid_keys(&C::META);
        if let Some((key, _)) = self.cli_overrides.iter().find(|(k, _)| !valid.contains(k)) {
            return Err(OverlayError::InvalidValue {
                key: key.clone(),
                reason: "not a settings key".into(),
            });
        }

        let mut files =
            file::load_settings_files(&self.search_paths, &self.file_name, &self.app_name)?;
        if let Some(path) = &self.config_file {
            files.push(file::load_explicit_file(path)?);
        }
        debug!(files = files.len(), "settings files found");

        Ok(ResolveInput {
            files,
            env_vars: std::env::vars().collect(),
            env_prefix: self.env_prefix.clone(),
            cli_overrides: self.cli_overrides.clone(),
        })
    }

    /// Load and resolve the settings through all layers.
    pub fn load(self) -> Result<C, OverlayError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        let input = self.build_input()?;
        resolve::resolve(input)
    }

    /// Handle a `ConfigAction` (list / gen).
    pub fn handle(self, action: &ConfigAction) -> Result<ConfigResult, OverlayError>
    where
        C: Serialize,
        C::Layer: for<'de> Deserialize<'de>,
    {
        match action {
            ConfigAction::List => {
                let settings = self.load()?;
                ops::list_values(&settings)
            }
            ConfigAction::Gen { output } => {
                let template = ops::generate_template::<C>();
                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent()
                            && !parent.as_os_str().is_empty()
                        {
                            std::fs::create_dir_all(parent).map_err(|e| OverlayError::Io {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        std::fs::write(path, &template).map_err(|e| OverlayError::Io {
                            path: path.clone(),
                            source: e,
                        })?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::OverlaySettings;
    use crate::types::{BlockOrder, OutputStyle};
    use std::fs;
    use tempfile::TempDir;

    fn builder() -> SettingsBuilder<OverlaySettings> {
        SettingsBuilder::new("hcloverlay")
    }

    /// A builder reading only `dir`, with no env layer.
    fn isolated(dir: &TempDir) -> SettingsBuilder<OverlaySettings> {
        let mut b = builder();
        b.search_paths = vec![SearchPath::Path(dir.path().to_path_buf())];
        b.env_prefix = None;
        b
    }

    #[test]
    fn app_name_sets_defaults() {
        let b = builder();
        assert_eq!(b.file_name, "hcloverlay.toml");
        assert_eq!(b.env_prefix, Some("HCLOVERLAY".to_string()));
        assert_eq!(b.search_paths, vec![SearchPath::Platform, SearchPath::Cwd]);
    }

    #[test]
    fn cli_override_none_skipped() {
        let b = builder()
            .cli_override("base", Some("a.hcl"))
            .cli_override::<String>("overlay", None);
        assert_eq!(b.cli_overrides.len(), 1);
    }

    #[test]
    fn load_defaults_only() {
        let dir = TempDir::new().unwrap();
        let settings = isolated(&dir).load().unwrap();
        assert_eq!(settings, OverlaySettings::builder().load().unwrap());
    }

    #[test]
    fn load_with_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("hcloverlay.toml"),
            "base = \"main.hcl\"\n[merge]\norder = \"sorted\"\n",
        )
        .unwrap();
        let settings = isolated(&dir).load().unwrap();
        assert_eq!(settings.base, PathBuf::from("main.hcl"));
        assert_eq!(settings.merge.order, BlockOrder::Sorted);
    }

    #[test]
    fn explicit_file_beats_search_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hcloverlay.toml"), "base = \"found.hcl\"\n").unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "base = \"explicit.hcl\"\n").unwrap();

        let settings = isolated(&dir).config_file(Some(explicit)).load().unwrap();
        assert_eq!(settings.base, PathBuf::from("explicit.hcl"));
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let result = isolated(&dir)
            .config_file(Some(dir.path().join("missing.toml")))
            .load();
        assert!(matches!(result, Err(OverlayError::MissingConfigFile(_))));
    }

    #[test]
    fn load_with_cli_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hcloverlay.toml"), "[output]\nstyle = \"preserve\"\n").unwrap();
        let settings = isolated(&dir)
            .cli_override("output.style", Some("canonical"))
            .load()
            .unwrap();
        assert_eq!(settings.output.style, OutputStyle::Canonical);
    }

    #[test]
    fn unknown_cli_override_rejected() {
        let dir = TempDir::new().unwrap();
        let result = isolated(&dir).cli_override("output.color", Some("red")).load();
        assert!(matches!(
            result,
            Err(OverlayError::InvalidValue { ref key, .. }) if key == "output.color"
        ));
    }

    #[test]
    fn unknown_key_in_settings_file_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hcloverlay.toml"), "typo = 1\n").unwrap();
        let result = isolated(&dir).load();
        assert!(matches!(result, Err(OverlayError::UnknownKeys(_))));
    }

    #[test]
    fn handle_gen() {
        let dir = TempDir::new().unwrap();
        let result = isolated(&dir)
            .handle(&ConfigAction::Gen { output: None })
            .unwrap();
        match result {
            ConfigResult::Template(t) => assert!(t.contains("overlay")),
            other => panic!("Expected Template, got {other:?}"),
        }
    }

    #[test]
    fn handle_gen_with_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("hcloverlay.toml");
        let result = isolated(&dir)
            .handle(&ConfigAction::Gen {
                output: Some(out.clone()),
            })
            .unwrap();
        assert_eq!(result, ConfigResult::TemplateWritten { path: out.clone() });
        assert!(fs::read_to_string(&out).unwrap().contains("[merge]"));
    }

    #[test]
    fn handle_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hcloverlay.toml"), "overlay = \"prod.hcl\"\n").unwrap();
        let result = isolated(&dir).handle(&ConfigAction::List).unwrap();
        match result {
            ConfigResult::Listing { entries } => {
                let overlay = entries.iter().find(|(k, _)| k == "overlay").unwrap();
                assert_eq!(overlay.1, "prod.hcl");
            }
            other => panic!("Expected Listing, got {other:?}"),
        }
    }
}
