use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::AnalyzerConfig;
use crate::error::ConfigError;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix of environment overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "HYBRID_ANALYZER_";

/// Config file looked up in the working directory when `--config` is absent
pub const CONFIG_BASENAME: &str = "hybrid-analyzer";

/// Serialization format of a config file or of `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format of a config file, from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Command-line values layered over every other source; `None` leaves a key alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub run: RunOverrides,
    pub discovery: DiscoveryOverrides,
    pub pipeline: PipelineOverrides,
    pub distributed: DistributedOverrides,
    pub output: OutputOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributedOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl AnalyzerConfig {
    /// Load, merge and validate every configuration layer
    ///
    /// Priority, lowest first: embedded defaults, the config file (`custom`,
    /// or `hybrid-analyzer.{toml,json,yaml,yml}` in the working directory),
    /// `HYBRID_ANALYZER_` environment variables, `overrides`.
    pub fn load(
        custom: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let figment = Self::figment(custom, overrides)?;
        let config: AnalyzerConfig = figment.extract()?;
        config.validate()?;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// The merged provider chain, before extraction
    pub fn figment(
        custom: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Figment, ConfigError> {
        tracing::trace!("CONFIG LOAD: Starting");
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // An explicit config file replaces the working-directory lookup
        if let Some(path) = custom {
            if !path.is_file() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            figment = match ConfigFormat::from_path(path) {
                Some(ConfigFormat::Toml) => figment.merge(Toml::file(path)),
                Some(ConfigFormat::Json) => figment.merge(Json::file(path)),
                Some(ConfigFormat::Yaml) => figment.merge(Yaml::file(path)),
                None => {
                    return Err(ConfigError::Invalid(format!(
                        "unsupported config file format: {}",
                        path.display()
                    )));
                }
            };
        } else {
            figment = figment
                .merge(Toml::file(format!("{CONFIG_BASENAME}.toml")))
                .merge(Json::file(format!("{CONFIG_BASENAME}.json")))
                .merge(Yaml::file(format!("{CONFIG_BASENAME}.yaml")))
                .merge(Yaml::file(format!("{CONFIG_BASENAME}.yml")));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(figment)
    }

    /// Render the configuration in `format`
    pub fn export(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let rendered = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yml::to_string(self).map_err(|e| e.to_string()),
        };
        rendered.map_err(|e| ConfigError::Invalid(format!("failed to render configuration: {e}")))
    }

    /// Parse a standalone config document, without the other layers
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(AnalyzerConfig::default()));
        let figment = match format {
            ConfigFormat::Toml => figment.merge(Toml::string(content)),
            ConfigFormat::Json => figment.merge(Json::string(content)),
            ConfigFormat::Yaml => figment.merge(Yaml::string(content)),
        };
        let config: AnalyzerConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        Jail::expect_with(|_jail| {
            let config = AnalyzerConfig::load(None, None).unwrap();
            assert_eq!(config, AnalyzerConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_working_directory_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "hybrid-analyzer.toml",
                r#"
                [run]
                source_directory = "corpus"
                top_k = 5

                [pipeline]
                io_workers = 8
                "#,
            )?;
            jail.set_env("HYBRID_ANALYZER_PIPELINE__IO_WORKERS", "3");
            jail.set_env("HYBRID_ANALYZER_DISTRIBUTED__RANKS", "6");

            let config = AnalyzerConfig::load(None, None).unwrap();

            assert_eq!(config.run.source_directory, PathBuf::from("corpus"));
            assert_eq!(config.run.top_k, 5);
            assert_eq!(config.pipeline.io_workers, 3);
            assert_eq!(config.distributed.ranks, 6);
            assert_eq!(config.discovery.extension, "txt");
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides_win() {
        Jail::expect_with(|jail| {
            jail.set_env("HYBRID_ANALYZER_RUN__TOP_K", "7");
            let mut overrides = ConfigOverrides::default();
            overrides.run.top_k = Some(3);
            overrides.pipeline.cpu_workers = Some(5);

            let config = AnalyzerConfig::load(None, Some(&overrides)).unwrap();

            assert_eq!(config.run.top_k, 3);
            assert_eq!(config.pipeline.cpu_workers, Some(5));
            // untouched keys keep their lower-layer values
            assert_eq!(config.pipeline.io_workers, 16);
            Ok(())
        });
    }

    #[test]
    fn test_custom_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yml", "discovery:\n  extension: md\n")?;
            jail.create_file("hybrid-analyzer.toml", "[discovery]\nextension = \"log\"\n")?;

            let config = AnalyzerConfig::load(Some(Path::new("custom.yml")), None).unwrap();

            // the working-directory file is not consulted
            assert_eq!(config.discovery.extension, "md");
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_file() {
        Jail::expect_with(|_jail| {
            let err = AnalyzerConfig::load(Some(Path::new("nope.toml")), None).unwrap_err();
            assert!(matches!(err, ConfigError::Missing(_)));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected_after_merge() {
        Jail::expect_with(|jail| {
            jail.set_env("HYBRID_ANALYZER_DISTRIBUTED__RANKS", "0");
            let err = AnalyzerConfig::load(None, None).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)));
            Ok(())
        });
    }

    #[test]
    fn test_export_formats() {
        let config = AnalyzerConfig::default();

        let toml = config.export(ConfigFormat::Toml).unwrap();
        assert!(toml.contains("[pipeline]"));
        assert_eq!(AnalyzerConfig::parse(&toml, ConfigFormat::Toml).unwrap(), config);

        let json = config.export(ConfigFormat::Json).unwrap();
        assert_eq!(AnalyzerConfig::parse(&json, ConfigFormat::Json).unwrap(), config);

        let yaml = config.export(ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("io_workers: 16"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.ini")), None);
    }
}
