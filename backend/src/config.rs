use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::inference::preprocess::INPUT_SIZE;
use crate::inference::provider::ModelSource;

const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub preprocessing: PreprocessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    /// Advisory upload limit, 200 MB unless overridden.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// URL (http, https, file) or local path of the TorchScript artifact.
    pub source: Option<String>,
    pub input_layout: InputLayout,
    /// Exit at startup instead of serving the UI with an error banner.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// `[1, H, W, C]`, the layout the network was trained with.
    #[default]
    Nhwc,
    Nchw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Must equal the network input side, 256.
    pub size: u32,
    pub resize_method: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let frontend_dir = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => PathBuf::from(format!("{}/../frontend/dist", manifest_dir)),
            Err(_) => PathBuf::from("/usr/src/app/frontend/dist"),
        };
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            frontend_dir,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            size: INPUT_SIZE,
            resize_method: "catmullrom".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file at `$APP_CONFIG` (or `config/app.yaml` if it
    /// exists), then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("APP_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Overlays environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = limit.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAX_UPLOAD_BYTES",
                value: limit,
            })?;
        }
        if let Some(source) = lookup("MODEL_URL") {
            self.model.source = Some(source);
        }
        if let Some(layout) = lookup("MODEL_INPUT_LAYOUT") {
            self.model.input_layout = match layout.to_ascii_lowercase().as_str() {
                "nhwc" => InputLayout::Nhwc,
                "nchw" => InputLayout::Nchw,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MODEL_INPUT_LAYOUT",
                        value: layout,
                    });
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preprocessing.size != INPUT_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "preprocessing.size",
                value: self.preprocessing.size.to_string(),
            });
        }
        self.preprocessing.filter()?;
        self.model_source()?;
        Ok(())
    }

    pub fn model_source(&self) -> Result<Option<ModelSource>, ConfigError> {
        self.model
            .source
            .as_deref()
            .map(|raw| {
                ModelSource::parse(raw).map_err(|_| ConfigError::InvalidValue {
                    key: "model.source",
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl PreprocessingConfig {
    pub fn filter(&self) -> Result<FilterType, ConfigError> {
        match self.resize_method.to_ascii_lowercase().as_str() {
            "nearest" => Ok(FilterType::Nearest),
            "triangle" | "bilinear" => Ok(FilterType::Triangle),
            "catmullrom" | "bicubic" => Ok(FilterType::CatmullRom),
            "gaussian" => Ok(FilterType::Gaussian),
            "lanczos3" => Ok(FilterType::Lanczos3),
            _ => Err(ConfigError::InvalidValue {
                key: "preprocessing.resize_method",
                value: self.resize_method.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_network_input() {
        let config = AppConfig::default();
        assert_eq!(config.preprocessing.size, 256);
        assert_eq!(config.server.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.model.input_layout, InputLayout::Nhwc);
        assert!(config.model.source.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let config = AppConfig::from_yaml(
            "server:\n  port: 9000\nmodel:\n  source: https://models.example.org/glaucoma.pt\n  input_layout: nchw\n",
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.input_layout, InputLayout::Nchw);
        assert_eq!(config.preprocessing.resize_method, "catmullrom");
        assert!(matches!(
            config.model_source().unwrap(),
            Some(ModelSource::Remote(_))
        ));
    }

    #[test]
    fn reads_yaml_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preprocessing:\n  resize_method: lanczos3").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.preprocessing.filter().unwrap(), FilterType::Lanczos3);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::from_yaml("server:\n  port: 9000\n").unwrap();
        config
            .apply_env(env(&[
                ("PORT", "7000"),
                ("MODEL_URL", "/srv/models/glaucoma.pt"),
                ("MODEL_INPUT_LAYOUT", "NCHW"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.model.input_layout, InputLayout::Nchw);
        assert!(matches!(
            config.model_source().unwrap(),
            Some(ModelSource::Local(_))
        ));
        assert_eq!(config.bind_address(), "0.0.0.0:7000");
    }

    #[rstest]
    #[case("PORT", "eighty")]
    #[case("MAX_UPLOAD_BYTES", "-1")]
    #[case("MODEL_INPUT_LAYOUT", "chw")]
    fn bad_environment_values_are_rejected(#[case] key: &str, #[case] value: &str) {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[(key, value)])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[rstest]
    #[case("nearest", FilterType::Nearest)]
    #[case("Bilinear", FilterType::Triangle)]
    #[case("bicubic", FilterType::CatmullRom)]
    #[case("gaussian", FilterType::Gaussian)]
    fn resize_method_names(#[case] name: &str, #[case] expected: FilterType) {
        let cfg = PreprocessingConfig {
            resize_method: name.to_string(),
            ..PreprocessingConfig::default()
        };
        assert_eq!(cfg.filter().unwrap(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(128)]
    #[case(512)]
    fn tensor_side_other_than_256_fails_validation(#[case] size: u32) {
        let config = AppConfig::from_yaml(&format!("preprocessing:\n  size: {size}\n")).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "preprocessing.size", .. }
        ));
    }

    #[test]
    fn unknown_resize_method_fails_validation() {
        let mut config = AppConfig::default();
        config.preprocessing.resize_method = "sinc".to_string();
        assert!(config.validate().is_err());
    }
}
