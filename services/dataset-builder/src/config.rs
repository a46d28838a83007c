//! Run configuration for the `generate` command.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional YAML run file, then command-line flags and environment.
//!
//! ```yaml
//! count: 500
//! start_index: 1000
//! bounds: { min_lon: -100.0, min_lat: 38.0, max_lon: -95.0, max_lat: 42.0 }
//! seed: 42
//! earth_engine:
//!   project: my-project
//! optical:
//!   collection_id: COPERNICUS/S2
//!   start: 2019-01-01
//!   end: 2019-06-30
//!   bands: [B4, B3, B2]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dataset::GeneratorConfig;
use dataset_common::BoundingBox;
use earth_engine::{
    ClientConfig, CollectionQuery, EarthEngineClient, RefreshToken, StaticToken, TokenProvider,
};
use serde::Deserialize;
use tracing::info;

/// Earth Engine connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EarthEngineSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_project")]
    pub project: String,
    /// Fixed OAuth2 access token; expires after about an hour
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh credentials JSON (`client_id`, `client_secret`,
    /// `refresh_token`); takes precedence over `access_token`
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    earth_engine::client::DEFAULT_API_URL.to_string()
}

fn default_project() -> String {
    "earthengine-legacy".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Default for EarthEngineSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            project: default_project(),
            access_token: None,
            credentials_file: None,
            timeout_secs: default_timeout_secs(),
            temp_dir: None,
        }
    }
}

impl EarthEngineSection {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            project: self.project.clone(),
            access_token: self.access_token.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            temp_dir: self.temp_dir.clone(),
            ..Default::default()
        }
    }

    /// Token source for the client: refreshing credentials when a
    /// credentials file is set, otherwise the fixed token.
    pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
        match &self.credentials_file {
            Some(path) => {
                let tokens = RefreshToken::from_file(path).with_context(|| {
                    format!("Failed to load credentials: {}", path.display())
                })?;
                Ok(Arc::new(tokens))
            }
            None => Ok(Arc::new(StaticToken(self.access_token.clone()))),
        }
    }

    pub fn client(&self) -> Result<EarthEngineClient> {
        EarthEngineClient::with_token_provider(self.client_config(), self.token_provider()?)
            .context("Failed to create Earth Engine client")
    }
}

/// Everything a generation run needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub earth_engine: EarthEngineSection,
    /// Replaces the Sentinel-2 true color query
    #[serde(default)]
    pub optical: Option<CollectionQuery>,
    /// Replaces the CDL cultivation query
    #[serde(default)]
    pub cultivation: Option<CollectionQuery>,
}

/// Command-line values layered over the run file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub count: Option<u64>,
    pub start_index: Option<u64>,
    pub bounds: Option<BoundingBox>,
    pub square_size_km: Option<f64>,
    pub scale: Option<f64>,
    pub crop_size: Option<u32>,
    pub no_crop: bool,
    pub output_root: Option<PathBuf>,
    pub seed: Option<u64>,
    pub api_url: Option<String>,
    pub project: Option<String>,
    pub access_token: Option<String>,
    pub credentials_file: Option<PathBuf>,
}

impl RunConfig {
    /// Parse a YAML run file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run file: {}", path.display()))?;
        let config: RunConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse run file: {}", path.display()))?;
        info!(path = %path.display(), "Loaded run file");
        Ok(config)
    }

    /// Defaults, or the run file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        let generator = &mut self.generator;
        if let Some(count) = overrides.count {
            generator.count = count;
        }
        if let Some(start_index) = overrides.start_index {
            generator.start_index = start_index;
        }
        if let Some(bounds) = overrides.bounds {
            generator.bounds = bounds;
        }
        if let Some(size) = overrides.square_size_km {
            generator.square_size_km = size;
        }
        if let Some(scale) = overrides.scale {
            generator.scale = scale;
        }
        if overrides.no_crop {
            generator.crop_size = None;
        } else if let Some(crop) = overrides.crop_size {
            generator.crop_size = Some(crop);
        }
        if let Some(root) = overrides.output_root {
            generator.output_root = root;
        }
        if overrides.seed.is_some() {
            generator.seed = overrides.seed;
        }

        let ee = &mut self.earth_engine;
        if let Some(api_url) = overrides.api_url {
            ee.api_url = api_url;
        }
        if let Some(project) = overrides.project {
            ee.project = project;
        }
        if overrides.access_token.is_some() {
            ee.access_token = overrides.access_token;
        }
        if overrides.credentials_file.is_some() {
            ee.credentials_file = overrides.credentials_file;
        }
    }

    pub fn optical_query(&self) -> CollectionQuery {
        self.optical
            .clone()
            .unwrap_or_else(CollectionQuery::sentinel2_true_color)
    }

    pub fn cultivation_query(&self) -> CollectionQuery {
        self.cultivation
            .clone()
            .unwrap_or_else(CollectionQuery::cdl_cultivated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: RunConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.generator, GeneratorConfig::default());
        assert_eq!(config.earth_engine.project, "earthengine-legacy");
        assert_eq!(config.optical_query(), CollectionQuery::sentinel2_true_color());
    }

    #[test]
    fn test_parse_run_file() {
        let yaml = r#"
count: 500
start_index: 1000
bounds: { min_lon: -100.0, min_lat: 38.0, max_lon: -95.0, max_lat: 42.0 }
crop_size: null
seed: 42
earth_engine:
  project: my-project
  timeout_secs: 120
cultivation:
  collection_id: USDA/NASS/CDL
  start: 2019-01-01
  end: 2019-12-31
  bands: [cultivated]
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, yaml).unwrap();

        let config = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(config.generator.count, 500);
        assert_eq!(config.generator.start_index, 1000);
        assert_eq!(config.generator.bounds.min_lon, -100.0);
        assert_eq!(config.generator.crop_size, None);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.scale, 20.0);
        assert_eq!(config.earth_engine.project, "my-project");
        assert_eq!(
            config.earth_engine.client_config().request_timeout,
            Duration::from_secs(120)
        );
        assert_eq!(config.cultivation_query().start.to_string(), "2019-01-01");
        assert!(config.optical.is_none());
    }

    #[test]
    fn test_overrides_win() {
        let mut config: RunConfig = serde_yaml::from_str("count: 10\nseed: 1").unwrap();
        config.apply(Overrides {
            count: Some(3),
            output_root: Some(PathBuf::from("/tmp/out")),
            project: Some("other".to_string()),
            ..Default::default()
        });

        assert_eq!(config.generator.count, 3);
        assert_eq!(config.generator.seed, Some(1));
        assert_eq!(config.generator.output_root, PathBuf::from("/tmp/out"));
        assert_eq!(config.earth_engine.project, "other");
    }

    #[test]
    fn test_no_crop_override() {
        let mut config = RunConfig::default();
        config.apply(Overrides {
            crop_size: Some(128),
            no_crop: true,
            ..Default::default()
        });
        assert_eq!(config.generator.crop_size, None);
    }

    #[test]
    fn test_credentials_file_selects_refreshing_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        std::fs::write(
            &path,
            r#"{"client_id": "id", "client_secret": "s", "refresh_token": "r"}"#,
        )
        .unwrap();

        let mut config = RunConfig::default();
        config.apply(Overrides {
            credentials_file: Some(path),
            ..Default::default()
        });
        assert!(config.earth_engine.client().is_ok());

        config.earth_engine.credentials_file = Some(dir.path().join("absent"));
        let err = config.earth_engine.client().err().unwrap();
        assert!(err.to_string().contains("Failed to load credentials"));
    }

    #[test]
    fn test_missing_file() {
        let err = RunConfig::load(Some(Path::new("/nonexistent/run.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read run file"));
    }
}
