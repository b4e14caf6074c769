use {
    com::{DEFAULT_ENDPOINT, InferenceConfig, UploadMode},
    image::{DEFAULT_CONTRAST, DEFAULT_QUALITY, DEFAULT_SIZE, Enhancement, NormalizeConfig},
    serde::{Deserialize, Serialize},
    std::{
        fmt, io,
        path::{Path, PathBuf},
        time::Duration,
    },
};

pub const ENDPOINT_ENV: &str = "SCANNER_ENDPOINT";
pub const TIMEOUT_ENV: &str = "SCANNER_TIMEOUT_MS";
pub const QUEUE_DIR_ENV: &str = "SCANNER_QUEUE_DIR";
pub const UPLOAD_ENV: &str = "SCANNER_UPLOAD";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, reason: String },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path, reason } => {
                write!(f, "cannot parse {}: {reason}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Everything the screening pipeline can be configured with.
///
/// Every field has a default, so a config file only needs the fields it
/// changes. Precedence is file, then environment, then command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    /// `multipart` or `raw`.
    pub upload: String,
    pub size: u32,
    pub jpeg_quality: u8,
    /// Grayscale plus contrast before encoding.
    pub enhance: bool,
    pub contrast: f32,
    /// Where queued submissions are kept; platform data dir if unset.
    pub queue_dir: Option<PathBuf>,
    pub queue_capacity: u64,
    pub probe_interval_ms: u64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
            upload: UploadMode::Multipart.to_string(),
            size: DEFAULT_SIZE,
            jpeg_quality: DEFAULT_QUALITY,
            enhance: false,
            contrast: DEFAULT_CONTRAST,
            queue_dir: None,
            queue_capacity: queue::DEFAULT_CAPACITY,
            probe_interval_ms: 5_000,
        }
    }
}

impl ScreeningConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The file at `path` (or the defaults) with environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_vars(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(endpoint) = var(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = var(TIMEOUT_ENV) {
            self.timeout_ms = timeout.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV} must be milliseconds, got {timeout}"))
            })?;
        }
        if let Some(dir) = var(QUEUE_DIR_ENV) {
            self.queue_dir = Some(PathBuf::from(dir));
        }
        if let Some(upload) = var(UPLOAD_ENV) {
            self.upload = upload;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(1))
    }

    pub fn upload_mode(&self) -> Result<UploadMode, ConfigError> {
        self.upload.parse().map_err(ConfigError::Invalid)
    }

    pub fn inference_config(&self) -> Result<InferenceConfig, ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout must be above zero".to_string()));
        }
        Ok(InferenceConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_timeout(self.timeout())
            .with_upload(self.upload_mode()?))
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        let enhancement = if self.enhance {
            Enhancement::Grayscale {
                contrast: self.contrast,
            }
        } else {
            Enhancement::None
        };
        NormalizeConfig::default()
            .with_size(self.size)
            .with_quality(self.jpeg_quality)
            .with_enhancement(enhancement)
    }

    /// The configured queue directory, or `<data dir>/scanner/pending`.
    pub fn queue_dir(&self) -> PathBuf {
        if let Some(dir) = &self.queue_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scanner")
            .join("pending")
    }
}
