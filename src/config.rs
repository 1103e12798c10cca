use crate::error::{PosterError, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::config::{Credentials, Region};
use std::env;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_IMAGE_MODEL: &str = "amazon.titan-image-generator-v2:0";
pub const DEFAULT_BUCKET: &str = "image-generation-29072025";
pub const DEFAULT_SHORT_EXPIRY_SECS: u64 = 3600;
pub const DEFAULT_LONG_EXPIRY_SECS: u64 = 86400;
/// S3 refuses to presign URLs valid for longer than one week.
pub const MAX_PRESIGNED_EXPIRY_SECS: u64 = 604800;

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: Option<String>,
    /// Base URL used for permanent links instead of the virtual-hosted S3 address.
    pub public_base_url: Option<String>,
    pub short_expiry_secs: u64,
    pub long_expiry_secs: u64,
    pub enable_public_url: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub bedrock: BedrockConfig,
    pub storage: StorageConfig,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    fn from_vars<F>(var: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        BedrockConfig {
            region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
            access_key: var("AWS_ACCESS_KEY_ID"),
            secret_key: var("AWS_SECRET_ACCESS_KEY"),
            model_id: var("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket: DEFAULT_BUCKET.to_string(),
            region: None,
            public_base_url: None,
            short_expiry_secs: DEFAULT_SHORT_EXPIRY_SECS,
            long_expiry_secs: DEFAULT_LONG_EXPIRY_SECS,
            enable_public_url: false,
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    pub fn with_expiries(mut self, short_secs: u64, long_secs: u64) -> Self {
        self.short_expiry_secs = short_secs;
        self.long_expiry_secs = long_secs;
        self
    }

    pub fn with_public_url(mut self, enabled: bool) -> Self {
        self.enable_public_url = enabled;
        self
    }

    pub fn short_expiry(&self) -> Duration {
        Duration::from_secs(self.short_expiry_secs)
    }

    pub fn long_expiry(&self) -> Duration {
        Duration::from_secs(self.long_expiry_secs)
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Permanent, unsigned address of an object in the bucket.
    pub fn object_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket,
                self.region_or_default(),
                key
            ),
        }
    }

    fn from_vars<F>(var: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(StorageConfig {
            bucket: var("POSTER_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
            public_base_url: var("POSTER_PUBLIC_BASE_URL").filter(|url| !url.trim().is_empty()),
            short_expiry_secs: parse_secs(var, "SHORT_URL_EXPIRY_SECS", DEFAULT_SHORT_EXPIRY_SECS)?,
            long_expiry_secs: parse_secs(var, "LONG_URL_EXPIRY_SECS", DEFAULT_LONG_EXPIRY_SECS)?,
            enable_public_url: var("ENABLE_PUBLIC_URL").map_or(false, |val| parse_flag(&val)),
        })
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            bedrock: BedrockConfig::from_vars(&var),
            storage: StorageConfig::from_vars(&var)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }

    /// Shared SDK settings for every AWS client. Explicit credentials win over the default chain.
    pub async fn load_aws_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = self.bedrock.region.as_ref().or(self.storage.region.as_ref()) {
            loader = loader.region(Region::new(region.clone()));
        }

        if let (Some(access_key), Some(secret_key)) =
            (&self.bedrock.access_key, &self.bedrock.secret_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "poster-lambda",
            ));
        }

        loader.load().await
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.trim().is_empty() {
            return Err(PosterError::ConfigError("Bucket name must not be empty".into()));
        }
        if self.bedrock.model_id.trim().is_empty() {
            return Err(PosterError::ConfigError("Model id must not be empty".into()));
        }
        if self.storage.short_expiry_secs == 0 || self.storage.long_expiry_secs == 0 {
            return Err(PosterError::ConfigError(
                "URL expiry must be greater than zero".into(),
            ));
        }
        if self.storage.short_expiry_secs > self.storage.long_expiry_secs {
            return Err(PosterError::ConfigError(format!(
                "Short URL expiry ({}s) exceeds long URL expiry ({}s)",
                self.storage.short_expiry_secs, self.storage.long_expiry_secs
            )));
        }
        if self.storage.long_expiry_secs > MAX_PRESIGNED_EXPIRY_SECS {
            return Err(PosterError::ConfigError(format!(
                "Long URL expiry ({}s) exceeds the presigned URL limit of {}s",
                self.storage.long_expiry_secs, MAX_PRESIGNED_EXPIRY_SECS
            )));
        }
        Ok(())
    }
}

fn parse_secs<F>(var: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            PosterError::ConfigError(format!("{} must be a number of seconds, got '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
