use crate::{config::StorageConfig, error::Result, models::RetrievalUrls, storage::ObjectStore};
use std::time::Duration;

/// Mints the retrieval links for a stored object.
#[derive(Debug, Clone, Copy)]
pub struct UrlMinter {
    short_expiry: Duration,
    long_expiry: Duration,
}

impl UrlMinter {
    pub fn new(short_expiry: Duration, long_expiry: Duration) -> Self {
        Self {
            short_expiry,
            long_expiry,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.short_expiry(), config.long_expiry())
    }

    pub async fn mint(
        &self,
        store: &dyn ObjectStore,
        key: &str,
        public: bool,
    ) -> Result<RetrievalUrls> {
        let short_lived = store.presigned_get_url(key, self.short_expiry).await?;
        let long_lived = store.presigned_get_url(key, self.long_expiry).await?;
        let public = public.then(|| store.public_url(key));

        Ok(RetrievalUrls {
            short_lived,
            long_lived,
            public,
        })
    }
}

impl Default for UrlMinter {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}
