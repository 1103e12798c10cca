use crate::{
    bedrock::ImageGenerator,
    config::StorageConfig,
    error::Result,
    logger,
    models::{LambdaResponse, PosterRequest, PosterResponse, PublicAccess},
    naming::FilenameDeriver,
    storage::{ObjectStore, PNG_CONTENT_TYPE},
    urls::UrlMinter,
};
use std::sync::Arc;

/// Runs one prompt through generation, upload and link minting.
///
/// The generator and store are process-wide clients shared across invocations.
pub struct PosterHandler {
    generator: Arc<dyn ImageGenerator>,
    store: Arc<dyn ObjectStore>,
    naming: FilenameDeriver,
    minter: UrlMinter,
    enable_public_url: bool,
}

impl PosterHandler {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        store: Arc<dyn ObjectStore>,
        storage_config: &StorageConfig,
    ) -> Self {
        Self {
            generator,
            store,
            naming: FilenameDeriver::default(),
            minter: UrlMinter::from_config(storage_config),
            enable_public_url: storage_config.enable_public_url,
        }
    }

    pub fn with_naming(mut self, naming: FilenameDeriver) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_public_url(mut self, enabled: bool) -> Self {
        self.enable_public_url = enabled;
        self
    }

    /// Entry point for a raw invocation event.
    pub async fn handle(&self, event: serde_json::Value) -> Result<LambdaResponse> {
        let request = PosterRequest::from_event(event)?;
        let body = self.generate(&request.prompt).await?;
        LambdaResponse::ok(&body)
    }

    pub async fn generate(&self, prompt: &str) -> Result<PosterResponse> {
        log::info!("Prompt: {}", prompt);

        let image = {
            let _timer = logger::timer("image generation");
            self.generator.generate(prompt).await?
        };

        let filename = self.naming.filename(prompt);
        {
            let _timer = logger::timer("image upload");
            self.store
                .put_object(&filename, image, PNG_CONTENT_TYPE)
                .await?;
        }
        log::info!("Stored image as {}", filename);

        let access = self.grant_public_access(&filename).await;
        let urls = self
            .minter
            .mint(self.store.as_ref(), &filename, access.is_granted())
            .await?;

        log::info!("1 Hour URL: {}", urls.short_lived);
        log::info!("24 Hour URL: {}", urls.long_lived);
        if let Some(public) = &urls.public {
            log::info!("Public URL: {}", public);
        }

        let short_id = self.naming.short_id(&filename);
        Ok(PosterResponse::assemble(&filename, short_id, &urls, &access))
    }

    /// Best effort: a failed grant only downgrades the response.
    async fn grant_public_access(&self, key: &str) -> PublicAccess {
        if !self.enable_public_url {
            return PublicAccess::Disabled;
        }

        match self.store.make_public(key).await {
            Ok(()) => PublicAccess::Granted,
            Err(e) => {
                log::warn!("Could not make {} public, falling back to signed URLs: {}", key, e);
                PublicAccess::Failed(e.to_string())
            }
        }
    }
}
