pub mod image_client;

use crate::error::Result;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;

pub use image_client::{decode_image, extract_first_image, ImageClient};

/// Turns a prompt into raw image bytes.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>>;
}

pub fn build_client(sdk_config: &SdkConfig) -> Client {
    Client::new(sdk_config)
}
