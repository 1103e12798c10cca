use super::ImageGenerator;
use crate::{
    error::{PosterError, Result},
    models::{TitanImageRequest, TitanImageResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model_id: String,
}

impl ImageClient {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke(&self, payload: &TitanImageRequest) -> Result<Vec<u8>> {
        let request_json = serde_json::to_string(payload)
            .map_err(|e| PosterError::SerializationError(e.to_string()))?;

        log::info!("Generating image with model: {}", self.model_id);
        log::debug!("Image generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type(JSON_MEDIA_TYPE)
            .accept(JSON_MEDIA_TYPE)
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("AWS SDK Image Generation Error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    PosterError::AwsServiceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    PosterError::AwsError(format!("AWS SDK error: {}", e))
                }
            })?;

        Ok(response.body.into_inner())
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
        let payload = TitanImageRequest::text_to_image(prompt);
        let response_bytes = self.invoke(&payload).await?;
        let encoded = extract_first_image(&response_bytes)?;
        decode_image(&encoded)
    }
}

/// Pulls `images[0]` out of a Titan response body.
pub fn extract_first_image(response_bytes: &[u8]) -> Result<String> {
    let response_str = std::str::from_utf8(response_bytes)
        .map_err(|e| PosterError::ResponseError(e.to_string()))?;

    let titan_response: TitanImageResponse = serde_json::from_str(response_str)
        .map_err(|e| PosterError::ResponseError(e.to_string()))?;

    if let Some(error) = titan_response.error.filter(|e| !e.is_empty()) {
        return Err(PosterError::ResponseError(format!(
            "Image generation failed: {}",
            error
        )));
    }

    titan_response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| PosterError::ResponseError("No images generated".into()))
}

/// Decodes standard base64, skipping ASCII whitespace such as line wrapping.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| PosterError::DecodeError(format!("Invalid base64 image: {}", e)))?;
    log::trace!("Decoded image payload: {} bytes", bytes.len());
    Ok(bytes)
}
