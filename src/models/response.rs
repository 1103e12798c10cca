use crate::error::{PosterError, Result};
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Image generated with shortened filename";
pub const SIGNED_ONLY_NOTE: &str =
    "URLs are much shorter due to compact filename. Use 24h URL for longer access.";
pub const PUBLIC_NOTE: &str = "Public URL never expires. Signed URLs are kept as a fallback.";

/// Links minted for one stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalUrls {
    pub short_lived: String,
    pub long_lived: String,
    pub public: Option<String>,
}

impl RetrievalUrls {
    pub fn recommended(&self) -> &str {
        self.public.as_deref().unwrap_or(&self.long_lived)
    }
}

/// Outcome of the optional public-read grant.
#[derive(Debug, Clone, PartialEq)]
pub enum PublicAccess {
    Disabled,
    Granted,
    Failed(String),
}

impl PublicAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, PublicAccess::Granted)
    }
}

/// JSON body returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterResponse {
    pub short_url_1h: String,
    pub short_url_24h: String,
    pub filename: String,
    pub image_key: String,
    pub short_id: String,
    pub message: String,
    pub note: String,
    pub recommended_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access_note: Option<String>,
}

impl PosterResponse {
    pub fn assemble(
        filename: &str,
        short_id: String,
        urls: &RetrievalUrls,
        access: &PublicAccess,
    ) -> Self {
        let (public_access, public_access_note) = match access {
            PublicAccess::Disabled => (None, None),
            PublicAccess::Granted => (Some(true), Some("Object is publicly readable".to_string())),
            PublicAccess::Failed(reason) => (
                Some(false),
                Some(format!(
                    "Public access could not be enabled ({}); use the 24h URL instead",
                    reason
                )),
            ),
        };
        let note = if access.is_granted() {
            PUBLIC_NOTE
        } else {
            SIGNED_ONLY_NOTE
        };

        Self {
            short_url_1h: urls.short_lived.clone(),
            short_url_24h: urls.long_lived.clone(),
            filename: filename.to_string(),
            image_key: filename.to_string(),
            short_id,
            message: SUCCESS_MESSAGE.to_string(),
            note: note.to_string(),
            recommended_url: urls.recommended().to_string(),
            public_access,
            public_url: urls.public.clone(),
            public_access_note,
        }
    }
}

/// Envelope handed back to the Lambda runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl LambdaResponse {
    pub fn ok(body: &PosterResponse) -> Result<Self> {
        let body = serde_json::to_string(body)
            .map_err(|e| PosterError::SerializationError(e.to_string()))?;
        Ok(Self {
            status_code: 200,
            body,
        })
    }

    pub fn parse_body(&self) -> Result<PosterResponse> {
        serde_json::from_str(&self.body).map_err(|e| PosterError::SerializationError(e.to_string()))
    }
}
