use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{TimeZone, Utc};
use poster_lambda::{
    bedrock::{decode_image, extract_first_image},
    naming::{is_valid_filename, FilenameDeriver, FixedClock},
    ImageGenerator, ObjectStore, PosterError, PosterHandler, Result, StorageConfig,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2, 3];

/// Serves a canned Titan response body through the real parsing path.
struct FakeGenerator {
    body: String,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn with_images(images: &[&[u8]]) -> Self {
        let encoded: Vec<String> = images.iter().map(|i| BASE64.encode(i)).collect();
        Self::with_body(json!({ "images": encoded }).to_string())
    }

    fn with_body(body: String) -> Self {
        Self {
            body,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let encoded = extract_first_image(self.body.as_bytes())?;
        decode_image(&encoded)
    }
}

#[derive(Default)]
struct FakeStore {
    fail_acl: bool,
    fail_put: bool,
    puts: Mutex<Vec<(String, Vec<u8>, String)>>,
    acl_grants: Mutex<Vec<String>>,
    presigned: Mutex<Vec<(String, Duration)>>,
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        if self.fail_put {
            return Err(PosterError::StorageError("bucket unavailable".into()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), body, content_type.to_string()));
        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<()> {
        self.acl_grants.lock().unwrap().push(key.to_string());
        if self.fail_acl {
            return Err(PosterError::AwsServiceError(
                "S3 put_object_acl failed: AccessControlListNotSupported - The bucket does not allow ACLs".into(),
            ));
        }
        Ok(())
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<String> {
        self.presigned
            .lock()
            .unwrap()
            .push((key.to_string(), expires_in));
        Ok(format!(
            "https://posters.s3.amazonaws.com/{}?X-Amz-Expires={}",
            key,
            expires_in.as_secs()
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://posters.s3.us-east-1.amazonaws.com/{}", key)
    }
}

fn fixed_naming() -> FilenameDeriver {
    FilenameDeriver::with_clock(FixedClock(
        Utc.with_ymd_and_hms(2025, 7, 29, 14, 30, 5).unwrap(),
    ))
}

fn handler(
    generator: Arc<FakeGenerator>,
    store: Arc<FakeStore>,
    config: &StorageConfig,
) -> PosterHandler {
    PosterHandler::new(generator, store, config).with_naming(fixed_naming())
}

#[tokio::test]
async fn test_happy_path_returns_signed_urls() {
    let generator = Arc::new(FakeGenerator::with_images(&[FAKE_PNG]));
    let store = Arc::new(FakeStore::default());
    let handler = handler(generator.clone(), store.clone(), &StorageConfig::default());

    let response = handler
        .handle(json!({ "prompt": "a castle at sunset" }))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);

    let body = response.parse_body().unwrap();
    assert_eq!(body.filename, "img-f9534e.png");
    assert_eq!(body.image_key, body.filename);
    assert!(is_valid_filename(&body.filename));
    assert_eq!(body.short_id, "6b16afc6");
    assert!(body.short_url_1h.contains("X-Amz-Expires=3600"));
    assert!(body.short_url_24h.contains("X-Amz-Expires=86400"));
    assert_eq!(body.recommended_url, body.short_url_24h);
    assert!(body.public_access.is_none());

    assert_eq!(
        generator.prompts.lock().unwrap().as_slice(),
        ["a castle at sunset"]
    );
    let puts = store.puts.lock().unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "img-f9534e.png");
    assert_eq!(puts[0].1, FAKE_PNG);
    assert_eq!(puts[0].2, "image/png");
    assert!(store.acl_grants.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_signed_url_expiries_and_key_are_consistent() {
    let store = Arc::new(FakeStore::default());
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        store.clone(),
        &StorageConfig::default(),
    );

    handler.generate("a castle at sunset").await.unwrap();

    let presigned = store.presigned.lock().unwrap();
    assert_eq!(
        presigned.as_slice(),
        [
            ("img-f9534e.png".to_string(), Duration::from_secs(3600)),
            ("img-f9534e.png".to_string(), Duration::from_secs(86400)),
        ]
    );
}

#[tokio::test]
async fn test_configured_expiries_are_used() {
    let store = Arc::new(FakeStore::default());
    let config = StorageConfig::new().with_expiries(900, 7200);
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        store.clone(),
        &config,
    );

    handler.generate("poster").await.unwrap();

    let expiries: Vec<u64> = store
        .presigned
        .lock()
        .unwrap()
        .iter()
        .map(|(_, d)| d.as_secs())
        .collect();
    assert_eq!(expiries, [900, 7200]);
}

#[tokio::test]
async fn test_public_url_is_recommended_when_granted() {
    let store = Arc::new(FakeStore::default());
    let config = StorageConfig::new().with_public_url(true);
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        store.clone(),
        &config,
    );

    let body = handler.generate("a castle at sunset").await.unwrap();

    assert_eq!(body.public_access, Some(true));
    assert_eq!(
        body.public_url.as_deref(),
        Some("https://posters.s3.us-east-1.amazonaws.com/img-f9534e.png")
    );
    assert_eq!(Some(body.recommended_url.as_str()), body.public_url.as_deref());
    assert_eq!(
        store.acl_grants.lock().unwrap().as_slice(),
        ["img-f9534e.png"]
    );
}

#[tokio::test]
async fn test_acl_failure_degrades_to_signed_urls() {
    let store = Arc::new(FakeStore {
        fail_acl: true,
        ..Default::default()
    });
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        store.clone(),
        &StorageConfig::default(),
    )
    .with_public_url(true);

    let response = handler
        .handle(json!({ "prompt": "a castle at sunset" }))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);

    let body = response.parse_body().unwrap();
    assert_eq!(body.public_access, Some(false));
    assert!(body.public_url.is_none());
    assert!(body
        .public_access_note
        .as_deref()
        .unwrap()
        .contains("AccessControlListNotSupported"));
    assert_eq!(body.recommended_url, body.short_url_24h);
    assert!(body.short_url_24h.contains("X-Amz-Expires=86400"));
}

#[tokio::test]
async fn test_empty_image_list_fails_without_storing() {
    let store = Arc::new(FakeStore::default());
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[])),
        store.clone(),
        &StorageConfig::default(),
    );

    let err = handler
        .handle(json!({ "prompt": "a castle at sunset" }))
        .await
        .unwrap_err();

    assert!(matches!(err, PosterError::ResponseError(_)));
    assert!(store.puts.lock().unwrap().is_empty());
    assert!(store.presigned.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_undecodable_image_fails() {
    let generator = Arc::new(FakeGenerator::with_body(
        json!({ "images": ["%%% not base64 %%%"] }).to_string(),
    ));
    let store = Arc::new(FakeStore::default());
    let handler = handler(generator, store.clone(), &StorageConfig::default());

    let err = handler.generate("a castle").await.unwrap_err();

    assert!(matches!(err, PosterError::DecodeError(_)));
    assert!(store.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_prompt_fails_before_generation() {
    let generator = Arc::new(FakeGenerator::with_images(&[FAKE_PNG]));
    let handler = handler(
        generator.clone(),
        Arc::new(FakeStore::default()),
        &StorageConfig::default(),
    );

    let err = handler.handle(json!({ "text": "a castle" })).await.unwrap_err();

    assert!(matches!(err, PosterError::RequestError(_)));
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let store = Arc::new(FakeStore {
        fail_put: true,
        ..Default::default()
    });
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        store.clone(),
        &StorageConfig::new().with_public_url(true),
    );

    let err = handler.generate("a castle").await.unwrap_err();

    assert!(matches!(err, PosterError::StorageError(_)));
    assert!(store.acl_grants.lock().unwrap().is_empty());
    assert!(store.presigned.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_prompt_still_produces_a_filename() {
    let handler = handler(
        Arc::new(FakeGenerator::with_images(&[FAKE_PNG])),
        Arc::new(FakeStore::default()),
        &StorageConfig::default(),
    );

    let body = handler.generate("").await.unwrap();

    assert_eq!(body.filename, "img-02a16c.png");
    assert_eq!(body.short_id.len(), 8);
}
