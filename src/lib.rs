//! Prompt-to-poster Lambda: generates an image with Amazon Titan on Bedrock,
//! stores it in S3 and returns signed (and optionally public) links.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
pub mod naming;
pub mod storage;
pub mod urls;

pub use bedrock::{ImageClient, ImageGenerator};
pub use config::{BedrockConfig, Config, StorageConfig};
pub use error::{PosterError, Result};
pub use handler::PosterHandler;
pub use models::{LambdaResponse, PosterRequest, PosterResponse};
pub use storage::{ObjectStore, S3ObjectStore};
