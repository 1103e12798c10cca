pub mod s3;
pub mod traits;

pub use s3::S3ObjectStore;
pub use traits::ObjectStore;

pub const PNG_CONTENT_TYPE: &str = "image/png";
