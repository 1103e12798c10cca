use serde::{Deserialize, Serialize};

pub const TEXT_IMAGE_TASK: &str = "TEXT_IMAGE";
pub const IMAGE_SIZE: u32 = 1024;
pub const CFG_SCALE: f32 = 8.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TitanImageRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextToImageParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub quality: String,
    pub cfg_scale: f32,
    pub height: u32,
    pub width: u32,
    pub seed: u32,
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            number_of_images: 1,
            quality: "standard".to_string(),
            cfg_scale: CFG_SCALE,
            height: IMAGE_SIZE,
            width: IMAGE_SIZE,
            seed: 0,
        }
    }
}

impl TitanImageRequest {
    pub fn text_to_image(prompt: impl Into<String>) -> Self {
        Self {
            task_type: TEXT_IMAGE_TASK.to_string(),
            text_to_image_params: TextToImageParams {
                text: prompt.into(),
            },
            image_generation_config: ImageGenerationConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}
