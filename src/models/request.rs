use crate::error::{PosterError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterRequest {
    pub prompt: String,
}

impl PosterRequest {
    /// Reads the request out of a raw invocation event. Extra fields are ignored.
    pub fn from_event(event: serde_json::Value) -> Result<Self> {
        match event.get("prompt") {
            Some(serde_json::Value::String(_)) => serde_json::from_value(event)
                .map_err(|e| PosterError::SerializationError(e.to_string())),
            Some(other) => Err(PosterError::RequestError(format!(
                "'prompt' must be a string, got {}",
                other
            ))),
            None => Err(PosterError::RequestError(
                "Missing required field 'prompt'".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_is_read() {
        let request =
            PosterRequest::from_event(json!({"prompt": "a castle", "style": "noir"})).unwrap();
        assert_eq!(request.prompt, "a castle");
    }

    #[test]
    fn test_missing_prompt() {
        let err = PosterRequest::from_event(json!({"text": "a castle"})).unwrap_err();
        assert!(matches!(err, PosterError::RequestError(_)));
    }

    #[test]
    fn test_non_string_prompt() {
        let err = PosterRequest::from_event(json!({"prompt": 42})).unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_empty_prompt_is_accepted() {
        let request = PosterRequest::from_event(json!({"prompt": ""})).unwrap();
        assert!(request.prompt.is_empty());
    }
}
