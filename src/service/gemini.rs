/// Generative Language API client
///
/// Two endpoints are used:
/// - `models/{model}:predict` for text-to-image generation (Imagen)
/// - `models/{model}:generateContent` for editing an image with a second
///   image and an instruction (Gemini image model)
///
/// Responses without an image are reported as `ServiceError::EmptyResponse`
/// so callers treat them exactly like transport failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ImageData, ImageService, ServiceError};
use crate::config::Config;

/// Production `ImageService`
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: Config,
}

impl GeminiClient {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp, ServiceError> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Resp>().await?)
    }
}

#[async_trait]
impl ImageService for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<ImageData, ServiceError> {
        let url = self.endpoint(&self.config.generation_model, "predict");
        log::debug!("POST {} ({} prompt chars)", url, prompt.len());

        let response: PredictResponse = self.post(&url, &PredictRequest::new(prompt)).await?;
        response.into_image()
    }

    async fn composite(
        &self,
        base: &ImageData,
        design: &ImageData,
        prompt: &str,
    ) -> Result<ImageData, ServiceError> {
        let url = self.endpoint(&self.config.composite_model, "generateContent");
        log::debug!(
            "POST {} (base {} bytes, design {} bytes)",
            url,
            base.bytes.len(),
            design.bytes.len()
        );

        let request = GenerateContentRequest::new(base, design, prompt);
        let response: GenerateContentResponse = self.post(&url, &request).await?;
        response.into_image()
    }
}

// ========== :predict ==========

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

impl PredictRequest {
    /// One square JPEG
    fn new(prompt: &str) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "1:1",
                output_options: OutputOptions {
                    mime_type: "image/jpeg",
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

impl PredictResponse {
    fn into_image(self) -> Result<ImageData, ServiceError> {
        let prediction = self
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or(ServiceError::EmptyResponse("API did not return any images"))?;

        let data = prediction.bytes_base64_encoded.unwrap_or_default();
        let mime_type = prediction.mime_type.unwrap_or_else(|| "image/jpeg".to_string());
        ImageData::from_base64(&data, mime_type)
    }
}

// ========== :generateContent ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl Part {
    fn image(image: &ImageData) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.to_base64(),
            }),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

impl GenerateContentRequest {
    /// Parts in order: base mockup, design graphic, instruction
    fn new(base: &ImageData, design: &ImageData, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::image(base), Part::image(design), Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// First inline image of the first candidate
    fn into_image(self) -> Result<ImageData, ServiceError> {
        let inline = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.inline_data)
            })
            .ok_or(ServiceError::EmptyResponse("The API did not return an edited image"))?;

        ImageData::from_base64(&inline.data, inline.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predict_request_shape() {
        let body = serde_json::to_value(PredictRequest::new("a hoodie")).unwrap();
        assert_eq!(
            body,
            json!({
                "instances": [{ "prompt": "a hoodie" }],
                "parameters": {
                    "sampleCount": 1,
                    "aspectRatio": "1:1",
                    "outputOptions": { "mimeType": "image/jpeg" }
                }
            })
        );
    }

    #[test]
    fn test_predict_response_image() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "AQID", "mimeType": "image/jpeg" }]
        }))
        .unwrap();

        let image = response.into_image().unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_predict_response_without_images() {
        let response: PredictResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.into_image(), Err(ServiceError::EmptyResponse(_))));
    }

    #[test]
    fn test_generate_content_request_parts() {
        let base = ImageData::new(vec![1], "image/jpeg");
        let design = ImageData::new(vec![2], "image/png");
        let body = serde_json::to_value(GenerateContentRequest::new(&base, &design, "apply")).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "Ag==");
        assert_eq!(parts[2], json!({ "text": "apply" }));
        assert_eq!(body["generationConfig"]["responseModalities"], json!(["IMAGE", "TEXT"]));
    }

    #[test]
    fn test_generate_content_response_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your shirt." },
                        { "inlineData": { "mimeType": "image/png", "data": "BAU=" } }
                    ]
                }
            }]
        }))
        .unwrap();

        let image = response.into_image().unwrap();
        assert_eq!(image, ImageData::new(vec![4, 5], "image/png"));
    }

    #[test]
    fn test_generate_content_response_text_only() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't do that." }] } }]
        }))
        .unwrap();

        assert!(matches!(response.into_image(), Err(ServiceError::EmptyResponse(_))));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(Config::with_api_key("key")).unwrap();
        assert_eq!(
            client.endpoint("imagen-4.0-generate-001", "predict"),
            "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }
}
