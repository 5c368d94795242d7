//! Portrait dance video
//!
//! Hands the portrait to Veo as the first frame, polls the long-running
//! operation until it is done and saves the resulting MP4 under the cache
//! directory. Progress is reported through a callback so the front end can
//! show a status line while the job runs.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::pixel;

pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DANCE_PROMPT: &str = "A photorealistic video of this person dancing energetically and happily in a professional setting, keeping the same lighting and attire. High quality.";
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const VIDEO_FILE_NAME: &str = "dance.mp4";

/// Stand-in canvas when the portrait cannot be fetched
const FALLBACK_SIZE: u32 = 512;
const FALLBACK_COLOR: [u8; 3] = [0x1e, 0x29, 0x3b];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanceStage {
    Preparing,
    Generating,
    /// One poll came back unfinished
    StillDancing,
    Downloading,
    Saved(PathBuf),
    Failed(String),
}

impl DanceStage {
    pub fn status_text(&self) -> String {
        match self {
            DanceStage::Preparing => "Preparing the stage...".to_string(),
            DanceStage::Generating => {
                "Generating dance moves (this takes ~1-2 mins)...".to_string()
            }
            DanceStage::StillDancing => "Still dancing... (Veo is thinking)".to_string(),
            DanceStage::Downloading => "Downloading performance...".to_string(),
            DanceStage::Saved(path) => format!("Performance saved to {}", path.display()),
            DanceStage::Failed(reason) => reason.clone(),
        }
    }

    /// Saved or failed; no more updates follow
    pub fn is_done(&self) -> bool {
        matches!(self, DanceStage::Saved(_) | DanceStage::Failed(_))
    }
}

#[derive(Debug, Error)]
pub enum DanceError {
    #[error("no API key configured")]
    Configuration,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("video generation failed: {0}")]
    Operation(String),
    #[error("no video returned")]
    NoVideo,
    #[error("could not encode portrait: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not save video: {0}")]
    Io(#[from] std::io::Error),
}

impl DanceError {
    /// Text for the status line
    pub fn user_message(&self) -> String {
        match self {
            DanceError::Configuration => {
                "Video generation needs an API key (folio config --api-key).".to_string()
            }
            DanceError::Provider { status: 403 | 404, .. } => {
                "This API key cannot use video generation. A paid key is required.".to_string()
            }
            other => format!("Could not generate the dance video. {}", other),
        }
    }
}

#[derive(Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Deserialize)]
struct Operation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<OperationResponse>,
}

impl Operation {
    fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
    }
}

#[derive(Clone)]
pub struct DanceClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    poll_interval: Duration,
}

impl DanceClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_VIDEO_MODEL.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, DanceError> {
        let api_key = config.api_key().ok_or(DanceError::Configuration)?;
        Ok(Self::new(&api_key)
            .with_base_url(config.base_url())
            .with_model(config.video_model()))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fetch the portrait and run the whole job, reporting each stage.
    /// An unreachable portrait is replaced by a plain canvas.
    pub async fn perform<F>(
        &self,
        portrait_url: &str,
        out_dir: &Path,
        on_stage: F,
    ) -> Result<PathBuf, DanceError>
    where
        F: Fn(DanceStage) + Send,
    {
        on_stage(DanceStage::Preparing);
        let portrait = match pixel::fetch_image(portrait_url).await {
            Ok(img) => img,
            Err(e) => {
                warn!(error = %e, "portrait unavailable, dancing on a blank canvas");
                fallback_canvas()
            }
        };
        self.generate(&portrait, out_dir, on_stage).await
    }

    pub async fn generate<F>(
        &self,
        portrait: &DynamicImage,
        out_dir: &Path,
        on_stage: F,
    ) -> Result<PathBuf, DanceError>
    where
        F: Fn(DanceStage) + Send,
    {
        let image_data = encode_jpeg(portrait)?;

        on_stage(DanceStage::Generating);
        let mut operation = self.start(&image_data).await?;
        info!(operation = %operation.name, "video generation started");

        while !operation.done {
            tokio::time::sleep(self.poll_interval).await;
            operation = self.poll(&operation.name).await?;
            on_stage(DanceStage::StillDancing);
        }

        if let Some(err) = operation.error.as_ref() {
            return Err(DanceError::Operation(err.message.clone()));
        }

        on_stage(DanceStage::Downloading);
        let uri = operation.video_uri().ok_or(DanceError::NoVideo)?;
        let path = self.download(uri, out_dir).await?;
        info!(path = %path.display(), "dance video saved");
        Ok(path)
    }

    async fn start(&self, image_data: &str) -> Result<Operation, DanceError> {
        let url = format!("{}/v1beta/models/{}:predictLongRunning", self.base_url, self.model);
        let body = json!({
            "instances": [{
                "prompt": DANCE_PROMPT,
                "image": {
                    "bytesBase64Encoded": image_data,
                    "mimeType": "image/jpeg",
                },
            }],
            "parameters": {
                "sampleCount": 1,
                "resolution": "720p",
                "aspectRatio": "16:9",
            },
        });

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        parse_operation(response).await
    }

    async fn poll(&self, name: &str) -> Result<Operation, DanceError> {
        debug!(operation = %name, "polling video operation");
        let response = self
            .client
            .get(format!("{}/v1beta/{}", self.base_url, name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        parse_operation(response).await
    }

    async fn download(&self, uri: &str, out_dir: &Path) -> Result<PathBuf, DanceError> {
        let response = self
            .client
            .get(uri)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(out_dir).await?;
        let path = out_dir.join(VIDEO_FILE_NAME);
        tokio::fs::write(&path, &bytes).await?;
        debug!(bytes = bytes.len(), "video downloaded");
        Ok(path)
    }
}

/// Where finished videos are written
pub fn default_output_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("folio"))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DanceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(DanceError::Provider { status, message })
}

async fn parse_operation(response: reqwest::Response) -> Result<Operation, DanceError> {
    let response = check_status(response).await?;
    Ok(response.json::<Operation>().await?)
}

fn encode_jpeg(img: &DynamicImage) -> Result<String, DanceError> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    Ok(general_purpose::STANDARD.encode(&buf))
}

fn fallback_canvas() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        FALLBACK_SIZE,
        FALLBACK_SIZE,
        Rgb(FALLBACK_COLOR),
    ))
}
