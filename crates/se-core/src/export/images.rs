//! Image loading for PDF embedding
//!
//! Images referenced by a session record are fetched one at a time while the
//! PDF is laid out. A load that fails for any reason is reported as an
//! [`ImageLoadError`] and the renderer substitutes a placeholder line.

use crate::config::FetchConfig;
use crate::error::{ExportError, ImageLoadError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, RgbImage};
use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

/// Decoded raster ready to embed, always 8-bit RGB
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Reference the image was loaded from
    pub source: String,
    /// RGB pixels
    pub image: DynamicImage,
}

impl LoadedImage {
    /// Decode encoded image bytes and convert them to RGB
    pub fn decode(source: &str, bytes: &[u8]) -> std::result::Result<Self, ImageLoadError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| ImageLoadError::Decode {
            url: source.to_string(),
            message: e.to_string(),
        })?;
        Self::from_image(source, decoded)
    }

    /// Convert an already decoded image to RGB, flattening alpha onto white
    pub fn from_image(
        source: &str,
        image: DynamicImage,
    ) -> std::result::Result<Self, ImageLoadError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ImageLoadError::Surface {
                url: source.to_string(),
                width,
                height,
            });
        }

        let rgba = image.to_rgba8();
        let rgb = RgbImage::from_fn(width, height, |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let blend = |c: u8| -> u8 {
                let alpha = a as u16;
                ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            image::Rgb([blend(r), blend(g), blend(b)])
        });

        Ok(Self {
            source: source.to_string(),
            image: DynamicImage::ImageRgb8(rgb),
        })
    }

    /// Pixel width
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Source of embeddable images
pub trait ImageLoader: Send + Sync {
    /// Fetch and decode the image at `url`
    fn load(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<LoadedImage, ImageLoadError>> + Send;
}

/// Where an image reference points
#[derive(Debug, PartialEq, Eq)]
enum ImageSource<'a> {
    Http(&'a str),
    Data(&'a str),
    File(PathBuf),
}

impl<'a> ImageSource<'a> {
    fn parse(url: &'a str) -> std::result::Result<Self, ImageLoadError> {
        let trimmed = url.trim();
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ImageSource::Http(trimmed))
        } else if lower.starts_with("data:") {
            Ok(ImageSource::Data(&trimmed[5..]))
        } else if lower.starts_with("file://") {
            Ok(ImageSource::File(PathBuf::from(&trimmed[7..])))
        } else if trimmed.contains("://") || trimmed.is_empty() {
            Err(ImageLoadError::UnsupportedSource(url.to_string()))
        } else {
            Ok(ImageSource::File(PathBuf::from(trimmed)))
        }
    }
}

/// Loads images over HTTP(S), from `data:` URLs, and from the local filesystem
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: Client,
}

impl HttpImageLoader {
    /// Create a loader with the configured timeout and user agent
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ExportError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> std::result::Result<Vec<u8>, ImageLoadError> {
        let fetch_err = |e: reqwest::Error| ImageLoadError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }

    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, ImageLoadError> {
        match ImageSource::parse(url)? {
            ImageSource::Http(target) => self.fetch_http(target).await,
            ImageSource::Data(payload) => decode_data_url(url, payload),
            ImageSource::File(path) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| ImageLoadError::Fetch {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> std::result::Result<LoadedImage, ImageLoadError> {
        let bytes = self.fetch(url).await?;
        debug!(url = %abbreviate(url), bytes = bytes.len(), "Fetched image");
        LoadedImage::decode(&abbreviate(url), &bytes)
    }
}

/// Decode the part of a `data:` URL after the scheme
fn decode_data_url(url: &str, payload: &str) -> std::result::Result<Vec<u8>, ImageLoadError> {
    let (meta, data) = payload
        .split_once(',')
        .ok_or_else(|| ImageLoadError::UnsupportedSource(abbreviate(url)))?;

    if !meta.to_ascii_lowercase().ends_with(";base64") {
        return Err(ImageLoadError::UnsupportedSource(abbreviate(url)));
    }

    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(compact).map_err(|e| ImageLoadError::Decode {
        url: abbreviate(url),
        message: e.to_string(),
    })
}

/// Shorten data URLs for logs and error messages
fn abbreviate(url: &str) -> String {
    const MAX: usize = 64;
    if url.chars().count() <= MAX {
        url.to_string()
    } else {
        let head: String = url.chars().take(MAX).collect();
        format!("{}...", head)
    }
}
