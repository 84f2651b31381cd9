//! Asset loading - fetch and decode images into ready-to-draw rasters.
//!
//! Loads never touch the scene. They run on a [`BackgroundExecutor`] and hand
//! their result to a caller-supplied finisher; the owner applies it later on
//! its own thread, after checking the scene has not moved on.
//!
//! Every decoded image records whether its pixels may be read back. Local files
//! and in-memory bytes always may; remote bytes only when they come from the
//! app's own origin or carry a permissive `Access-Control-Allow-Origin`.

use crate::background::BackgroundExecutor;
use crate::constants::HTTP_USER_AGENT;
use crate::error::{Error, Result};
use crate::relay::relay_url;
use image::RgbaImage;
use reqwest::Url;
use reqwest::header::{ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderName};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Bundled or local file; always readable.
    File(PathBuf),
    /// Remote image, possibly on another origin.
    Url(String),
    /// Already-fetched bytes; always readable.
    Bytes { label: String, data: Arc<Vec<u8>> },
}

impl ImageSource {
    /// Human-readable description used in errors and events.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Url(url) => url.clone(),
            ImageSource::Bytes { label, .. } => label.clone(),
        }
    }

    /// Interpret a CLI-style argument: anything with a scheme is a URL.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageSource::Url(value.to_string())
        } else {
            ImageSource::File(PathBuf::from(value))
        }
    }
}

/// Immutable decoded raster with its natural pixel size.
#[derive(Clone)]
pub struct DecodedImage {
    pixels: Arc<RgbaImage>,
    source: String,
    readable: bool,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage, source: impl Into<String>, readable: bool) -> Self {
        Self {
            pixels: Arc::new(pixels),
            source: source.into(),
            readable,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    /// Natural size as floats, ready for placement math.
    pub fn natural_size(&self) -> (f64, f64) {
        (f64::from(self.pixels.width()), f64::from(self.pixels.height()))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether drawing this image keeps the canvas exportable.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Two handles to the same decoded pixels.
    pub fn same_pixels(&self, other: &DecodedImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("source", &self.source)
            .field("readable", &self.readable)
            .finish()
    }
}

/// Raw bytes from a remote fetch plus the readback verdict.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub readable: bool,
}

/// Remote byte source. Implemented over HTTP in production and by fakes in tests.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Fetched>;
}

/// Blocking HTTP fetcher that applies the browser's readback rules.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    app_origin: String,
}

impl HttpFetcher {
    pub fn new(app_origin: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            app_origin: app_origin.into(),
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        let response = self.client.get(url).header(ACCEPT, "image/*").send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {} for {}", status.as_u16(), url)));
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let allow_origin = header(ACCESS_CONTROL_ALLOW_ORIGIN);
        let content_type = header(CONTENT_TYPE);
        let readable = is_same_origin(url, &self.app_origin)
            || cors_allows(allow_origin.as_deref(), &self.app_origin);
        let bytes = response.bytes()?.to_vec();

        Ok(Fetched {
            bytes,
            content_type,
            readable,
        })
    }
}

/// Whether `url` shares scheme, host and port with `app_origin`.
pub fn is_same_origin(url: &str, app_origin: &str) -> bool {
    match (Url::parse(url), Url::parse(app_origin)) {
        (Ok(url), Ok(origin)) => url.origin() == origin.origin(),
        _ => false,
    }
}

/// Whether an `Access-Control-Allow-Origin` value grants `app_origin` readback.
pub fn cors_allows(header: Option<&str>, app_origin: &str) -> bool {
    match header.map(str::trim) {
        Some("*") => true,
        Some(value) => value.trim_end_matches('/') == app_origin.trim_end_matches('/'),
        None => false,
    }
}

/// Fetches and decodes images, routing cross-origin URLs through the relay.
#[derive(Clone)]
pub struct AssetLoader {
    fetcher: Arc<dyn Fetch>,
    relay_endpoint: Option<String>,
    app_origin: String,
}

impl AssetLoader {
    pub fn new(fetcher: Arc<dyn Fetch>, app_origin: impl Into<String>) -> Self {
        Self {
            fetcher,
            relay_endpoint: None,
            app_origin: app_origin.into(),
        }
    }

    /// Send cross-origin URLs through the relay at `endpoint`.
    pub fn with_relay(mut self, endpoint: Option<String>) -> Self {
        self.relay_endpoint = endpoint;
        self
    }

    pub fn relay_endpoint(&self) -> Option<&str> {
        self.relay_endpoint.as_deref()
    }

    /// The URL actually requested for `url`.
    pub fn route(&self, url: &str) -> String {
        match self.relay_endpoint {
            Some(ref endpoint) if !is_same_origin(url, &self.app_origin) => relay_url(endpoint, url),
            _ => url.to_string(),
        }
    }

    /// Fetch and decode on the calling thread.
    ///
    /// Any failure (missing file, network error, unsupported format) comes back
    /// as [`Error::Decode`].
    pub fn load_blocking(&self, source: &ImageSource) -> Result<DecodedImage> {
        let described = source.describe();
        let (bytes, readable) = match source {
            ImageSource::File(path) => {
                let bytes = std::fs::read(path)
                    .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))?;
                (bytes, true)
            }
            ImageSource::Url(url) => {
                let routed = self.route(url);
                debug!(url = %url, routed = %routed, "Fetching image");
                let fetched = self
                    .fetcher
                    .fetch(&routed)
                    .map_err(|e| Error::Decode(format!("{}: {}", url, e)))?;
                (fetched.bytes, fetched.readable)
            }
            ImageSource::Bytes { data, .. } => (data.as_ref().clone(), true),
        };

        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| Error::Decode(format!("{}: {}", described, e)))?
            .to_rgba8();
        debug!(
            source = %described,
            width = pixels.width(),
            height = pixels.height(),
            readable,
            "Decoded image"
        );
        Ok(DecodedImage::new(pixels, described, readable))
    }

    /// Load `source` on `executor`; `finish` maps the outcome into the
    /// executor's payload once decoding is done.
    pub fn spawn_load<T, F>(&self, executor: &BackgroundExecutor<T>, source: ImageSource, finish: F)
    where
        T: Send + 'static,
        F: FnOnce(Result<DecodedImage>) -> T + Send + 'static,
    {
        let loader = self.clone();
        let name = format!("load {}", source.describe());
        executor.spawn(&name, move || finish(loader.load_blocking(&source)));
    }
}
