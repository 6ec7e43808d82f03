// Common data models for resolution and download

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::utils::format_size_label;
use super::validator;

/// Which page flow a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Multi-format video page (video + audio variants)
    VideoPage,
    /// Single-format reel page
    ReelPage,
}

impl ContentType {
    /// Classify `raw` and return the canonical URL
    pub fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        match self {
            Self::VideoPage => validator::validate_youtube_url(raw),
            Self::ReelPage => validator::validate_reel_url(raw),
        }
    }

    /// Info endpoint, relative to the API base URL
    pub fn info_path(&self) -> &'static str {
        match self {
            Self::VideoPage => "youtube/info",
            Self::ReelPage => "instagram/info",
        }
    }

    /// Binary endpoint, relative to the API base URL
    pub fn download_path(&self) -> &'static str {
        match self {
            Self::VideoPage => "youtube/download",
            Self::ReelPage => "instagram/download",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VideoPage => "YouTube",
            Self::ReelPage => "Instagram Reel",
        }
    }
}

/// Media kind of a format variant. Drives the `type` query and the
/// fallback file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Reel,
}

impl MediaKind {
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Video | Self::Reel => "mp4",
            Self::Audio => "m4a",
        }
    }

    /// Value of the `type` query parameter, if the endpoint takes one
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            Self::Video => Some("video"),
            Self::Audio => Some("audio"),
            Self::Reel => None,
        }
    }
}

/// A submitted URL, already validated and canonicalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub url: String,
    pub content_type: ContentType,
}

/// One downloadable variant. Identity is `format_id`, assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVariant {
    pub format_id: String,
    pub quality_label: String,
    pub approx_size_label: Option<String>,
    pub file_extension: Option<String>,
    pub kind: MediaKind,
}

/// Id of the implicit single reel variant
pub const REEL_FORMAT_ID: &str = "reel";

impl FormatVariant {
    /// The implicit variant every reel has
    pub fn reel() -> Self {
        Self {
            format_id: REEL_FORMAT_ID.to_string(),
            quality_label: "Reel".to_string(),
            approx_size_label: None,
            file_extension: Some("mp4".to_string()),
            kind: MediaKind::Reel,
        }
    }
}

/// Resolved metadata plus the variants the user can pick from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub content_type: ContentType,
    /// Video title, or the uploader for reels
    pub title: Option<String>,
    pub channel: Option<String>,
    pub caption: Option<String>,
    pub duration_label: Option<String>,
    pub preview_image_url: Option<String>,
    pub original_url: String,
    pub video_formats: Vec<FormatVariant>,
    pub audio_formats: Vec<FormatVariant>,
}

impl MediaInfo {
    /// Look up a variant by id. Reels accept no id or the implicit `reel` id.
    pub fn variant(&self, format_id: Option<&str>) -> Option<FormatVariant> {
        match self.content_type {
            ContentType::ReelPage => match format_id {
                None | Some(REEL_FORMAT_ID) => Some(FormatVariant::reel()),
                Some(_) => None,
            },
            ContentType::VideoPage => {
                let id = format_id?;
                self.video_formats
                    .iter()
                    .chain(self.audio_formats.iter())
                    .find(|f| f.format_id == id)
                    .cloned()
            }
        }
    }

    /// Base name the filename is derived from
    pub fn filename_base(&self) -> Option<String> {
        match self.content_type {
            ContentType::VideoPage => self.title.clone(),
            ContentType::ReelPage => Some(format!(
                "{}_reel",
                self.title.as_deref().unwrap_or("instagram")
            )),
        }
    }

    pub fn from_video_response(resp: VideoInfoResponse, requested_url: &str) -> Self {
        let video_formats = resp
            .video_formats
            .into_iter()
            .map(|f| f.into_variant(MediaKind::Video))
            .collect();
        let audio_formats = resp
            .audio_formats
            .into_iter()
            .map(|f| f.into_variant(MediaKind::Audio))
            .collect();

        Self {
            content_type: ContentType::VideoPage,
            title: resp.title,
            channel: resp.channel,
            caption: None,
            duration_label: resp.duration_string,
            preview_image_url: resp.thumbnail,
            original_url: resp
                .original_url
                .unwrap_or_else(|| requested_url.to_string()),
            video_formats,
            audio_formats,
        }
    }

    pub fn from_reel_response(resp: ReelInfoResponse, requested_url: &str) -> Self {
        Self {
            content_type: ContentType::ReelPage,
            title: resp.uploader,
            channel: None,
            caption: resp.caption,
            duration_label: resp.duration_string,
            preview_image_url: resp.preview_image_url,
            original_url: resp
                .original_url
                .unwrap_or_else(|| requested_url.to_string()),
            video_formats: vec![FormatVariant::reel()],
            audio_formats: Vec::new(),
        }
    }
}

/// Format entry as the backend sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_str: Option<String>,
}

impl WireFormat {
    fn into_variant(self, kind: MediaKind) -> FormatVariant {
        let quality_label = non_empty(self.note)
            .or_else(|| non_empty(self.resolution))
            .unwrap_or_else(|| "N/A".to_string());
        let approx_size_label =
            non_empty(self.filesize_str).or_else(|| format_size_label(self.filesize));

        FormatVariant {
            format_id: self.format_id,
            quality_label,
            approx_size_label,
            file_extension: non_empty(self.ext),
            kind,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `GET /api/youtube/info` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfoResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration_string: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub video_formats: Vec<WireFormat>,
    #[serde(default)]
    pub audio_formats: Vec<WireFormat>,
}

/// `GET /api/instagram/info` body. The backend has used both snake and
/// camel case for some keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReelInfoResponse {
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, alias = "previewImageUrl", alias = "thumbnail")]
    pub preview_image_url: Option<String>,
    #[serde(default, alias = "originalUrl")]
    pub original_url: Option<String>,
    #[serde(default)]
    pub duration_string: Option<String>,
}

/// Parameters of a binary fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRequest {
    pub content_type: ContentType,
    pub url: String,
    pub format_id: Option<String>,
    pub kind: MediaKind,
    pub filename: String,
}

/// Raw media bytes plus their declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}
