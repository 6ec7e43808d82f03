// HTTP client for the resolver/extractor backend
//
// GET {base}/youtube/info?url=...            -> VideoInfoResponse
// GET {base}/youtube/download?url=&format_id=&type=&filename=  -> bytes
// GET {base}/instagram/info?url=...          -> ReelInfoResponse
// GET {base}/instagram/download?url=&filename=                 -> bytes
//
// Non-2xx answers carry `{"detail": ...}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::config::ClientConfig;
use super::errors::ResolveError;
use super::models::{
    BinaryPayload, BinaryRequest, ContentType, MediaInfo, MediaRequest, ReelInfoResponse,
    VideoInfoResponse,
};
use super::traits::ResolverBackend;
use super::utils::{build_http_client, join_api_url};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

pub struct HttpResolver {
    client: reqwest::Client,
    api_base_url: String,
}

impl HttpResolver {
    pub fn new(client: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ResolveError> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, config.api_base_url.clone()))
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ResolveError> {
        let endpoint = join_api_url(&self.api_base_url, path);
        let response = self.client.get(&endpoint).query(query).send().await?;
        check_status(response).await
    }
}

/// Turn a non-2xx response into `ResolveError::Remote`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ResolveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = parse_detail(&body);
    tracing::warn!("[Resolver] ✗ Backend answered {}: {:?}", status.as_u16(), detail);

    Err(ResolveError::Remote {
        status: status.as_u16(),
        detail,
    })
}

fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl ResolverBackend for HttpResolver {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_info(&self, request: &MediaRequest) -> Result<MediaInfo, ResolveError> {
        tracing::info!(
            "[Resolver] Fetching {} info for {}",
            request.content_type.label(),
            request.url
        );

        let response = self
            .get(request.content_type.info_path(), &[("url", request.url.as_str())])
            .await?;

        let info = match request.content_type {
            ContentType::VideoPage => {
                let body: VideoInfoResponse = response.json().await?;
                MediaInfo::from_video_response(body, &request.url)
            }
            ContentType::ReelPage => {
                let body: ReelInfoResponse = response.json().await?;
                MediaInfo::from_reel_response(body, &request.url)
            }
        };

        tracing::info!(
            "[Resolver] ✓ {} video / {} audio formats for {}",
            info.video_formats.len(),
            info.audio_formats.len(),
            request.url
        );
        Ok(info)
    }

    async fn fetch_binary(&self, request: &BinaryRequest) -> Result<BinaryPayload, ResolveError> {
        let mut query: Vec<(&str, &str)> = vec![("url", request.url.as_str())];
        if let Some(format_id) = request.format_id.as_deref() {
            query.push(("format_id", format_id));
        }
        if let Some(kind) = request.kind.as_query() {
            query.push(("type", kind));
        }
        query.push(("filename", request.filename.as_str()));

        tracing::info!(
            "[Resolver] Downloading {} (format {:?}) as {}",
            request.url,
            request.format_id,
            request.filename
        );

        let response = self
            .get(request.content_type.download_path(), &query)
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
        let bytes = response.bytes().await?.to_vec();

        tracing::info!(
            "[Resolver] ✓ Received {} bytes ({}) for {}",
            bytes.len(),
            content_type,
            request.filename
        );
        Ok(BinaryPayload {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::MediaKind;
    use mockito::Matcher;

    const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const REEL_URL: &str = "https://www.instagram.com/reel/Cxyz123/";

    fn resolver_for(server: &mockito::Server) -> HttpResolver {
        HttpResolver::new(reqwest::Client::new(), format!("{}/api", server.url()))
    }

    fn video_request() -> MediaRequest {
        MediaRequest {
            url: WATCH_URL.to_string(),
            content_type: ContentType::VideoPage,
        }
    }

    #[tokio::test]
    async fn fetch_video_info_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/youtube/info")
            .match_query(Matcher::UrlEncoded("url".into(), WATCH_URL.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "title": "Never Gonna Give You Up",
                    "channel": "Rick Astley",
                    "duration_string": "3:33",
                    "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg",
                    "original_url": WATCH_URL,
                    "video_formats": [
                        {"format_id": "v1", "ext": "mp4", "note": "1080p", "filesize_str": "450 MB"},
                        {"format_id": "v2", "ext": "mp4", "resolution": "1280x720"}
                    ],
                    "audio_formats": [
                        {"format_id": "a1", "ext": "m4a", "note": "medium"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let info = resolver_for(&server)
            .fetch_info(&video_request())
            .await
            .unwrap();

        assert_eq!(info.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(info.channel.as_deref(), Some("Rick Astley"));
        assert_eq!(info.duration_label.as_deref(), Some("3:33"));
        assert_eq!(info.video_formats.len(), 2);
        assert_eq!(info.video_formats[0].approx_size_label.as_deref(), Some("450 MB"));
        assert_eq!(info.audio_formats[0].format_id, "a1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_reel_info_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/instagram/info")
            .match_query(Matcher::UrlEncoded("url".into(), REEL_URL.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "Cxyz123",
                    "uploader": "cool_creator",
                    "caption": "Just a quick dance challenge!",
                    "previewImageUrl": "https://cdn.example.com/p.jpg",
                    "originalUrl": REEL_URL
                })
                .to_string(),
            )
            .create_async()
            .await;

        let request = MediaRequest {
            url: REEL_URL.to_string(),
            content_type: ContentType::ReelPage,
        };
        let info = resolver_for(&server).fetch_info(&request).await.unwrap();

        assert_eq!(info.title.as_deref(), Some("cool_creator"));
        assert_eq!(info.caption.as_deref(), Some("Just a quick dance challenge!"));
        assert_eq!(info.video_formats.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_info_remote_error_keeps_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/youtube/info")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "This video is private."}"#)
            .create_async()
            .await;

        let err = resolver_for(&server)
            .fetch_info(&video_request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::Remote {
                status: 400,
                detail: Some("This video is private.".to_string())
            }
        );
    }

    #[tokio::test]
    async fn fetch_info_remote_error_without_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/youtube/info")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = resolver_for(&server)
            .fetch_info(&video_request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::Remote {
                status: 502,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn fetch_info_invalid_json_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/youtube/info")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{not json")
            .create_async()
            .await;

        let err = resolver_for(&server)
            .fetch_info(&video_request())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Transport { .. }));
    }

    #[tokio::test]
    async fn fetch_info_unreachable_backend_is_transport_error() {
        let resolver = HttpResolver::new(reqwest::Client::new(), "http://127.0.0.1:1/api");
        let err = resolver.fetch_info(&video_request()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Transport { .. }));
    }

    #[tokio::test]
    async fn fetch_binary_sends_format_and_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/youtube/download")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), WATCH_URL.into()),
                Matcher::UrlEncoded("format_id".into(), "140".into()),
                Matcher::UrlEncoded("type".into(), "audio".into()),
                Matcher::UrlEncoded("filename".into(), "Song.m4a".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "audio/mp4")
            .with_body(vec![0u8, 1, 2, 3])
            .create_async()
            .await;

        let payload = resolver_for(&server)
            .fetch_binary(&BinaryRequest {
                content_type: ContentType::VideoPage,
                url: WATCH_URL.to_string(),
                format_id: Some("140".to_string()),
                kind: MediaKind::Audio,
                filename: "Song.m4a".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(payload.bytes, vec![0u8, 1, 2, 3]);
        assert_eq!(payload.content_type, "audio/mp4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_reel_binary_defaults_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/instagram/download")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), REEL_URL.into()),
                Matcher::UrlEncoded("filename".into(), "cool_creator_reel.mp4".into()),
            ]))
            .with_status(200)
            .with_body("reel-bytes")
            .create_async()
            .await;

        let payload = resolver_for(&server)
            .fetch_binary(&BinaryRequest {
                content_type: ContentType::ReelPage,
                url: REEL_URL.to_string(),
                format_id: None,
                kind: MediaKind::Reel,
                filename: "cool_creator_reel.mp4".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(payload.bytes, b"reel-bytes".to_vec());
        assert_eq!(payload.content_type, FALLBACK_CONTENT_TYPE);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_binary_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/youtube/download")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail": "An internal server error occurred during download: boom"}"#)
            .create_async()
            .await;

        let err = resolver_for(&server)
            .fetch_binary(&BinaryRequest {
                content_type: ContentType::VideoPage,
                url: WATCH_URL.to_string(),
                format_id: Some("22".to_string()),
                kind: MediaKind::Video,
                filename: "x.mp4".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Remote { status: 500, .. }));
    }

    #[test]
    fn parse_detail_variants() {
        assert_eq!(parse_detail(r#"{"detail":"nope"}"#), Some("nope".to_string()));
        assert_eq!(parse_detail(r#"{"detail":null}"#), None);
        assert_eq!(
            parse_detail(r#"{"detail":[{"msg":"field required"}]}"#),
            Some(r#"[{"msg":"field required"}]"#.to_string())
        );
        assert_eq!(parse_detail("plain text"), None);
    }
}
