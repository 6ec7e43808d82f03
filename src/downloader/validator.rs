// URL classification for the supported page types
//
// Pure and synchronous: no network access, no hidden state.

use regex::Regex;

use super::errors::ValidationError;

lazy_static::lazy_static! {
    // watch?v=ID (v may appear anywhere in the query), youtu.be/ID,
    // /shorts/ID, /embed/ID, /live/ID, /v/ID
    static ref YOUTUBE_RE: Regex = Regex::new(
        r"^(?:https?://)?(?:(?:www|m|music)\.)?(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|shorts/|embed/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/]\S*)?$"
    ).unwrap();
    static ref REEL_RE: Regex = Regex::new(
        r"^https?://(?:www\.)?instagram\.com/reel/([A-Za-z0-9_-]+)/?(?:[?#]\S*)?$"
    ).unwrap();
}

/// Extract the 11-character video id from a recognized video URL
pub fn extract_video_id(raw: &str) -> Option<&str> {
    YOUTUBE_RE
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Validate a video page URL and return its canonical watch-page form
pub fn validate_youtube_url(raw: &str) -> Result<String, ValidationError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(ValidationError::Empty);
    }

    extract_video_id(candidate)
        .map(|id| format!("https://www.youtube.com/watch?v={}", id))
        .ok_or(ValidationError::BadFormat)
}

/// Validate a reel URL and return its canonical form
pub fn validate_reel_url(raw: &str) -> Result<String, ValidationError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(ValidationError::Empty);
    }

    REEL_RE
        .captures(candidate)
        .and_then(|caps| caps.get(1))
        .map(|code| format!("https://www.instagram.com/reel/{}/", code.as_str()))
        .ok_or(ValidationError::BadFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url_is_accepted() {
        assert_eq!(
            validate_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Ok("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_video_url_forms() {
        let accepted = [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc123",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=RD",
            "  https://www.youtube.com/watch?v=dQw4w9WgXcQ  ",
        ];
        for url in accepted {
            assert_eq!(
                validate_youtube_url(url),
                Ok("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
                "{url}"
            );
        }
    }

    #[test]
    fn test_bad_video_urls_are_rejected() {
        let rejected = [
            "not a url",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQX",
            "https://vimeo.com/123456",
            "https://www.youtube.com.evil.com/watch?v=dQw4w9WgXcQ",
            "https://www.instagram.com/reel/Cxyz123/",
        ];
        for url in rejected {
            assert_eq!(validate_youtube_url(url), Err(ValidationError::BadFormat), "{url}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_youtube_url(""), Err(ValidationError::Empty));
        assert_eq!(validate_youtube_url("   \t"), Err(ValidationError::Empty));
        assert_eq!(validate_reel_url(""), Err(ValidationError::Empty));
    }

    #[test]
    fn test_reel_urls() {
        assert_eq!(
            validate_reel_url("https://www.instagram.com/reel/Cxyz_1-2/"),
            Ok("https://www.instagram.com/reel/Cxyz_1-2/".to_string())
        );
        assert_eq!(
            validate_reel_url("http://instagram.com/reel/Cxyz?igsh=MWQ1"),
            Ok("https://www.instagram.com/reel/Cxyz/".to_string())
        );
        assert_eq!(
            validate_reel_url("https://www.instagram.com/p/Cxyz/"),
            Err(ValidationError::BadFormat)
        );
        assert_eq!(
            validate_reel_url("https://www.instagram.com/reel/"),
            Err(ValidationError::BadFormat)
        );
        assert_eq!(
            validate_reel_url("instagram.com/reel/Cxyz/"),
            Err(ValidationError::BadFormat)
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        for url in ["https://youtu.be/dQw4w9WgXcQ", "nope", ""] {
            assert_eq!(validate_youtube_url(url), validate_youtube_url(url));
        }
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abcdefghijk"),
            Some("abcdefghijk")
        );
        assert_eq!(extract_video_id("https://example.com"), None);
    }
}
