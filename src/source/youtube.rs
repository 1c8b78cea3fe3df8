//! YouTube source implementation backed by yt-dlp.

use super::{AudioStream, StreamFormat, VideoDetails, VideoSource};
use crate::error::{Result, SelgError};
use async_trait::async_trait;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// YouTube video source.
pub struct YoutubeSource {
    video_id_regex: Regex,
}

impl YoutubeSource {
    pub fn new() -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Self { video_id_regex }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Check if this source can handle the given input.
    pub fn can_handle(&self, input: &str) -> bool {
        self.extract_video_id(input).is_some()
    }

    fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the yt-dlp `-J` payload into video details.
fn parse_video_details(video_id: &str, payload: &str) -> Result<VideoDetails> {
    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| SelgError::VideoSource(format!("Failed to parse yt-dlp output: {}", e)))?;

    let title = json["title"].as_str().unwrap_or("Unknown Title").to_string();

    let mut formats = Vec::new();
    if let Some(entries) = json["formats"].as_array() {
        for entry in entries {
            let Some(id) = entry["format_id"].as_str() else {
                continue;
            };
            // yt-dlp reports "none" for the codec a stream lacks; a missing
            // codec field means the stream cannot be assumed to carry it.
            let has_audio = entry["acodec"].as_str().is_some_and(|c| c != "none");
            let has_video = entry["vcodec"].as_str().is_some_and(|c| c != "none");

            formats.push(StreamFormat {
                id: id.to_string(),
                has_audio,
                has_video,
                audio_bitrate: entry["abr"].as_f64().map(|b| b.round() as u32),
                container: entry["ext"].as_str().unwrap_or("bin").to_string(),
                content_length: entry["filesize"]
                    .as_u64()
                    .or_else(|| entry["filesize_approx"].as_u64()),
            });
        }
    }

    Ok(VideoDetails {
        video_id: video_id.to_string(),
        title,
        formats,
    })
}

#[async_trait]
impl VideoSource for YoutubeSource {
    #[instrument(skip(self))]
    async fn resolve_formats(&self, video_id: &str) -> Result<VideoDetails> {
        let url = Self::watch_url(video_id);

        let output = Command::new("yt-dlp")
            .args(["-J", "--no-download", "--no-playlist", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SelgError::ToolNotFound("yt-dlp".to_string())
                } else {
                    SelgError::VideoSource(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SelgError::VideoSource(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        let payload = String::from_utf8_lossy(&output.stdout);
        parse_video_details(video_id, &payload)
    }

    #[instrument(skip(self, format), fields(format_id = %format.id))]
    async fn open_audio_stream(
        &self,
        video_id: &str,
        format: &StreamFormat,
    ) -> Result<AudioStream> {
        let url = Self::watch_url(video_id);
        debug!("Opening audio stream for {}", video_id);

        let child = Command::new("yt-dlp")
            .args([
                "-f",
                &format.id,
                "-o",
                "-",
                "--no-playlist",
                "--quiet",
                "--no-warnings",
                &url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SelgError::ToolNotFound("yt-dlp".to_string())
                } else {
                    SelgError::VideoSource(format!("Failed to start yt-dlp: {}", e))
                }
            })?;

        AudioStream::from_child(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let source = YoutubeSource::new();

        // Test various URL formats
        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );

        // Test invalid inputs
        assert_eq!(source.extract_video_id("not-a-video-id"), None);
        assert_eq!(source.extract_video_id(""), None);
    }

    #[test]
    fn test_can_handle() {
        let source = YoutubeSource::new();

        assert!(source.can_handle("dQw4w9WgXcQ"));
        assert!(source.can_handle("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!source.can_handle("/path/to/video.mp4"));
    }

    #[test]
    fn test_parse_video_details() {
        let payload = r#"{
            "title": "My Offer Video",
            "formats": [
                {"format_id": "18", "acodec": "mp4a.40.2", "vcodec": "avc1", "abr": 96.0, "ext": "mp4", "filesize": 9000000},
                {"format_id": "251", "acodec": "opus", "vcodec": "none", "abr": 141.5, "ext": "webm", "filesize": 1200000},
                {"format_id": "140", "acodec": "mp4a.40.2", "vcodec": "none", "abr": 129.5, "ext": "m4a", "filesize_approx": 1100000},
                {"format_id": "sb0", "acodec": "none", "vcodec": "none", "ext": "mhtml"},
                {"acodec": "opus", "vcodec": "none", "abr": 50.0, "ext": "webm"}
            ]
        }"#;

        let details = parse_video_details("abc123def45", payload).unwrap();
        assert_eq!(details.title, "My Offer Video");
        assert_eq!(details.video_id, "abc123def45");
        // The entry without a format_id is skipped
        assert_eq!(details.formats.len(), 4);

        let opus = &details.formats[1];
        assert!(opus.is_audio_only());
        assert_eq!(opus.audio_bitrate, Some(142));
        assert_eq!(opus.container, "webm");
        assert_eq!(opus.content_length, Some(1200000));

        let m4a = &details.formats[2];
        assert_eq!(m4a.content_length, Some(1100000));

        let muxed = &details.formats[0];
        assert!(muxed.has_audio && muxed.has_video);
        assert!(!muxed.is_audio_only());

        let storyboard = &details.formats[3];
        assert!(!storyboard.has_audio && !storyboard.has_video);
    }

    #[test]
    fn test_parse_video_details_rejects_bad_json() {
        let err = parse_video_details("abc123def45", "ERROR: not json").unwrap_err();
        assert!(matches!(err, SelgError::VideoSource(_)));
    }

    #[test]
    fn test_parse_video_details_without_formats() {
        let details = parse_video_details("abc123def45", r#"{"title": "No formats"}"#).unwrap();
        assert!(details.formats.is_empty());
    }
}
