//! Video source abstraction for Selg.
//!
//! Provides a trait-based interface for resolving a remote video's stream
//! encodings and opening its audio as a byte stream.

mod youtube;

pub use youtube::YoutubeSource;

use crate::error::{Result, SelgError};
use async_trait::async_trait;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::process::Child;

/// One stream encoding a provider offers for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFormat {
    /// Provider-side format identifier.
    pub id: String,
    pub has_audio: bool,
    pub has_video: bool,
    /// Average audio bitrate in kbit/s, when the provider reports one.
    pub audio_bitrate: Option<u32>,
    /// Container extension (webm, m4a, ...).
    pub container: String,
    /// Stream size in bytes, when known ahead of download.
    pub content_length: Option<u64>,
}

impl StreamFormat {
    /// Whether this encoding carries audio and nothing else.
    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }
}

/// Title and available stream encodings for a video.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub formats: Vec<StreamFormat>,
}

/// Pick the audio-only format with the highest bitrate.
///
/// Unknown bitrates rank below any known bitrate. Ties keep the format
/// the provider listed first.
pub fn select_best_audio(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    let mut best: Option<&StreamFormat> = None;
    for format in formats.iter().filter(|f| f.is_audio_only()) {
        match best {
            None => best = Some(format),
            Some(current) if format.audio_bitrate > current.audio_bitrate => best = Some(format),
            Some(_) => {}
        }
    }
    best
}

/// A live audio byte stream from a provider.
///
/// Wraps the provider subprocess so the bytes can be read with ordinary
/// async IO. Callers must invoke [`AudioStream::finish`] after draining the
/// stream; EOF alone does not prove the provider exited cleanly, and a
/// truncated download would otherwise go unnoticed.
pub struct AudioStream {
    reader: Box<dyn AsyncRead + Send + Unpin>,
    child: Option<Child>,
}

impl AudioStream {
    /// Wrap a spawned provider process, taking ownership of its stdout.
    pub fn from_child(mut child: Child) -> Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SelgError::VideoSource("stream process has no stdout".to_string()))?;
        Ok(Self {
            reader: Box::new(stdout),
            child: Some(child),
        })
    }

    /// Wrap a plain reader. No exit status to verify.
    pub fn from_reader(reader: Box<dyn AsyncRead + Send + Unpin>) -> Self {
        Self {
            reader,
            child: None,
        }
    }

    /// Wait for the provider to exit and surface a non-zero status.
    pub async fn finish(mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Drain stderr to EOF before waiting so the child can never block
        // on a full pipe.
        let mut stderr_output = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            use tokio::io::AsyncReadExt;
            let _ = stderr.read_to_string(&mut stderr_output).await;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(SelgError::VideoSource(format!(
                "stream provider exited with {}: {}",
                status,
                stderr_output.trim()
            )));
        }
        Ok(())
    }
}

impl AsyncRead for AudioStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.reader).poll_read(cx, buf)
    }
}

/// Trait for video stream providers.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Resolve the title and available stream encodings for a video.
    async fn resolve_formats(&self, video_id: &str) -> Result<VideoDetails>;

    /// Open the audio byte stream for a previously resolved format.
    async fn open_audio_stream(&self, video_id: &str, format: &StreamFormat)
        -> Result<AudioStream>;
}

/// Parse user input (URL or bare ID) into a video ID.
pub fn parse_input(input: &str) -> Option<String> {
    YoutubeSource::new().extract_video_id(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str, has_audio: bool, has_video: bool, abr: Option<u32>) -> StreamFormat {
        StreamFormat {
            id: id.to_string(),
            has_audio,
            has_video,
            audio_bitrate: abr,
            container: "webm".to_string(),
            content_length: None,
        }
    }

    #[test]
    fn test_select_highest_bitrate_audio_only() {
        let formats = vec![
            format("muxed", true, true, Some(192)),
            format("low", true, false, Some(48)),
            format("high", true, false, Some(160)),
            format("video", false, true, None),
        ];

        let best = select_best_audio(&formats).unwrap();
        assert_eq!(best.id, "high");
    }

    #[test]
    fn test_select_keeps_first_on_tie() {
        let formats = vec![
            format("first", true, false, Some(128)),
            format("second", true, false, Some(128)),
        ];

        assert_eq!(select_best_audio(&formats).unwrap().id, "first");
    }

    #[test]
    fn test_unknown_bitrate_ranks_lowest() {
        let formats = vec![
            format("unknown", true, false, None),
            format("known", true, false, Some(1)),
        ];

        assert_eq!(select_best_audio(&formats).unwrap().id, "known");
    }

    #[test]
    fn test_all_unknown_bitrates_keeps_first() {
        let formats = vec![
            format("a", true, false, None),
            format("b", true, false, None),
        ];

        assert_eq!(select_best_audio(&formats).unwrap().id, "a");
    }

    #[test]
    fn test_no_audio_only_formats() {
        let formats = vec![
            format("muxed", true, true, Some(192)),
            format("video", false, true, None),
        ];

        assert!(select_best_audio(&formats).is_none());
        assert!(select_best_audio(&[]).is_none());
    }

    #[tokio::test]
    async fn test_audio_stream_from_reader_reads_and_finishes() {
        use tokio::io::AsyncReadExt;

        let bytes: &[u8] = b"fake audio bytes";
        let mut stream = AudioStream::from_reader(Box::new(bytes));

        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"fake audio bytes");

        stream.finish().await.unwrap();
    }
}
