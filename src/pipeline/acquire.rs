//! Acquisition stage: resolve stream encodings and download the best
//! audio-only stream to local scratch storage.

use crate::error::{Result, SelgError};
use crate::pipeline::PipelineEnvelope;
use crate::source::{select_best_audio, VideoSource};
use crate::workspace::Workspace;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, instrument};

#[instrument(skip_all, fields(video_id = %envelope.video_id))]
pub(crate) async fn run(
    source: &dyn VideoSource,
    workspace: &Workspace,
    mut envelope: PipelineEnvelope,
) -> Result<PipelineEnvelope> {
    if envelope.is_cached() {
        info!("Stored record found, skipping acquisition");
        return Ok(envelope);
    }

    let video_id = envelope.video_id.clone();

    info!("Resolving stream formats");
    let details = source
        .resolve_formats(&video_id)
        .await
        .map_err(|e| acquisition_error(&video_id, e))?;

    debug!(
        "Provider listed {} formats for '{}'",
        details.formats.len(),
        details.title
    );

    let best = select_best_audio(&details.formats)
        .ok_or_else(|| SelgError::NoAudioAvailable(video_id.clone()))?
        .clone();

    info!(
        "Selected audio format {} ({} kbit/s, {})",
        best.id,
        best.audio_bitrate
            .map(|b| b.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        best.container
    );

    let file_name = format!(
        "{}_{}.{}",
        sanitize_title(&details.title),
        video_id,
        best.container
    );
    let audio_dir = workspace.ensure_audio_dir()?;
    let audio_path = audio_dir.join(&file_name);

    let mut stream = source
        .open_audio_stream(&video_id, &best)
        .await
        .map_err(|e| acquisition_error(&video_id, e))?;

    let pb = download_progress(best.content_length);
    let mut file = tokio::fs::File::create(&audio_path).await?;
    let mut buf = vec![0u8; 64 * 1024];
    let mut written: u64 = 0;

    let copied: std::io::Result<()> = loop {
        match stream.read(&mut buf).await {
            Ok(0) => break Ok(()),
            Ok(n) => {
                if let Err(e) = file.write_all(&buf[..n]).await {
                    break Err(e);
                }
                written += n as u64;
                pb.inc(n as u64);
            }
            Err(e) => break Err(e),
        }
    };
    pb.finish_and_clear();

    if let Err(e) = copied {
        let _ = std::fs::remove_file(&audio_path);
        return Err(SelgError::AcquisitionFailed {
            video_id,
            reason: format!("stream copy failed: {}", e),
        });
    }
    file.flush().await?;

    // EOF alone can hide a truncated download; the provider has to exit
    // cleanly as well.
    if let Err(e) = stream.finish().await {
        let _ = std::fs::remove_file(&audio_path);
        return Err(acquisition_error(&video_id, e));
    }

    info!("Saved {} bytes to {}", written, audio_path.display());

    envelope.title = Some(details.title);
    envelope.video_file = Some(audio_path);
    Ok(envelope)
}

/// Wrap a provider failure with the failing video id. `ToolNotFound`
/// passes through unchanged.
fn acquisition_error(video_id: &str, err: SelgError) -> SelgError {
    match err {
        SelgError::ToolNotFound(_) => err,
        other => SelgError::AcquisitionFailed {
            video_id: video_id.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Make a video title safe for file names.
///
/// Keeps ASCII alphanumerics, underscores, hyphens, and spaces, then
/// collapses whitespace runs into single underscores.
fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    let sanitized = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if sanitized.is_empty() {
        "audio".to_string()
    } else {
        sanitized
    }
}

fn download_progress(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.set_message("downloading audio");
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {bytes} {msg}")
                    .unwrap(),
            );
            pb.set_message("downloading audio");
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RecordStatus;
    use crate::source::{AudioStream, StreamFormat, VideoDetails};
    use async_trait::async_trait;

    #[test]
    fn test_sanitize_strips_and_collapses() {
        assert_eq!(
            sanitize_title("My Great VSL! (Official)"),
            "My_Great_VSL_Official"
        );
        assert_eq!(sanitize_title("  spaced   out  "), "spaced_out");
        assert_eq!(sanitize_title("keep_under-scores"), "keep_under-scores");
    }

    #[test]
    fn test_sanitize_drops_non_ascii() {
        assert_eq!(sanitize_title("Vidéo häßlich 🎥 title"), "Vido_hlich_title");
    }

    #[test]
    fn test_sanitize_falls_back_when_nothing_survives() {
        assert_eq!(sanitize_title("???!!!"), "audio");
        assert_eq!(sanitize_title(""), "audio");
    }

    struct StaticSource {
        title: String,
        formats: Vec<StreamFormat>,
        bytes: Vec<u8>,
    }

    #[async_trait]
    impl VideoSource for StaticSource {
        async fn resolve_formats(&self, video_id: &str) -> crate::error::Result<VideoDetails> {
            Ok(VideoDetails {
                video_id: video_id.to_string(),
                title: self.title.clone(),
                formats: self.formats.clone(),
            })
        }

        async fn open_audio_stream(
            &self,
            _video_id: &str,
            _format: &StreamFormat,
        ) -> crate::error::Result<AudioStream> {
            Ok(AudioStream::from_reader(Box::new(std::io::Cursor::new(
                self.bytes.clone(),
            ))))
        }
    }

    struct NoCallSource;

    #[async_trait]
    impl VideoSource for NoCallSource {
        async fn resolve_formats(&self, _video_id: &str) -> crate::error::Result<VideoDetails> {
            panic!("resolve_formats must not be called on the cached path");
        }

        async fn open_audio_stream(
            &self,
            _video_id: &str,
            _format: &StreamFormat,
        ) -> crate::error::Result<AudioStream> {
            panic!("open_audio_stream must not be called on the cached path");
        }
    }

    fn workspace(root: &std::path::Path) -> Workspace {
        Workspace::new(
            root.join("audio"),
            root.join("transcripts"),
            root.join("analysis"),
        )
    }

    #[tokio::test]
    async fn test_streams_audio_to_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = workspace(tmp.path());
        let source = StaticSource {
            title: "Demo Video".to_string(),
            formats: vec![StreamFormat {
                id: "251".to_string(),
                has_audio: true,
                has_video: false,
                audio_bitrate: Some(160),
                container: "webm".to_string(),
                content_length: Some(10),
            }],
            bytes: b"0123456789".to_vec(),
        };

        let envelope = PipelineEnvelope::new("abc123", RecordStatus::Fresh);
        let envelope = run(&source, &ws, envelope).await.unwrap();

        let path = envelope.video_file.unwrap();
        assert!(path.starts_with(ws.audio_dir()));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Demo_Video_abc123.webm"
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
        assert_eq!(envelope.title.as_deref(), Some("Demo Video"));
    }

    #[tokio::test]
    async fn test_cached_run_makes_no_provider_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = workspace(tmp.path());

        let envelope = PipelineEnvelope::new(
            "abc123",
            RecordStatus::Cached {
                transcript: "Hello world".to_string(),
                transcript_path: "/tmp/t.txt".to_string(),
            },
        );
        let envelope = run(&NoCallSource, &ws, envelope).await.unwrap();

        assert!(envelope.video_file.is_none());
        assert!(!ws.audio_dir().exists());
    }
}
