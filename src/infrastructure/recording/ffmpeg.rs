//! FFmpeg-based clip recorder adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::ports::{ClipRecorder, RecordingError};
use crate::domain::transcription::{AudioData, AudioMimeType};

/// A capture in progress
struct ActiveCapture {
    child: Child,
    output: PathBuf,
}

/// Captures microphone clips with an `ffmpeg` child process.
///
/// Clips are Opus in an Ogg container, mono 16 kHz, tuned for speech.
pub struct FfmpegClipRecorder {
    capture: Mutex<Option<ActiveCapture>>,
    is_recording: AtomicBool,
}

impl FfmpegClipRecorder {
    pub fn new() -> Self {
        Self {
            capture: Mutex::new(None),
            is_recording: AtomicBool::new(false),
        }
    }

    /// Platform input device arguments
    fn input_args() -> Vec<String> {
        if cfg!(target_os = "macos") {
            vec!["-f".into(), "avfoundation".into(), "-i".into(), ":0".into()]
        } else if cfg!(windows) {
            vec!["-f".into(), "dshow".into(), "-i".into(), "audio=default".into()]
        } else {
            vec!["-f".into(), "pulse".into(), "-i".into(), "default".into()]
        }
    }

    fn build_ffmpeg_args(output_path: &Path) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string(), "-loglevel".into(), "error".into()];
        args.extend(Self::input_args());
        args.extend([
            "-ar".to_string(),
            "16000".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-c:a".to_string(),
            "libopus".to_string(),
            "-b:a".to_string(),
            "24k".to_string(),
            "-application".to_string(),
            "voip".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ]);
        args
    }

    fn spawn_ffmpeg(args: Vec<String>) -> Result<Child, RecordingError> {
        Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecordingError::RecorderNotFound
                } else {
                    RecordingError::StartFailed(e.to_string())
                }
            })
    }

    async fn read_audio_file(path: &Path) -> Result<AudioData, RecordingError> {
        let data = fs::read(path)
            .await
            .map_err(|e| RecordingError::ReadFailed(e.to_string()))?;

        if data.is_empty() {
            return Err(RecordingError::ReadFailed(
                "Recording file is empty".to_string(),
            ));
        }

        Ok(AudioData::new(data, AudioMimeType::Ogg))
    }

    /// Read a finished clip, then delete it from disk
    async fn take_clip(path: &Path) -> Result<AudioData, RecordingError> {
        let audio = Self::read_audio_file(path).await;
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete clip"),
        }
        audio
    }

    /// Ask ffmpeg to finalize the container and exit
    #[cfg(unix)]
    fn interrupt(child: &mut Child) -> Result<(), RecordingError> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), Signal::SIGINT)
                .map_err(|e| RecordingError::RecordingFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn interrupt(child: &mut Child) -> Result<(), RecordingError> {
        child
            .start_kill()
            .map_err(|e| RecordingError::RecordingFailed(e.to_string()))
    }

    async fn stderr_tail(child: &mut Child) -> String {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf)
            .lines()
            .last()
            .unwrap_or("unknown error")
            .to_string()
    }
}

impl Default for FfmpegClipRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipRecorder for FfmpegClipRecorder {
    async fn start(&self, output: &Path) -> Result<(), RecordingError> {
        let mut guard = self.capture.lock().await;
        if guard.is_some() {
            return Err(RecordingError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        // Stale clip from the previous cycle
        match fs::remove_file(output).await {
            Ok(()) => debug!(path = %output.display(), "Removed stale clip"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(RecordingError::StartFailed(e.to_string())),
        }

        let mut child = Self::spawn_ffmpeg(Self::build_ffmpeg_args(output))?;

        // ffmpeg exits immediately when the device cannot be opened
        if let Ok(Some(status)) = child.try_wait() {
            let detail = Self::stderr_tail(&mut child).await;
            return Err(if status.success() {
                RecordingError::NoAudioDevice
            } else {
                RecordingError::StartFailed(detail)
            });
        }

        *guard = Some(ActiveCapture {
            child,
            output: output.to_path_buf(),
        });
        self.is_recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<AudioData, RecordingError> {
        let mut capture = self
            .capture
            .lock()
            .await
            .take()
            .ok_or_else(|| RecordingError::RecordingFailed("No recording in progress".to_string()))?;
        self.is_recording.store(false, Ordering::SeqCst);

        Self::interrupt(&mut capture.child)?;
        let status = capture
            .child
            .wait()
            .await
            .map_err(|e| RecordingError::RecordingFailed(format!("FFmpeg failed: {}", e)))?;

        // SIGINT yields exit code 255 on some builds while still writing a valid file
        if !status.success() && status.code() != Some(255) {
            let detail = Self::stderr_tail(&mut capture.child).await;
            return Err(RecordingError::RecordingFailed(format!(
                "FFmpeg exited with error: {}",
                detail
            )));
        }

        Self::take_clip(&capture.output).await
    }

    async fn cancel(&self) -> Result<(), RecordingError> {
        let capture = self.capture.lock().await.take();
        self.is_recording.store(false, Ordering::SeqCst);

        if let Some(mut capture) = capture {
            let _ = capture.child.start_kill();
            let _ = capture.child.wait().await;
            let _ = fs::remove_file(&capture.output).await;
        }
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }
}
