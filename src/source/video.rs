use std::path::PathBuf;

use crate::{
    driver::scheduler::CancelToken,
    foundation::error::{FramelabError, FramelabResult},
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub duration_sec: f64,
}

/// Decodes a video file by seeking to successive sample times and capturing one frame each.
///
/// One extraction is in flight at a time. The driver's cancel token is checked before every seek.
/// It is checked again once the capture returns so that a host stopping the driver from another
/// thread discards the frame decoded meanwhile; on a single-threaded host that second check never
/// fires because `stop` cannot run while `read` blocks.
#[derive(Debug)]
pub struct VideoFileSource {
    name: String,
    path: PathBuf,
    sample_fps: f64,
    looping: bool,
    info: Option<VideoInfo>,
    next_index: u64,
    cancel: CancelToken,
}

impl VideoFileSource {
    pub fn new(path: impl Into<PathBuf>, sample_fps: f64, looping: bool) -> FramelabResult<Self> {
        if !sample_fps.is_finite() || sample_fps <= 0.0 {
            return Err(FramelabError::validation(
                "video sample_fps must be finite and > 0",
            ));
        }
        let path = path.into();
        Ok(Self {
            name: path.display().to_string(),
            path,
            sample_fps,
            looping,
            info: None,
            next_index: 0,
            cancel: CancelToken::new(),
        })
    }

    pub fn info(&self) -> Option<&VideoInfo> {
        self.info.as_ref()
    }
}

/// Seek time of sample `index`, or `None` once playback has ended.
pub(crate) fn sample_time(
    index: u64,
    sample_fps: f64,
    duration_sec: f64,
    looping: bool,
) -> Option<f64> {
    let t = index as f64 / sample_fps;
    if duration_sec <= 0.0 {
        return (index == 0).then_some(0.0);
    }
    if t < duration_sec {
        return Some(t);
    }
    looping.then(|| t.rem_euclid(duration_sec))
}

impl FrameSource for VideoFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> FramelabResult<()> {
        let info = ffmpeg::probe(&self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            width = info.width,
            height = info.height,
            duration_sec = info.duration_sec,
            "video probed"
        );
        self.info = Some(info);
        self.next_index = 0;
        Ok(())
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        let Some(info) = self.info.as_ref() else {
            return Err(FramelabError::acquisition("video source is not open"));
        };
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        let Some(t) = sample_time(
            self.next_index,
            self.sample_fps,
            info.duration_sec,
            self.looping,
        ) else {
            return Ok(None);
        };
        let data = ffmpeg::capture(&self.path, info, t)?;
        // Only reachable when the token is tripped from another thread.
        if self.cancel.is_cancelled() {
            tracing::debug!(t, "video capture abandoned after cancellation");
            return Ok(None);
        }
        self.next_index += 1;
        PixelBuffer::from_raw(info.width, info.height, data).map(Some)
    }

    fn close(&mut self) {
        self.info = None;
    }

    fn bind_cancel(&mut self, token: CancelToken) {
        self.cancel = token;
    }
}

#[cfg(feature = "media-ffmpeg")]
mod ffmpeg {
    use std::path::Path;

    use super::VideoInfo;
    use crate::foundation::error::{FramelabError, FramelabResult};

    pub(super) fn probe(path: &Path) -> FramelabResult<VideoInfo> {
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            streams: Vec<ProbeStream>,
            format: Option<ProbeFormat>,
        }

        let out = std::process::Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .map_err(|e| FramelabError::acquisition(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(FramelabError::acquisition(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| FramelabError::serde(format!("ffprobe json parse failed: {e}")))?;
        let stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| FramelabError::acquisition("no video stream found"))?;
        let width = stream
            .width
            .ok_or_else(|| FramelabError::acquisition("missing video width from ffprobe"))?;
        let height = stream
            .height
            .ok_or_else(|| FramelabError::acquisition("missing video height from ffprobe"))?;
        let duration_sec = parsed
            .format
            .as_ref()
            .and_then(|f| f.duration.as_ref())
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);

        Ok(VideoInfo {
            width,
            height,
            duration_sec,
        })
    }

    pub(super) fn capture(path: &Path, info: &VideoInfo, t: f64) -> FramelabResult<Vec<u8>> {
        let seek = format!("{t:.9}");
        let out = std::process::Command::new("ffmpeg")
            .args(["-v", "error", "-ss"])
            .arg(&seek)
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .output()
            .map_err(|e| FramelabError::acquisition(format!("failed to run ffmpeg: {e}")))?;
        if !out.status.success() {
            return Err(FramelabError::acquisition(format!(
                "ffmpeg capture failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        let expected = info.width as usize * info.height as usize * 4;
        if out.stdout.len() < expected {
            return Err(FramelabError::acquisition(format!(
                "decoded frame has {} bytes, expected {expected}",
                out.stdout.len()
            )));
        }
        let mut data = out.stdout;
        data.truncate(expected);
        Ok(data)
    }
}

#[cfg(not(feature = "media-ffmpeg"))]
mod ffmpeg {
    use std::path::Path;

    use super::VideoInfo;
    use crate::foundation::error::{FramelabError, FramelabResult};

    pub(super) fn probe(_path: &Path) -> FramelabResult<VideoInfo> {
        Err(FramelabError::acquisition(
            "video sources require the 'media-ffmpeg' feature",
        ))
    }

    pub(super) fn capture(_path: &Path, _info: &VideoInfo, _t: f64) -> FramelabResult<Vec<u8>> {
        Err(FramelabError::acquisition(
            "video sources require the 'media-ffmpeg' feature",
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/video.rs"]
mod tests;
