//! Session configuration: read once at startup, held in memory for the session.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    driver::{controls::ControlState, loop_driver::DriverOptions},
    foundation::error::{FramelabError, FramelabResult},
    frame::ring::{DEFAULT_RING_CAPACITY, MAX_RING_CAPACITY},
    render::RenderStyle,
    source::{
        FrameSource,
        image_seq::ImageSequenceSource,
        pattern::{PatternParams, PatternSource},
        svg::{SvgParams, SvgSource},
        video::VideoFileSource,
    },
    transform::{
        TransformSpec, affine::AffineParams, bandpass::BandPassParams, motion::MotionParams,
        spectrum::SpectrumParams,
    },
};

pub const ENV_RING_CAPACITY: &str = "FRAMELAB_RING_CAPACITY";
pub const ENV_TARGET_FPS: &str = "FRAMELAB_TARGET_FPS";
pub const DEFAULT_TARGET_FPS: f64 = 30.0;

fn default_sample_fps() -> f64 {
    10.0
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Pattern(PatternParams),
    Svg {
        path: PathBuf,
        #[serde(flatten)]
        params: SvgParams,
    },
    ImageSequence {
        dir: PathBuf,
        #[serde(default)]
        looping: bool,
    },
    Video {
        path: PathBuf,
        #[serde(default = "default_sample_fps")]
        sample_fps: f64,
        #[serde(default)]
        looping: bool,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Pattern(PatternParams::default())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ring_capacity: usize,
    pub target_fps: f64,
    pub source: SourceConfig,
    /// Transforms enabled at startup, in any order.
    pub transforms: Vec<TransformSpec>,
    pub render: RenderStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ring_capacity: DEFAULT_RING_CAPACITY,
            target_fps: DEFAULT_TARGET_FPS,
            source: SourceConfig::default(),
            transforms: vec![
                TransformSpec::Affine(AffineParams::default()),
                TransformSpec::Spectrum(SpectrumParams::default()),
                TransformSpec::Motion(MotionParams::default()),
                TransformSpec::BandPass(BandPassParams::default()),
            ],
            render: RenderStyle::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> FramelabResult<Self> {
        serde_json::from_str(s).map_err(|e| FramelabError::serde(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> FramelabResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FramelabError::serde(e.to_string()))
    }

    /// Read, apply environment overrides and validate.
    pub fn load(path: &Path) -> FramelabResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override from a key lookup. Unparsable and out-of-range values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(cap) = lookup(ENV_RING_CAPACITY)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| (1..=MAX_RING_CAPACITY).contains(n))
        {
            tracing::debug!(ring_capacity = cap, "ring capacity overridden from environment");
            self.ring_capacity = cap;
        }
        if let Some(fps) = lookup(ENV_TARGET_FPS)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|f| f.is_finite() && *f > 0.0)
        {
            tracing::debug!(target_fps = fps, "target fps overridden from environment");
            self.target_fps = fps;
        }
    }

    pub fn validate(&self) -> FramelabResult<()> {
        if !(1..=MAX_RING_CAPACITY).contains(&self.ring_capacity) {
            return Err(FramelabError::validation(format!(
                "ring_capacity must be in 1..={MAX_RING_CAPACITY}"
            )));
        }
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(FramelabError::validation(
                "target_fps must be finite and > 0",
            ));
        }
        match &self.source {
            SourceConfig::Pattern(p) => {
                if p.width == 0 || p.height == 0 {
                    return Err(FramelabError::validation(
                        "pattern width and height must be non-zero",
                    ));
                }
            }
            SourceConfig::Svg { params, .. } => {
                if params.width == 0 || params.height == 0 {
                    return Err(FramelabError::validation(
                        "svg width and height must be non-zero",
                    ));
                }
            }
            SourceConfig::ImageSequence { .. } => {}
            SourceConfig::Video { sample_fps, .. } => {
                if !sample_fps.is_finite() || *sample_fps <= 0.0 {
                    return Err(FramelabError::validation(
                        "video sample_fps must be finite and > 0",
                    ));
                }
            }
        }
        for t in &self.transforms {
            t.validate()?;
        }
        self.render.validate()
    }

    /// Host-time spacing of ticks at the target rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps)
    }

    pub fn build_source(&self) -> FramelabResult<Box<dyn FrameSource>> {
        Ok(match &self.source {
            SourceConfig::Pattern(p) => Box::new(PatternSource::new(p.clone())?),
            SourceConfig::Svg { path, params } => {
                Box::new(SvgSource::from_path(path, params.clone())?)
            }
            SourceConfig::ImageSequence { dir, looping } => {
                Box::new(ImageSequenceSource::new(dir, *looping))
            }
            SourceConfig::Video {
                path,
                sample_fps,
                looping,
            } => Box::new(VideoFileSource::new(path, *sample_fps, *looping)?),
        })
    }

    pub fn initial_controls(&self) -> ControlState {
        ControlState::new(self.transforms.iter().cloned())
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            ring_capacity: self.ring_capacity,
            style: self.render.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
