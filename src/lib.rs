//! Framelab is a frame-processing pipeline: acquire raster frames, run per-frame transforms over
//! them and draw the results, driven by a cooperative loop.
//!
//! - Frames come from a [`FrameSource`] held by an [`AcquisitionSlot`]
//! - [`apply_transform`] runs one [`TransformSpec`] against the [`FrameRing`] history
//! - Results are drawn on a [`DisplaySurface`] ([`CpuSurface`] is provided)
//! - A [`LoopDriver`] ties the stages together behind a host [`Scheduler`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod config;
pub(crate) mod driver;
pub(crate) mod frame;
pub(crate) mod render;
pub(crate) mod source;
pub(crate) mod transform;

pub use crate::foundation::core::{
    Affine, BezPath, Dimensions, Point, Rect, Roi, Vec2, resolve_roi,
};
pub use crate::foundation::error::{FramelabError, FramelabResult};
pub use crate::foundation::math::{clamp_to_u8, hsl_to_rgb, luminance, mix64};

pub use crate::config::{
    DEFAULT_TARGET_FPS, ENV_RING_CAPACITY, ENV_TARGET_FPS, SessionConfig, SourceConfig,
};
pub use crate::driver::controls::{
    ControlEvent, ControlState, MAX_SEARCH_RADIUS, SliderParam, TransformEntry, reduce,
};
pub use crate::driver::loop_driver::{DriverOptions, DriverState, LoopDriver, TickReport};
pub use crate::driver::pipeline::{ComputedOutput, SurfaceSet, compute_frame, present_frame};
pub use crate::driver::scheduler::{CallbackHandle, CancelToken, ManualScheduler, Scheduler};
pub use crate::driver::stats::{DriverStats, FPS_SMOOTHING, FrameRateEstimator};
pub use crate::frame::buffer::PixelBuffer;
pub use crate::frame::ring::{DEFAULT_RING_CAPACITY, FrameRing, MAX_RING_CAPACITY};
pub use crate::render::composite::{PremulRgba8, over, over_in_place, premul_rgba8};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::motion::{MotionSummary, arrow_color, arrow_path, render_motion, summarize};
pub use crate::render::spectrum::{Gradient, colorize_field, render_spectrum};
pub use crate::render::{DisplaySurface, Label, PresentReport, RenderStyle, present_output};
pub use crate::source::FrameSource;
pub use crate::source::image_seq::ImageSequenceSource;
pub use crate::source::live::{LiveFeed, LiveFeedSource, Permission};
pub use crate::source::pattern::{PatternParams, PatternSource};
pub use crate::source::slot::{AcquisitionSlot, AcquisitionState};
pub use crate::source::svg::{SvgParams, SvgSource};
pub use crate::source::video::{VideoFileSource, VideoInfo};
pub use crate::transform::affine::{AffineParams, affine_transform};
pub use crate::transform::bandpass::{BandPassParams, MIN_BAND_PASS_HISTORY, band_pass_amplify};
pub use crate::transform::motion::{
    MotionField, MotionGate, MotionParams, MotionVector, estimate_motion,
};
pub use crate::transform::spectrum::{ScalarField, SpectrumParams, magnitude_spectrum};
pub use crate::transform::{TransformKind, TransformOutput, TransformSpec, apply_transform};
