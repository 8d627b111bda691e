//! One tick's work, split into a pure compute step and a present step that only touches surfaces.

use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    foundation::{core::Dimensions, error::FramelabResult},
    frame::ring::FrameRing,
    render::{DisplaySurface, PresentReport, RenderStyle, cpu::CpuSurface, present_output},
    transform::{TransformKind, TransformOutput, TransformSpec, apply_transform},
};

/// Result of one transform for one tick. `output` is `None` when the transform was skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedOutput {
    pub kind: TransformKind,
    pub output: Option<TransformOutput>,
}

/// Run every transform of the snapshot against the ring. Never fails: a transform error is
/// logged and that transform yields nothing for this tick.
pub fn compute_frame(specs: &[TransformSpec], history: &FrameRing) -> Vec<ComputedOutput> {
    specs
        .iter()
        .map(|spec| {
            let kind = spec.kind();
            let output = match apply_transform(spec, history) {
                Ok(Some(out)) => Some(out),
                Ok(None) => {
                    tracing::debug!(
                        transform = kind.as_str(),
                        buffered = history.len(),
                        needed = kind.min_history(),
                        "transform skipped: insufficient history"
                    );
                    None
                }
                Err(err) => {
                    tracing::warn!(transform = kind.as_str(), %err, "transform failed");
                    None
                }
            };
            ComputedOutput { kind, output }
        })
        .collect()
}

type SurfaceFactory = Box<dyn FnMut(Dimensions) -> FramelabResult<Box<dyn DisplaySurface>>>;

/// One display surface per transform view, all sized to the current session's frames.
pub struct SurfaceSet {
    factory: SurfaceFactory,
    dims: Option<Dimensions>,
    surfaces: BTreeMap<TransformKind, Box<dyn DisplaySurface>>,
}

impl std::fmt::Debug for SurfaceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSet")
            .field("dims", &self.dims)
            .field("views", &self.surfaces.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl SurfaceSet {
    pub fn new(
        factory: impl FnMut(Dimensions) -> FramelabResult<Box<dyn DisplaySurface>> + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            dims: None,
            surfaces: BTreeMap::new(),
        }
    }

    /// Surfaces backed by [`CpuSurface`].
    pub fn cpu() -> Self {
        Self::new(|dims| Ok(Box::new(CpuSurface::new(dims)?) as Box<dyn DisplaySurface>))
    }

    pub fn dims(&self) -> Option<Dimensions> {
        self.dims
    }

    pub fn get(&self, kind: TransformKind) -> Option<&dyn DisplaySurface> {
        self.surfaces.get(&kind).map(|s| &**s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformKind, &dyn DisplaySurface)> + '_ {
        self.surfaces.iter().map(|(k, s)| (*k, &**s))
    }

    /// Drop every surface. They are recreated at the next frame's size.
    pub fn reset(&mut self) {
        self.surfaces.clear();
        self.dims = None;
    }

    fn surface_for(
        &mut self,
        kind: TransformKind,
        dims: Dimensions,
    ) -> FramelabResult<&mut Box<dyn DisplaySurface>> {
        if self.dims != Some(dims) {
            self.surfaces.clear();
            self.dims = Some(dims);
        }
        let surface = match self.surfaces.entry(kind) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert((self.factory)(dims)?),
        };
        Ok(surface)
    }
}

/// Draw each computed output on its view. Views whose transform was skipped still get their
/// static chrome. A drawing failure is logged and the view is left as it was.
pub fn present_frame(
    surfaces: &mut SurfaceSet,
    dims: Dimensions,
    outputs: &[ComputedOutput],
    style: &RenderStyle,
) -> Vec<PresentReport> {
    let mut reports = Vec::with_capacity(outputs.len());
    for computed in outputs {
        let result = surfaces
            .surface_for(computed.kind, dims)
            .and_then(|surface| {
                present_output(&mut **surface, computed.kind, computed.output.as_ref(), style)
            });
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                tracing::warn!(view = computed.kind.as_str(), %err, "present failed");
            }
        }
    }
    reports
}

#[cfg(test)]
#[path = "../../tests/unit/driver/pipeline.rs"]
mod tests;
