use crate::{
    foundation::{
        core::{BezPath, Dimensions, Point, Rect},
        error::{FramelabError, FramelabResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
    frame::buffer::PixelBuffer,
    render::{
        DisplaySurface, Label,
        composite::{over_in_place, premul_rgba8, wash_in_place},
    },
};

/// Double-buffered software surface.
///
/// Drawing goes to a premultiplied back buffer; vector primitives are rasterized by `vello_cpu`
/// into a scratch pixmap and composited over it. `present` publishes the back buffer and the
/// pending labels.
pub struct CpuSurface {
    dims: Dimensions,
    width: u16,
    height: u16,
    back: Vec<u8>,
    front: Vec<u8>,
    pending_labels: Vec<Label>,
    shown_labels: Vec<Label>,
    presents: u64,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("dims", &self.dims)
            .field("presents", &self.presents)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(dims: Dimensions) -> FramelabResult<Self> {
        let width: u16 = dims
            .width
            .try_into()
            .map_err(|_| FramelabError::evaluation("surface width exceeds u16"))?;
        let height: u16 = dims
            .height
            .try_into()
            .map_err(|_| FramelabError::evaluation("surface height exceeds u16"))?;
        let len = dims.byte_len()?;
        Ok(Self {
            dims,
            width,
            height,
            back: vec![0; len],
            front: vec![0; len],
            pending_labels: Vec::new(),
            shown_labels: Vec::new(),
            presents: 0,
        })
    }

    pub fn present_count(&self) -> u64 {
        self.presents
    }

    fn rasterize(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> FramelabResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        draw(&mut ctx);
        ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut scratch);
        over_in_place(&mut self.back, scratch.data_as_u8_slice(), 1.0)
    }
}

impl DisplaySurface for CpuSurface {
    fn dims(&self) -> Dimensions {
        self.dims
    }

    fn blit(&mut self, frame: &PixelBuffer) -> FramelabResult<()> {
        if frame.dims() != self.dims {
            return Err(FramelabError::evaluation(format!(
                "cannot blit {}x{} frame onto {}x{} surface",
                frame.width(),
                frame.height(),
                self.dims.width,
                self.dims.height
            )));
        }
        self.back.copy_from_slice(frame.data());
        premultiply_rgba8_in_place(&mut self.back);
        Ok(())
    }

    fn fade(&mut self, color: [u8; 4], alpha: f32) {
        wash_in_place(&mut self.back, premul_rgba8(color), alpha);
    }

    fn fill_path(&mut self, path: &BezPath, color: [u8; 4]) -> FramelabResult<()> {
        let cpu_path = bezpath_to_cpu(path);
        self.rasterize(|ctx| {
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_path(&cpu_path);
        })
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) -> FramelabResult<()> {
        let r = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
        self.rasterize(|ctx| {
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_rect(&r);
        })
    }

    fn draw_label(&mut self, label: Label) {
        self.pending_labels.push(label);
    }

    fn clear_labels(&mut self) {
        self.pending_labels.clear();
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.shown_labels.clone_from(&self.pending_labels);
        self.presents += 1;
    }

    fn snapshot(&self) -> PixelBuffer {
        let mut data = self.front.clone();
        unpremultiply_rgba8_in_place(&mut data);
        PixelBuffer::from_parts(self.dims, data)
    }

    fn labels(&self) -> &[Label] {
        &self.shown_labels
    }
}

fn color_to_cpu([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
