use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{FramelabError, FramelabResult},
    frame::buffer::PixelBuffer,
    source::FrameSource,
};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Plays back a directory of still images, decoded on `open` in file-name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    name: String,
    dir: PathBuf,
    looping: bool,
    frames: Vec<PixelBuffer>,
    cursor: usize,
}

impl ImageSequenceSource {
    pub fn new(dir: impl Into<PathBuf>, looping: bool) -> Self {
        let dir = dir.into();
        Self {
            name: dir.display().to_string(),
            dir,
            looping,
            frames: Vec::new(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

pub(crate) fn list_images(dir: &Path) -> FramelabResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry.context("read directory entry")?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub(crate) fn load_image(path: &Path) -> FramelabResult<PixelBuffer> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw())
}

impl FrameSource for ImageSequenceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> FramelabResult<()> {
        let paths = list_images(&self.dir)?;
        if paths.is_empty() {
            return Err(FramelabError::acquisition(format!(
                "no images found in '{}'",
                self.dir.display()
            )));
        }
        let mut frames: Vec<PixelBuffer> = Vec::with_capacity(paths.len());
        for path in &paths {
            let frame = load_image(path)?;
            if let Some(first) = frames.first().map(PixelBuffer::dims)
                && first != frame.dims()
            {
                return Err(FramelabError::acquisition(format!(
                    "image '{}' is {}x{}, sequence is {}x{}",
                    path.display(),
                    frame.width(),
                    frame.height(),
                    first.width,
                    first.height
                )));
            }
            frames.push(frame);
        }
        tracing::debug!(dir = %self.dir.display(), frames = frames.len(), "image sequence loaded");
        self.frames = frames;
        self.cursor = 0;
        Ok(())
    }

    fn read(&mut self) -> FramelabResult<Option<PixelBuffer>> {
        if self.frames.is_empty() {
            return Err(FramelabError::acquisition("image sequence is not open"));
        }
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Ok(None);
            }
            self.cursor = 0;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/image_seq.rs"]
mod tests;
