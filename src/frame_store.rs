//! In-memory pixel buffer for decoded frames.

use crate::diagnostics::{DiagnosticSink, diag};
use crate::error::{Result, SifError};
use crate::parser::{read_tile_into, swap_sample_bytes};
use crate::types::tile::TileTable;
use ndarray::{Array3, ArrayView2, Axis};
use std::ops::Range;

/// A contiguous `frames x height x width` stack covering a range of frames.
///
/// Frame indices are always absolute; a partial load only answers for the
/// frames it holds.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameStore {
    frames: Option<Array3<f32>>,
    first_frame: usize,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_all(
        &mut self,
        data: &[u8],
        tiles: &TileTable,
        byte_swap: bool,
        sink: &dyn DiagnosticSink,
    ) -> Result<()> {
        self.load_range(data, tiles, 0..tiles.len(), byte_swap, sink)
    }

    pub fn load_single(
        &mut self,
        data: &[u8],
        tiles: &TileTable,
        index: usize,
        byte_swap: bool,
        sink: &dyn DiagnosticSink,
    ) -> Result<()> {
        self.load_range(data, tiles, index..index.saturating_add(1), byte_swap, sink)
    }

    /// Replaces the buffer with the frames in `range`.
    ///
    /// Short reads are zero-filled and reported; they never abort the load.
    pub fn load_range(
        &mut self,
        data: &[u8],
        tiles: &TileTable,
        range: Range<usize>,
        byte_swap: bool,
        sink: &dyn DiagnosticSink,
    ) -> Result<()> {
        self.unload();

        let frame_count = tiles.len();
        if range.start > range.end || (range.start >= frame_count && !range.is_empty()) {
            return Err(SifError::FrameOutOfRange {
                index: range.start,
                frame_count,
            });
        }
        if range.end > frame_count {
            return Err(SifError::FrameOutOfRange {
                index: range.end - 1,
                frame_count,
            });
        }

        let (height, width) = tiles
            .get(range.start)
            .or_else(|| tiles.get(0))
            .map_or((0, 0), |tile| (tile.height, tile.width));
        let count = range.len();
        let total = count
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .ok_or(SifError::Allocation {
                what: "pixel buffer",
                count: usize::MAX,
            })?;

        let mut samples = Vec::new();
        samples
            .try_reserve_exact(total)
            .map_err(|_| SifError::Allocation {
                what: "pixel buffer",
                count: total,
            })?;

        for tile in &tiles.as_slice()[range.clone()] {
            let present = read_tile_into(data, tile, &mut samples);
            if present < tile.pixel_count() {
                diag!(
                    sink,
                    Warning,
                    "frame {}: read {present} of {} samples at byte {}",
                    tile.frame_index,
                    tile.pixel_count(),
                    tile.offset
                );
            }
        }
        if byte_swap {
            swap_sample_bytes(&mut samples);
        }

        self.frames = Some(Array3::from_shape_vec((count, height, width), samples)?);
        self.first_frame = range.start;
        diag!(
            sink,
            Debug,
            "loaded frames {}..{} ({total} samples, byte swap {byte_swap})",
            range.start,
            range.end
        );
        Ok(())
    }

    /// Drops the buffer; a no-op when nothing is loaded.
    pub fn unload(&mut self) {
        self.frames = None;
        self.first_frame = 0;
    }

    pub fn is_loaded(&self) -> bool {
        self.frames.is_some()
    }

    /// Absolute frame indices currently held in memory.
    pub fn loaded_range(&self) -> Option<Range<usize>> {
        self.frames
            .as_ref()
            .map(|frames| self.first_frame..self.first_frame + frames.len_of(Axis(0)))
    }

    /// The whole loaded stack, indexed relative to the first loaded frame.
    pub fn stack(&self) -> Option<&Array3<f32>> {
        self.frames.as_ref()
    }

    pub fn get_frame(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        let frames = self.frames.as_ref()?;
        let local = index.checked_sub(self.first_frame)?;
        (local < frames.len_of(Axis(0))).then(|| frames.index_axis(Axis(0), local))
    }

    /// Reads one sample, returning 0.0 for anything outside the loaded data.
    pub fn get_pixel(&self, frame: usize, row: usize, col: usize) -> f32 {
        self.get_frame(frame)
            .and_then(|view| view.get((row, col)).copied())
            .unwrap_or(0.0)
    }

    /// Copies one frame in row-major order into the front of `dest`.
    pub fn copy_frame(&self, index: usize, dest: &mut [f32]) -> Result<()> {
        let view = self
            .get_frame(index)
            .ok_or(SifError::FrameUnavailable { index })?;
        let needed = view.len();
        if dest.len() < needed {
            return Err(SifError::BufferTooSmall {
                needed,
                provided: dest.len(),
            });
        }
        for (slot, value) in dest.iter_mut().zip(view.iter()) {
            *slot = *value;
        }
        Ok(())
    }
}
