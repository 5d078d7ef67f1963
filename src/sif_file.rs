use crate::config::OpenOptions;
use crate::error::Result;
use crate::frame_store::FrameStore;
use crate::parser;
use crate::types::{Calibration, metadata::Metadata, tile::TileTable};
use crate::utils::file_utils::{read_binary_file_mmap, read_to_buffer};
use memmap2::Mmap;
use ndarray::{Array3, ArrayView2};
use std::io::Read;
use std::ops::Range;
use std::path::Path;

/// A decoded SIF file: header metadata, frame tiles and an optional pixel buffer.
///
/// The byte source stays attached so frames can be (re)loaded on demand.
pub struct SifFile<B = Mmap> {
    pub metadata: Metadata,
    pub tiles: TileTable,
    store: FrameStore,
    data: B,
    options: OpenOptions,
}

impl SifFile<Mmap> {
    /// Memory-map and decode the file at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self> {
        let mmap = read_binary_file_mmap(path)?;
        Self::from_bytes(mmap, options)
    }
}

impl SifFile<Vec<u8>> {
    /// Drain `reader` into memory and decode it.
    pub fn from_reader(reader: impl Read, options: OpenOptions) -> Result<Self> {
        let data = read_to_buffer(reader)?;
        Self::from_bytes(data, options)
    }
}

impl<B: AsRef<[u8]>> SifFile<B> {
    /// Decode the header in `data`; pixels are loaded only if `options` asks.
    pub fn from_bytes(data: B, options: OpenOptions) -> Result<Self> {
        let (metadata, tiles) = parser::decode(data.as_ref(), options.sink.as_ref())?;
        let mut file = Self {
            metadata,
            tiles,
            store: FrameStore::new(),
            data,
            options,
        };
        if file.options.load_pixels {
            file.load_all(file.options.byte_swap)?;
        }
        Ok(file)
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    pub fn frame_count(&self) -> usize {
        self.metadata.frame_count
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Load every frame, replacing whatever was loaded before.
    pub fn load_all(&mut self, byte_swap: bool) -> Result<()> {
        self.store.load_all(
            self.data.as_ref(),
            &self.tiles,
            byte_swap,
            self.options.sink.as_ref(),
        )
    }

    /// Load only frame `index`, replacing whatever was loaded before.
    pub fn load_single(&mut self, index: usize) -> Result<()> {
        self.store.load_single(
            self.data.as_ref(),
            &self.tiles,
            index,
            self.options.byte_swap,
            self.options.sink.as_ref(),
        )
    }

    /// Load the contiguous frames in `range`, replacing whatever was loaded before.
    pub fn load_range(&mut self, range: Range<usize>) -> Result<()> {
        self.store.load_range(
            self.data.as_ref(),
            &self.tiles,
            range,
            self.options.byte_swap,
            self.options.sink.as_ref(),
        )
    }

    pub fn unload(&mut self) {
        self.store.unload();
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn loaded_range(&self) -> Option<Range<usize>> {
        self.store.loaded_range()
    }

    /// The loaded frames as one `frames x height x width` array.
    pub fn stack(&self) -> Option<&Array3<f32>> {
        self.store.stack()
    }

    pub fn get_frame(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        self.store.get_frame(index)
    }

    /// Sample at `(row, col)` of `frame`, or 0.0 when it is not loaded or out of range.
    pub fn get_pixel(&self, frame: usize, row: usize, col: usize) -> f32 {
        self.store.get_pixel(frame, row, col)
    }

    pub fn copy_frame(&self, index: usize, dest: &mut [f32]) -> Result<()> {
        self.store.copy_frame(index, dest)
    }

    pub fn calibration(&self) -> Option<Calibration> {
        self.metadata.calibration()
    }

    /// Release every decoded allocation. Safe to call more than once.
    pub fn close(&mut self) {
        self.store.unload();
        self.tiles.clear();
        self.metadata.subimages = Vec::new();
        self.metadata.timestamps = Vec::new();
        self.metadata.frame_calibrations = Vec::new();
        self.metadata.annotation = Vec::new();
        self.metadata.annotation_length = 0;
    }
}
