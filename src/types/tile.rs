use bon::{Builder, bon};
use serde::Serialize;

/// Bytes per pixel sample; pixel data is always 32-bit float.
pub const BYTES_PER_SAMPLE: u64 = 4;

/// One frame's location inside the pixel region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Builder)]
pub struct FrameTile {
    pub offset: u64,
    pub width: usize,
    pub height: usize,
    pub frame_index: usize,
}

impl FrameTile {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// First byte past the samples this tile reads.
    pub fn end(&self) -> u64 {
        self.offset + self.pixel_count() as u64 * BYTES_PER_SAMPLE
    }
}

/// Per-frame byte offsets into the pixel region, one tile per frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TileTable {
    tiles: Vec<FrameTile>,
}

#[bon]
impl TileTable {
    /// Lays out `frame_count` consecutive frames starting at `data_offset`.
    ///
    /// Frames are `image_width * image_height * subimage_count` samples apart.
    #[builder]
    pub fn new(
        data_offset: u64,
        image_width: usize,
        image_height: usize,
        subimage_count: usize,
        frame_count: usize,
    ) -> Self {
        let stride = (image_width * image_height * subimage_count) as u64 * BYTES_PER_SAMPLE;
        let tiles = (0..frame_count)
            .map(|frame_index| {
                FrameTile::builder()
                    .offset(data_offset + frame_index as u64 * stride)
                    .width(image_width)
                    .height(image_height)
                    .frame_index(frame_index)
                    .build()
            })
            .collect();
        Self { tiles }
    }

    pub fn get(&self, frame_index: usize) -> Option<&FrameTile> {
        self.tiles.get(frame_index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameTile> {
        self.tiles.iter()
    }

    pub fn as_slice(&self) -> &[FrameTile] {
        &self.tiles
    }

    /// End of the last tile, i.e. the minimum stream length for all frames.
    pub fn required_len(&self) -> Option<u64> {
        self.tiles.last().map(FrameTile::end)
    }

    pub(crate) fn clear(&mut self) {
        self.tiles = Vec::new();
    }
}

impl<'a> IntoIterator for &'a TileTable {
    type Item = &'a FrameTile;
    type IntoIter = std::slice::Iter<'a, FrameTile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
