//! SIF stream decoding

mod calibration_parser;
pub mod cursor;
mod header_parser;
mod layout_parser;
pub mod pixel_parser;
pub mod version_table;

pub use calibration_parser::decode_calibration;
pub use header_parser::parse_header;
pub use layout_parser::parse_layout;
pub use pixel_parser::{parse_samples, read_tile_into, swap_sample_bytes};

use crate::diagnostics::{DiagnosticSink, diag};
use crate::error::{Result, SifError};
use crate::types::{metadata::Metadata, tile::TileTable};
use cursor::TokenCursor;

/// Decodes the header of `data` and lays out one tile per frame.
///
/// Pixel samples are not touched; only the header region is read.
pub fn decode(data: &[u8], sink: &dyn DiagnosticSink) -> Result<(Metadata, TileTable)> {
    let mut cursor = TokenCursor::new(data);
    let mut metadata = Metadata::default();

    parse_header(&mut cursor, &mut metadata, sink)?;
    parse_layout(&mut cursor, &mut metadata, sink)?;

    if metadata.pixels_per_frame() == 0 {
        return Err(SifError::EmptyGeometry {
            width: metadata.image_width,
            height: metadata.image_height,
            subimages: metadata.subimage_count,
        });
    }

    let tiles = TileTable::builder()
        .data_offset(metadata.data_offset)
        .image_width(metadata.image_width)
        .image_height(metadata.image_height)
        .subimage_count(metadata.subimage_count)
        .frame_count(metadata.frame_count)
        .build();

    if let Some(required) = tiles.required_len() {
        let available = data.len() as u64;
        if available < required {
            diag!(
                sink,
                Warning,
                "stream holds {available} bytes but {} frames need {required}; missing samples read as zero",
                tiles.len()
            );
        }
    }

    decode_calibration(&mut metadata, sink);
    diag!(
        sink,
        Info,
        "decoded SIF v{}: {} frames of {}x{}",
        metadata.format_version,
        metadata.frame_count,
        metadata.image_width,
        metadata.image_height
    );
    Ok((metadata, tiles))
}
