use crate::types::tile::{BYTES_PER_SAMPLE, FrameTile};
use winnow::{Parser, binary::le_f32, combinator::repeat, error::ContextError};

/// Parses `count` little-endian 32-bit float samples.
pub fn parse_samples(input: &mut &[u8], count: usize) -> Result<Vec<f32>, ContextError> {
    repeat(count, le_f32).parse_next(input)
}

/// Reverses the byte order of every sample in place.
pub fn swap_sample_bytes(samples: &mut [f32]) {
    for sample in samples {
        *sample = f32::from_bits(sample.to_bits().swap_bytes());
    }
}

/// Appends one tile's samples to `out`, zero-filling what the stream lacks.
///
/// Returns how many samples were actually present in `data`.
pub fn read_tile_into(data: &[u8], tile: &FrameTile, out: &mut Vec<f32>) -> usize {
    let wanted = tile.pixel_count();
    let start = usize::try_from(tile.offset).unwrap_or(usize::MAX).min(data.len());
    let available = (data.len() - start) / BYTES_PER_SAMPLE as usize;
    let present = wanted.min(available);

    let mut input = &data[start..];
    let present = match parse_samples(&mut input, present) {
        Ok(samples) => {
            out.extend(samples);
            present
        }
        Err(_) => 0,
    };
    out.resize(out.len() + (wanted - present), 0.0);
    present
}
