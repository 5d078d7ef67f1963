//! Decoder for the header tail: axis labels, sub-images, timestamps and the
//! start of the pixel region.

use crate::diagnostics::{DiagnosticSink, diag};
use crate::error::{Result, SifError};
use crate::parser::cursor::{TokenCursor, parse_ascii};
use crate::parser::version_table::HIGHEST_KNOWN_VERSION;
use crate::types::metadata::Metadata;
use crate::types::subimage::SubImageGeometry;
use crate::utils::text::{parse_int_payload, split_label};

/// Lines between the Raman wavelength and the frame-axis label.
const TRAILING_HEADER_LINES: usize = 3;
/// Integers carried by the image-axis line.
const IMAGE_AXIS_VALUES: usize = 9;

// Positions inside the image-axis payload.
const AXIS_FRAMES: usize = 5;
const AXIS_SUBIMAGES: usize = 6;
const AXIS_TOTAL_LENGTH: usize = 7;
const AXIS_IMAGE_LENGTH: usize = 8;

/// Decodes axis labels through the data offset into `metadata`.
pub fn parse_layout(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    cursor
        .discard_lines(TRAILING_HEADER_LINES)
        .map_err(SifError::truncated("header trailer"))?;

    parse_axes(cursor, metadata, sink)?;
    parse_subimages(cursor, metadata, sink)?;
    parse_timestamps(cursor, metadata, sink)?;
    metadata.data_offset = resolve_data_offset(cursor, metadata, sink)?;
    diag!(
        sink,
        Debug,
        "pixel data starts at byte {:#x}",
        metadata.data_offset
    );
    Ok(())
}

fn read_axis<'a>(
    cursor: &mut TokenCursor<'a>,
    field: &'static str,
) -> Result<(String, &'a [u8])> {
    let line = cursor.read_line().map_err(SifError::truncated(field))?;
    Ok(split_label(line))
}

fn parse_axes(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    metadata.frame_axis = read_axis(cursor, "frame axis")?.0;
    metadata.data_type = read_axis(cursor, "data type")?.0;
    let (image_axis, payload) = read_axis(cursor, "image axis")?;
    metadata.image_axis = image_axis;

    let values = parse_int_payload(payload).ok_or_else(|| {
        SifError::MalformedAxis(format!(
            "non-numeric payload {:?}",
            String::from_utf8_lossy(payload)
        ))
    })?;
    if values.len() < IMAGE_AXIS_VALUES {
        return Err(SifError::MalformedAxis(format!(
            "expected {IMAGE_AXIS_VALUES} values, found {}",
            values.len()
        )));
    }
    if values.len() > IMAGE_AXIS_VALUES {
        diag!(
            sink,
            Debug,
            "image axis carries {} values, ignoring the extra ones",
            values.len()
        );
    }

    let count = |position: usize, name: &str| -> Result<usize> {
        usize::try_from(values[position])
            .map_err(|_| SifError::MalformedAxis(format!("{name} is {}", values[position])))
    };
    metadata.frame_count = count(AXIS_FRAMES, "frame count")?;
    metadata.subimage_count = count(AXIS_SUBIMAGES, "sub-image count")?;
    metadata.total_length = i32::try_from(values[AXIS_TOTAL_LENGTH]).unwrap_or(-1);
    metadata.image_length = i32::try_from(values[AXIS_IMAGE_LENGTH]).unwrap_or(-1);
    Ok(())
}

/// First six integers of a record line; missing or unparsable ones are `-1`.
fn record_values(line: &[u8]) -> [i32; 6] {
    let mut tokens = line
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty());
    std::array::from_fn(|_| {
        tokens
            .next()
            .and_then(parse_ascii::<i32>)
            .unwrap_or(-1)
    })
}

/// Reads `marker x0 y1 x1 y0 ybin xbin` records, one line per sub-image.
///
/// Anything after `xbin` on a record line is ignored.
fn parse_subimages(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    let count = metadata.subimage_count;
    if count == 0 {
        return Err(SifError::EmptyGeometry {
            width: 0,
            height: 0,
            subimages: 0,
        });
    }

    let mut subimages = Vec::new();
    subimages
        .try_reserve_exact(count)
        .map_err(|_| SifError::Allocation {
            what: "sub-images",
            count,
        })?;

    for index in 0..count {
        if cursor.is_at_end() {
            return Err(SifError::Truncated {
                field: "sub-image record",
                offset: cursor.position(),
            });
        }
        let marker = cursor.read_int();
        let record = cursor
            .read_line()
            .map_err(SifError::truncated("sub-image record"))?;
        let [x0, y1, x1, y0, ybin, xbin] = record_values(record);
        let sub = SubImageGeometry::builder()
            .index(index)
            .x0(x0)
            .y0(y0)
            .x1(x1)
            .y1(y1)
            .xbin(xbin)
            .ybin(ybin)
            .detector_width(metadata.detector_width)
            .detector_height(metadata.detector_height)
            .build()?;
        diag!(
            sink,
            Debug,
            "sub-image {index} (marker {marker}): ({x0},{y0})-({x1},{y1}) bin {xbin}x{ybin} -> {}x{}",
            sub.width,
            sub.height
        );
        subimages.push(sub);
    }

    let first = subimages[0];
    metadata.xbin = first.xbin;
    metadata.ybin = first.ybin;
    metadata.image_width = first.width;
    metadata.image_height = first.height;
    metadata.subimages = subimages;
    Ok(())
}

fn parse_timestamps(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    // the last record line is already consumed; only blank space remains
    cursor.skip_whitespace_and_newlines();

    let count = metadata.frame_count;
    let mut timestamps = Vec::new();
    timestamps
        .try_reserve_exact(count)
        .map_err(|_| SifError::Allocation {
            what: "timestamps",
            count,
        })?;

    for frame in 0..count {
        let line = cursor
            .read_line()
            .map_err(SifError::truncated("timestamps"))?;
        let timestamp = parse_ascii::<i64>(line).unwrap_or_else(|| {
            diag!(
                sink,
                Warning,
                "timestamp for frame {frame} unreadable: {:?}",
                String::from_utf8_lossy(line)
            );
            0
        });
        timestamps.push(timestamp);
    }
    metadata.timestamps = timestamps;
    Ok(())
}

/// Locates the first pixel byte after the timestamps.
///
/// A `0` line precedes the pixels directly. A `1` line in the newest layout is
/// followed by one index line per frame. Anything else is already pixel data,
/// so the cursor rewinds to where that line began.
fn resolve_data_offset(
    cursor: &mut TokenCursor<'_>,
    metadata: &Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<u64> {
    let before = cursor.position();
    let flag = cursor.read_line().ok().and_then(parse_ascii::<i32>);

    match flag {
        Some(0) => {}
        Some(1) if metadata.format_version == HIGHEST_KNOWN_VERSION => {
            cursor
                .discard_lines(metadata.frame_count)
                .map_err(SifError::truncated("per-frame index"))?;
        }
        other => {
            diag!(
                sink,
                Debug,
                "no data flag after timestamps ({other:?}); pixels start at byte {before}"
            );
            cursor.seek(before);
        }
    }
    Ok(cursor.position() as u64)
}
