//! Wavelength calibration from the structured header line or, for files
//! with per-frame calibration, from the annotation text.

use crate::diagnostics::{DiagnosticSink, diag};
use crate::parser::cursor::{MAX_FLOAT_TOKEN, parse_ascii};
use crate::types::calibration::{
    FrameCalibration, MAX_FRAME_COEFFICIENTS, MAX_GLOBAL_COEFFICIENTS,
};
use crate::types::metadata::Metadata;
use crate::utils::text::find_bytes;

/// Marker announcing per-frame calibration in the annotation.
pub const FRAME_MARKER: &[u8] = b"Calibration data for";
/// Only this many leading annotation bytes are searched for the marker.
pub const MARKER_WINDOW: usize = 20;

/// Fills the calibration fields of `metadata` from its header and annotation.
pub fn decode_calibration(metadata: &mut Metadata, sink: &dyn DiagnosticSink) {
    let end = metadata.annotation_length.min(metadata.annotation.len());
    let text = &metadata.annotation[..end];
    if has_frame_marker(text) {
        let frames: Vec<_> = (1..=metadata.frame_count)
            .map(|frame| frame_coefficients(text, frame))
            .collect();
        let found = frames.iter().flatten().count();
        diag!(
            sink,
            Debug,
            "per-frame calibration found for {found} of {} frames",
            metadata.frame_count
        );
        metadata.frame_calibrations = frames;
        metadata.calibration_coefficients.clear();
        return;
    }

    metadata.frame_calibrations.clear();
    metadata.calibration_coefficients = global_coefficients(&metadata.calibration_line, sink);
}

fn has_frame_marker(annotation: &[u8]) -> bool {
    let window = &annotation[..annotation.len().min(MARKER_WINDOW)];
    find_bytes(window, FRAME_MARKER, 0).is_some()
}

/// Parses up to ten whitespace-separated coefficients.
///
/// A single unparsable token discards the whole line.
fn global_coefficients(line: &str, sink: &dyn DiagnosticSink) -> Vec<f64> {
    let parsed: Option<Vec<f64>> = line
        .split_ascii_whitespace()
        .take(MAX_GLOBAL_COEFFICIENTS)
        .map(|token| token.parse().ok())
        .collect();
    parsed.unwrap_or_else(|| {
        diag!(
            sink,
            Warning,
            "calibration line {line:?} is not numeric; no global calibration"
        );
        Vec::new()
    })
}

/// Locates `Calibration data for frame <n>` and reads its comma-separated list.
fn frame_coefficients(text: &[u8], frame: usize) -> Option<FrameCalibration> {
    let needle = format!("Calibration data for frame {frame}");
    let needle = needle.as_bytes();

    let mut from = 0;
    let start = loop {
        let hit = find_bytes(text, needle, from)?;
        let end = hit + needle.len();
        // "frame 1" must not match "frame 12"
        if !text.get(end).is_some_and(u8::is_ascii_digit) {
            break end;
        }
        from = hit + 1;
    };

    let rest = &text[start..];
    let skip = rest
        .iter()
        .take_while(|b| b.is_ascii_whitespace() || **b == b':')
        .count();
    let rest = &rest[skip..];
    let line_end = rest
        .iter()
        .position(|b| *b == b'\r' || *b == b'\n')
        .unwrap_or(rest.len());

    let coefficients: Vec<f64> = rest[..line_end]
        .split(|b| *b == b',')
        .map_while(|token| {
            if token.len() > MAX_FLOAT_TOKEN {
                return None;
            }
            parse_ascii::<f64>(token)
        })
        .take(MAX_FRAME_COEFFICIENTS)
        .collect();

    (!coefficients.is_empty()).then_some(FrameCalibration {
        frame,
        coefficients,
    })
}
