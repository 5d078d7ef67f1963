//! Decoder for the SIF header from the signature through the Raman line.
//!
//! Header layout, in order:
//! - 36-byte signature, then one unused line
//! - tokenized acquisition settings with fixed padding runs
//! - detector type line, detector dimensions, original filename
//! - `<flag> <length>` followed by `length` bytes of annotation
//! - section marker, 8 padding bytes, two shutter times
//! - version-dependent lines (see [`version_policy`])
//! - calibration sub-version, structured calibration line, Raman line

use crate::diagnostics::{DiagnosticSink, diag};
use crate::error::{Result, SifError};
use crate::parser::cursor::{TokenCursor, parse_ascii};
use crate::parser::version_table::{VersionPolicy, version_policy};
use crate::types::metadata::Metadata;
use crate::utils::text::trimmed_len;

/// Signature every SIF file starts with.
pub const SIF_MAGIC: &[u8; 36] = b"Andor Technology Multi-Channel File\n";
/// Longest length-prefixed string accepted before falling back to a line read.
pub const MAX_STRING_LENGTH: usize = 1024;
/// Largest annotation blob kept in [`Metadata::annotation`].
pub const MAX_ANNOTATION_LENGTH: usize = 8192;

const SECTION_MARKER: i32 = 65538;
const CALIBRATION_EXTRA_LINE_VERSION: i32 = 65540;
const PICOSECONDS: f64 = 1e-12;

/// Decodes everything before the axis labels into `metadata`.
pub fn parse_header(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    check_magic(cursor)?;
    cursor
        .discard_line()
        .map_err(SifError::truncated("second header line"))?;

    parse_acquisition(cursor, metadata)?;
    parse_detector(cursor, metadata)?;
    parse_annotation(cursor, metadata, sink)?;
    parse_shutter(cursor, metadata, sink)?;

    let policy = version_policy(metadata.format_version);
    diag!(
        sink,
        Debug,
        "format version {} uses {:?}",
        metadata.format_version,
        policy
    );
    parse_version_sections(cursor, metadata, policy, sink)?;
    parse_calibration_lines(cursor, metadata, sink)
}

fn check_magic(cursor: &mut TokenCursor<'_>) -> Result<()> {
    let magic = cursor
        .read_fixed_binary(SIF_MAGIC.len())
        .map_err(SifError::truncated("signature"))?;
    if magic != SIF_MAGIC {
        return Err(SifError::BadMagic);
    }
    Ok(())
}

fn parse_acquisition(cursor: &mut TokenCursor<'_>, metadata: &mut Metadata) -> Result<()> {
    metadata.format_version = cursor.read_int();
    cursor.skip_ints(3);
    metadata.experiment_time = cursor.read_int();
    metadata.detector_temperature = cursor.read_float();
    cursor.skip_bytes(10);
    cursor.skip_ints(1);

    metadata.exposure_time = cursor.read_float();
    metadata.cycle_time = cursor.read_float();
    metadata.accumulated_cycle_time = cursor.read_float();
    metadata.accumulated_cycles = cursor.read_int();
    // NUL and space
    cursor.skip_bytes(2);

    metadata.stack_cycle_time = cursor.read_float();
    metadata.pixel_readout_time = cursor.read_float();
    cursor.skip_ints(2);
    metadata.gain_dac = cursor.read_float();
    cursor.skip_ints(2);
    metadata.gate_width = cursor.read_float();
    cursor.skip_ints(16);
    metadata.grating_blaze = cursor.read_float();

    cursor
        .discard_line()
        .map_err(SifError::truncated("acquisition settings"))
}

fn parse_detector(cursor: &mut TokenCursor<'_>, metadata: &mut Metadata) -> Result<()> {
    let detector = cursor
        .read_line()
        .map_err(SifError::truncated("detector type"))?;
    metadata.detector_type = lossy_trimmed(detector);

    metadata.detector_width = cursor.read_int();
    metadata.detector_height = cursor.read_int();
    cursor
        .discard_line()
        .map_err(SifError::truncated("detector dimensions"))?;

    metadata.original_filename = read_prefixed_string(cursor, "original filename")?;
    Ok(())
}

/// Reads `<length> <bytes>`, falling back to the whole line when the length is implausible.
fn read_prefixed_string(cursor: &mut TokenCursor<'_>, field: &'static str) -> Result<String> {
    let start = cursor.position();
    let length = cursor.read_int();
    if length > 0 && (length as usize) < MAX_STRING_LENGTH {
        if let Ok(bytes) = cursor.read_fixed_binary(length as usize) {
            return Ok(lossy_trimmed(bytes));
        }
    }
    cursor.seek(start);
    let line = cursor.read_line().map_err(SifError::truncated(field))?;
    Ok(lossy_trimmed(line))
}

fn parse_annotation(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    let _flag = cursor.read_int();
    let length = cursor.read_int();

    if length <= 0 {
        diag!(sink, Debug, "no annotation (declared length {length})");
        return Ok(());
    }

    let length = length as usize;
    if length > MAX_ANNOTATION_LENGTH {
        diag!(
            sink,
            Warning,
            "annotation of {length} bytes exceeds {MAX_ANNOTATION_LENGTH}; skipped"
        );
        cursor.skip_bytes(length);
        return Ok(());
    }

    let blob = cursor
        .read_fixed_binary(length)
        .map_err(SifError::truncated("annotation"))?;
    metadata.annotation = blob.to_vec();
    metadata.annotation_length = trimmed_len(blob);
    diag!(
        sink,
        Debug,
        "annotation: {} bytes, {} after trimming",
        length,
        metadata.annotation_length
    );
    Ok(())
}

fn parse_shutter(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    let marker_offset = cursor.position();
    let marker = cursor.read_int();
    if marker != SECTION_MARKER {
        diag!(
            sink,
            Warning,
            "expected section marker {SECTION_MARKER} near byte {marker_offset}, found {marker}"
        );
    }
    cursor.skip_bytes(8);

    let offset = cursor.position();
    metadata.shutter_time = [cursor.read_float(), cursor.read_float()];
    if metadata.shutter_time.iter().all(|t| t.is_nan()) {
        return Err(SifError::ShutterDesync { offset });
    }
    Ok(())
}

fn parse_version_sections(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    policy: VersionPolicy,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    cursor
        .discard_lines(policy.skip_lines)
        .map_err(SifError::truncated("version-specific lines"))?;

    if policy.spectrograph {
        metadata.spectrograph = read_spectrograph(cursor, sink);
    }

    if policy.gate_parameters {
        cursor
            .discard_line()
            .map_err(SifError::truncated("gate parameters"))?;
        for _ in 0..3 {
            cursor.read_float();
        }
        metadata.gate_gain = cursor.read_float();
        cursor.read_float();
        cursor.read_float();
        metadata.gate_delay = cursor.read_float() * PICOSECONDS;
        metadata.gate_width = cursor.read_float() * PICOSECONDS;

        cursor
            .discard_lines(policy.trailing_lines)
            .map_err(SifError::truncated("version-specific lines"))?;
    }
    Ok(())
}

/// The spectrograph name is the second token of its line.
fn read_spectrograph(cursor: &mut TokenCursor<'_>, sink: &dyn DiagnosticSink) -> String {
    let line = match cursor.read_line() {
        Ok(line) => line,
        Err(err) => {
            diag!(sink, Warning, "spectrograph line unavailable: {err}");
            return String::new();
        }
    };
    let name = String::from_utf8_lossy(line)
        .split_ascii_whitespace()
        .nth(1)
        .map(str::to_string);
    name.unwrap_or_else(|| {
        diag!(sink, Debug, "spectrograph line carries no name");
        String::new()
    })
}

fn parse_calibration_lines(
    cursor: &mut TokenCursor<'_>,
    metadata: &mut Metadata,
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    metadata.calibration_version = cursor.read_int();
    if metadata.calibration_version == CALIBRATION_EXTRA_LINE_VERSION {
        cursor
            .discard_line()
            .map_err(SifError::truncated("calibration header"))?;
    }

    metadata.calibration_line = match cursor.read_line() {
        Ok(line) => lossy_trimmed(line),
        Err(err) => {
            diag!(sink, Warning, "calibration line unavailable: {err}");
            String::new()
        }
    };

    // stale copy of the calibration, then an unused line
    cursor
        .discard_lines(2)
        .map_err(SifError::truncated("calibration history"))?;

    metadata.raman_excitation_wavelength = cursor
        .read_line()
        .ok()
        .and_then(parse_ascii::<f64>)
        .filter(|wavelength| !wavelength.is_nan());
    if metadata.raman_excitation_wavelength.is_none() {
        diag!(sink, Debug, "Raman excitation wavelength not available");
    }
    Ok(())
}

fn lossy_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
