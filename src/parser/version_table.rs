//! Format-version policy: which optional header sections a version carries.

use std::ops::RangeInclusive;

/// Highest format version with a known layout. Files at this version may
/// carry a per-frame index between the timestamps and the pixel data.
pub const HIGHEST_KNOWN_VERSION: i32 = 65567;

/// Versions above this use the extended gate-parameter layout.
const EXTENDED_LAYOUT_ABOVE: i32 = 65565;

/// Lines skipped after the gate block of the extended layout.
const EXTENDED_TRAILING_LINES: usize = 8;

/// Header sections that follow the shutter times for one format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionPolicy {
    /// Whole lines discarded before anything else.
    pub skip_lines: usize,
    /// A spectrograph line follows the skipped lines.
    pub spectrograph: bool,
    /// Gate gain/delay/width floats follow the spectrograph line.
    pub gate_parameters: bool,
    /// Lines discarded after the gate parameters.
    pub trailing_lines: usize,
}

impl VersionPolicy {
    const fn skip(lines: usize) -> Self {
        Self {
            skip_lines: lines,
            spectrograph: false,
            gate_parameters: false,
            trailing_lines: 0,
        }
    }

    const fn with_spectrograph(lines: usize) -> Self {
        Self {
            skip_lines: lines,
            spectrograph: true,
            gate_parameters: false,
            trailing_lines: 0,
        }
    }
}

const VERSION_TABLE: &[(RangeInclusive<i32>, VersionPolicy)] = &[
    (65548..=65557, VersionPolicy::skip(2)),
    (65558..=65558, VersionPolicy::skip(5)),
    (65559..=65559, VersionPolicy::with_spectrograph(8)),
    (65564..=65564, VersionPolicy::with_spectrograph(8)),
    (65565..=65565, VersionPolicy::skip(15)),
];

const EXTENDED_POLICY: VersionPolicy = VersionPolicy {
    skip_lines: 8,
    spectrograph: true,
    gate_parameters: true,
    trailing_lines: EXTENDED_TRAILING_LINES,
};

/// Maps a format version onto its header policy.
///
/// Versions newer than every listed one use the extended layout as a best
/// effort; unlisted older versions carry no optional sections.
pub fn version_policy(version: i32) -> VersionPolicy {
    if version > EXTENDED_LAYOUT_ABOVE {
        return EXTENDED_POLICY;
    }
    VERSION_TABLE
        .iter()
        .find(|(range, _)| range.contains(&version))
        .map(|(_, policy)| *policy)
        .unwrap_or_default()
}
