use crate::error::{Result, SifError};
use bon::bon;
use serde::Serialize;

/// One rectangular detector region and its binning.
///
/// Records store their corners as `x0, y1, x1, y0` followed by `ybin, xbin`;
/// the field names here keep the geometric meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubImageGeometry {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub xbin: i32,
    pub ybin: i32,
    pub width: usize,
    pub height: usize,
}

#[bon]
impl SubImageGeometry {
    /// Validates a record against the detector and derives its pixel size.
    #[builder]
    pub fn new(
        index: usize,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        xbin: i32,
        ybin: i32,
        detector_width: i32,
        detector_height: i32,
    ) -> Result<Self> {
        let invalid = |reason: String| SifError::InvalidSubImage { index, reason };

        if xbin <= 0 || ybin <= 0 {
            return Err(invalid(format!("binning {xbin}x{ybin} is not positive")));
        }
        let inside = |lo: i32, hi: i32, limit: i32| 1 <= lo && lo <= hi && hi <= limit;
        if !inside(x0, x1, detector_width) || !inside(y0, y1, detector_height) {
            return Err(invalid(format!(
                "area ({x0},{y0})-({x1},{y1}) outside detector {detector_width}x{detector_height}"
            )));
        }

        let width = (1 + x1 - x0) / xbin;
        let height = (1 + y1 - y0) / ybin;
        if width <= 0 || height <= 0 {
            return Err(invalid(format!(
                "binned size {width}x{height} is empty (binning {xbin}x{ybin})"
            )));
        }

        Ok(Self {
            x0,
            y0,
            x1,
            y1,
            xbin,
            ybin,
            width: width as usize,
            height: height as usize,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
