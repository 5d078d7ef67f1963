use crate::types::calibration::{self, Calibration, FrameCalibration};
use crate::types::subimage::SubImageGeometry;
use serde::Serialize;

/// Temperatures below this mean the sensor reported no reading.
const SENSOR_OFFLINE_BELOW: f64 = -900.0;

/// Decoded SIF header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    // Identity
    pub detector_type: String,
    pub original_filename: String,
    pub spectrograph: String,
    pub frame_axis: String,
    pub data_type: String,
    pub image_axis: String,

    // Format
    pub format_version: i32,
    pub calibration_version: i32,

    // Acquisition timing
    pub experiment_time: i32,
    pub exposure_time: f64,
    pub cycle_time: f64,
    pub accumulated_cycle_time: f64,
    pub accumulated_cycles: i32,
    pub stack_cycle_time: f64,
    pub pixel_readout_time: f64,
    pub shutter_time: [f64; 2],

    // Detector state
    pub detector_temperature: f64,
    pub gain_dac: f64,
    pub gate_width: f64,
    pub gate_gain: f64,
    pub gate_delay: f64,
    pub grating_blaze: f64,
    pub raman_excitation_wavelength: Option<f64>,

    // Geometry
    pub detector_width: i32,
    pub detector_height: i32,
    pub image_width: usize,
    pub image_height: usize,
    pub xbin: i32,
    pub ybin: i32,
    pub frame_count: usize,
    pub subimage_count: usize,
    pub total_length: i32,
    pub image_length: i32,
    pub subimages: Vec<SubImageGeometry>,

    // Annotation blob, kept verbatim
    #[serde(skip)]
    pub annotation: Vec<u8>,
    pub annotation_length: usize,

    // Calibration
    pub calibration_line: String,
    pub calibration_coefficients: Vec<f64>,
    pub frame_calibrations: Vec<Option<FrameCalibration>>,

    pub timestamps: Vec<i64>,
    pub data_offset: u64,
}

impl Metadata {
    /// Annotation text decoded lossily, limited to its processed length.
    pub fn annotation_text(&self) -> String {
        let end = self.annotation_length.min(self.annotation.len());
        String::from_utf8_lossy(&self.annotation[..end]).into_owned()
    }

    /// Samples per frame and sub-image, as stored in the pixel region.
    pub fn pixels_per_frame(&self) -> usize {
        self.image_width * self.image_height
    }

    pub fn has_frame_calibrations(&self) -> bool {
        !self.frame_calibrations.is_empty()
    }

    pub fn temperature_available(&self) -> bool {
        self.detector_temperature >= SENSOR_OFFLINE_BELOW
    }

    /// Width of the calibration axis: the image length when set, else the detector width.
    pub fn calibration_width(&self) -> usize {
        if self.image_length > 0 {
            self.image_length as usize
        } else {
            self.detector_width.max(0) as usize
        }
    }

    /// Evaluates the calibration polynomials over every pixel index.
    ///
    /// Returns `None` when the file carries no usable coefficients.
    pub fn calibration(&self) -> Option<Calibration> {
        let width = self.calibration_width();
        if self.has_frame_calibrations() && self.frame_count > 0 {
            Some(Calibration::PerFrame(calibration::evaluate_frames(
                &self.frame_calibrations,
                width,
            )))
        } else if !self.calibration_coefficients.is_empty() {
            Some(Calibration::Global(calibration::evaluate_over_pixels(
                &self.calibration_coefficients,
                width,
            )))
        } else {
            None
        }
    }
}
