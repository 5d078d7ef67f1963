//! Wavelength-calibration polynomials and their evaluated tables.

use itertools::Itertools;
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::fmt;

/// Maximum coefficients taken from the structured calibration line.
pub const MAX_GLOBAL_COEFFICIENTS: usize = 10;
/// Maximum coefficients taken for one frame from the annotation text.
pub const MAX_FRAME_COEFFICIENTS: usize = 20;

/// Polynomial coefficients (lowest degree first) for one 1-based frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameCalibration {
    pub frame: usize,
    pub coefficients: Vec<f64>,
}

impl FrameCalibration {
    pub fn coefficient_count(&self) -> usize {
        self.coefficients.len()
    }
}

impl fmt::Display for FrameCalibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}: [{}]", self.frame, self.coefficients.iter().join(", "))
    }
}

/// Evaluated calibration over pixel indices `1..=width`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Calibration {
    /// One curve shared by every frame.
    Global(Array1<f64>),
    /// One row per frame; frames without coefficients are all zero.
    PerFrame(Array2<f64>),
}

impl Calibration {
    pub fn width(&self) -> usize {
        match self {
            Calibration::Global(values) => values.len(),
            Calibration::PerFrame(values) => values.ncols(),
        }
    }
}

/// Evaluates `sum(c[i] * x^i)`.
pub fn evaluate_polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluates `coefficients` at the 1-based pixel indices `1..=width`.
pub fn evaluate_over_pixels(coefficients: &[f64], width: usize) -> Array1<f64> {
    Array1::from_iter((1..=width).map(|x| evaluate_polynomial(coefficients, x as f64)))
}

/// Builds the `frames x width` table for per-frame coefficients.
pub fn evaluate_frames(frames: &[Option<FrameCalibration>], width: usize) -> Array2<f64> {
    let mut table = Array2::zeros((frames.len(), width));
    for (mut row, frame) in table.outer_iter_mut().zip(frames) {
        if let Some(calibration) = frame {
            row.assign(&evaluate_over_pixels(&calibration.coefficients, width));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_polynomial() {
        let coefficients = [2.0, 3.0];
        assert_eq!(evaluate_polynomial(&coefficients, 1.0), 5.0);
        assert_eq!(evaluate_polynomial(&coefficients, 10.0), 32.0);
    }

    #[test]
    fn empty_polynomial_is_zero() {
        assert_eq!(evaluate_polynomial(&[], 7.0), 0.0);
    }

    #[test]
    fn quadratic_over_pixels() {
        let values = evaluate_over_pixels(&[1.0, 0.0, 0.5], 3);
        assert_eq!(values.to_vec(), vec![1.5, 3.0, 5.5]);
    }

    #[test]
    fn missing_frames_evaluate_to_zero() {
        let frames = vec![
            Some(FrameCalibration {
                frame: 1,
                coefficients: vec![400.0, 0.5],
            }),
            None,
        ];
        let table = evaluate_frames(&frames, 4);
        assert_eq!(table.dim(), (2, 4));
        assert_eq!(table.row(0).to_vec(), vec![400.5, 401.0, 401.5, 402.0]);
        assert!(table.row(1).iter().all(|&v| v == 0.0));
        assert_eq!(Calibration::PerFrame(table).width(), 4);
    }

    #[test]
    fn display_lists_coefficients() {
        let calibration = FrameCalibration {
            frame: 3,
            coefficients: vec![1.5, -2.0],
        };
        assert_eq!(calibration.to_string(), "frame 3: [1.5, -2]");
        assert_eq!(calibration.coefficient_count(), 2);
    }
}
