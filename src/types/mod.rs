//! Type definitions for the SIF file format

pub mod calibration;
pub mod metadata;
pub mod subimage;
pub mod tile;

// Re-export the main types for convenience
pub use calibration::{Calibration, FrameCalibration};
pub use metadata::Metadata;
pub use subimage::SubImageGeometry;
pub use tile::{FrameTile, TileTable};
