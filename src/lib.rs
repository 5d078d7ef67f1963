//! Reader for Andor SIF multi-channel camera files.
//!
//! ```no_run
//! use sif_reader::{OpenOptions, SifFile};
//!
//! # fn main() -> sif_reader::Result<()> {
//! let mut sif = SifFile::open_with("spectrum.sif", OpenOptions::default())?;
//! println!("{} frames of {}x{}", sif.frame_count(), sif.metadata.image_width, sif.metadata.image_height);
//! sif.load_single(0)?;
//! let first = sif.get_pixel(0, 0, 0);
//! # let _ = first;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frame_store;
pub mod parser;
pub mod sif_file;
pub mod types;
pub mod utils;

pub use config::OpenOptions;
pub use diagnostics::{DiagnosticSink, LogSink, RecordingSink, Severity};
pub use error::{CursorError, Result, SifError};
pub use frame_store::FrameStore;
pub use sif_file::SifFile;
pub use types::{
    Calibration, FrameCalibration, FrameTile, Metadata, SubImageGeometry, TileTable,
};
