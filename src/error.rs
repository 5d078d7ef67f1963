//! Error types for SIF decoding and frame access.

use thiserror::Error;

/// Failure of a single token-cursor read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The stream ended before the requested data was available.
    #[error("unexpected end of stream at byte {offset} while reading {wanted}")]
    UnexpectedEof { offset: usize, wanted: &'static str },
}

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum SifError {
    /// An error originating from I/O operations (opening or mapping the file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first 36 bytes are not the Andor multi-channel signature.
    #[error("Bad magic: stream does not start with the Andor SIF signature")]
    BadMagic,

    /// A structurally required header field could not be read.
    #[error("Truncated header: {field} missing at byte {offset}")]
    Truncated { field: &'static str, offset: usize },

    /// Neither shutter time parsed, so the cursor lost track of the layout.
    #[error("Header desynchronised: shutter times unreadable at byte {offset}")]
    ShutterDesync { offset: usize },

    /// The image-axis line does not carry the expected numeric payload.
    #[error("Malformed image axis: {0}")]
    MalformedAxis(String),

    /// A sub-image record describes an impossible region.
    #[error("Invalid sub-image {index}: {reason}")]
    InvalidSubImage { index: usize, reason: String },

    /// The derived image has no pixels, so no frame can be located.
    #[error("Empty image geometry: {width}x{height} with {subimages} sub-images")]
    EmptyGeometry {
        width: usize,
        height: usize,
        subimages: usize,
    },

    /// A buffer sized from header counts could not be allocated.
    #[error("Allocation of {count} elements for {what} failed")]
    Allocation { what: &'static str, count: usize },

    /// A pixel buffer did not match the frame geometry.
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The requested frame index does not exist in this file.
    #[error("Frame {index} out of range (file has {frame_count} frames)")]
    FrameOutOfRange { index: usize, frame_count: usize },

    /// The frame exists but its pixels are not currently loaded.
    #[error("Frame {index} is not loaded")]
    FrameUnavailable { index: usize },

    /// A caller-supplied destination buffer is too small for one frame.
    #[error("Destination holds {provided} samples but the frame needs {needed}")]
    BufferTooSmall { needed: usize, provided: usize },
}

impl SifError {
    /// Maps a cursor failure onto the header field that was being decoded.
    pub(crate) fn truncated(field: &'static str) -> impl FnOnce(CursorError) -> SifError {
        move |err| match err {
            CursorError::UnexpectedEof { offset, .. } => SifError::Truncated { field, offset },
        }
    }
}

/// A convenience `Result` type alias using the crate's `SifError` type.
pub type Result<T> = std::result::Result<T, SifError>;
