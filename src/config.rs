use crate::diagnostics::{DiagnosticSink, LogSink};
use bon::Builder;
use std::fmt;
use std::sync::Arc;

/// Decode and load settings for a [`SifFile`](crate::SifFile).
///
/// ```
/// use sif_reader::OpenOptions;
///
/// let options = OpenOptions::builder().load_pixels(true).build();
/// assert!(options.load_pixels);
/// assert!(!options.byte_swap);
/// ```
#[derive(Clone, Builder)]
pub struct OpenOptions {
    /// Load every frame right after the header is decoded.
    #[builder(default)]
    pub load_pixels: bool,
    /// Byte-reverse every sample; used by all loads on the file.
    #[builder(default)]
    pub byte_swap: bool,
    /// Receiver for decode and load diagnostics.
    #[builder(default = Arc::new(LogSink) as Arc<dyn DiagnosticSink>)]
    pub sink: Arc<dyn DiagnosticSink>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("load_pixels", &self.load_pixels)
            .field("byte_swap", &self.byte_swap)
            .finish_non_exhaustive()
    }
}
