//! Audio Engine Module
//!
//! Source-side building blocks:
//! - Immutable audio buffers
//! - Waveform envelope building and caching
//! - WAV file I/O

pub mod buffer;
pub mod envelope;
pub mod io;

pub use buffer::{calculate_peak, calculate_rms, linear_to_db, time_to_frame, AudioBuffer};
pub use envelope::{build_envelope, Envelope, EnvelopeCache, EnvelopeColumn, DEFAULT_CHUNK_FRAMES};
pub use io::{export_wav, import_wav, ExportFormat};
