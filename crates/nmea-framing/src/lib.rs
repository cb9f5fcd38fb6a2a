//! NMEA Sentence Framing
//!
//! Reconstructs discrete position/velocity records out of an unbounded
//! serial byte stream, fed one byte at a time. Sentences are delimited by
//! a start marker and a terminator byte and classified by a 3-character
//! type code read from a fixed offset within the frame.

mod recognizer;
mod sentence;

pub use recognizer::{FramingStats, SentenceRecognizer};
pub use sentence::{Sentence, SentenceCode};

/// Framing constants
pub mod frame {
    /// Byte that opens every sentence
    pub const START: u8 = b'$';
    /// Byte that terminates a complete sentence
    pub const TERMINATOR: u8 = b'\r';
    /// Maximum frame length in bytes, start and terminator excluded
    pub const MAX_SENTENCE_LEN: usize = 100;
    /// Length of the talker prefix preceding the type code
    pub const TALKER_LEN: usize = 2;
    /// Length of the type code
    pub const CODE_LEN: usize = 3;
}
