//! Sentence Recognizer State Machine

use crate::frame;
use crate::{Sentence, SentenceCode};
use tracing::debug;

/// Recognizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CaptureState {
    /// Scanning for a start marker
    #[default]
    Idle,
    /// Accumulating frame bytes
    Capturing,
    /// Frame exceeded the length bound; ignoring everything until the
    /// next start marker, terminator included
    Discarding,
}

/// Counters for frames that never reached persistence.
///
/// Framing errors are non-fatal and silent on the data path; these
/// counters are the only trace they leave besides debug logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramingStats {
    /// Complete frames emitted
    pub emitted: u64,
    /// Frames dropped for exceeding the length bound
    pub oversized: u64,
    /// Complete frames dropped for an unrecognized or missing type code
    pub unrecognized: u64,
    /// Terminator bytes seen while idle
    pub stray_terminators: u64,
}

/// Byte-at-a-time sentence recognizer.
///
/// A start marker at any point resets in-progress capture, so a torn
/// frame costs at most one record. The type code is read from a fixed
/// window (frame offsets 2..5) rather than tokenized: the non-type
/// prefix has constant length for the families being tracked, and this
/// runs on every byte of a continuous stream.
pub struct SentenceRecognizer {
    state: CaptureState,
    buf: Vec<u8>,
    code_window: [u8; frame::CODE_LEN],
    stats: FramingStats,
}

impl SentenceRecognizer {
    /// Create an idle recognizer.
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            buf: Vec::with_capacity(frame::MAX_SENTENCE_LEN),
            code_window: [0; frame::CODE_LEN],
            stats: FramingStats::default(),
        }
    }

    /// Consume one byte; returns a sentence when this byte completed one.
    ///
    /// Never emits for unrecognized types, oversized frames, or a
    /// terminator seen while idle.
    pub fn feed(&mut self, byte: u8) -> Option<Sentence> {
        match self.state {
            CaptureState::Idle => {
                if byte == frame::START {
                    self.begin_capture();
                } else if byte == frame::TERMINATOR {
                    self.stats.stray_terminators += 1;
                }
                None
            }
            CaptureState::Discarding => {
                if byte == frame::START {
                    self.begin_capture();
                }
                None
            }
            CaptureState::Capturing => {
                if byte == frame::START {
                    self.begin_capture();
                    return None;
                }
                if byte == frame::TERMINATOR {
                    return self.complete();
                }
                if self.buf.len() >= frame::MAX_SENTENCE_LEN {
                    debug!("dropping oversized frame ({} bytes)", self.buf.len());
                    self.stats.oversized += 1;
                    self.state = CaptureState::Discarding;
                    return None;
                }
                let offset = self.buf.len();
                self.buf.push(byte);
                if (frame::TALKER_LEN..frame::TALKER_LEN + frame::CODE_LEN).contains(&offset) {
                    self.code_window[offset - frame::TALKER_LEN] = byte;
                }
                None
            }
        }
    }

    /// Return to idle, clearing any in-progress capture.
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.buf.clear();
        self.code_window = [0; frame::CODE_LEN];
    }

    /// Drop/emit counters accumulated since construction.
    pub fn stats(&self) -> FramingStats {
        self.stats
    }

    fn begin_capture(&mut self) {
        self.state = CaptureState::Capturing;
        self.buf.clear();
        self.code_window = [0; frame::CODE_LEN];
    }

    fn complete(&mut self) -> Option<Sentence> {
        self.state = CaptureState::Idle;

        // A frame shorter than talker + code cannot carry a full window
        if self.buf.len() < frame::TALKER_LEN + frame::CODE_LEN {
            self.stats.unrecognized += 1;
            return None;
        }

        match SentenceCode::from_window(&self.code_window) {
            Some(code) => {
                self.stats.emitted += 1;
                let body =
                    String::from_utf8_lossy(&self.buf[frame::TALKER_LEN + frame::CODE_LEN..])
                        .into_owned();
                Some(Sentence { code, body })
            }
            None => {
                debug!(
                    "dropping frame with unrecognized code {:?}",
                    String::from_utf8_lossy(&self.code_window)
                );
                self.stats.unrecognized += 1;
                None
            }
        }
    }
}

impl Default for SentenceRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
