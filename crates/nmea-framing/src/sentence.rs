//! Sentence Types and Codes

use serde::{Deserialize, Serialize};

/// Record families recognized and routed to persistence.
///
/// Everything else on the stream (GGA, GSV, proprietary sentences, noise)
/// is dropped at the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentenceCode {
    /// Recommended minimum position/velocity/time
    Rmc,
    /// Course over ground and ground speed
    Vtg,
}

impl SentenceCode {
    /// All recognized codes in persistence priority order (RMC first).
    pub const IN_PRIORITY_ORDER: [SentenceCode; 2] = [SentenceCode::Rmc, SentenceCode::Vtg];

    /// Match a filled code window against the recognized families.
    pub fn from_window(window: &[u8; 3]) -> Option<Self> {
        match window {
            b"RMC" => Some(SentenceCode::Rmc),
            b"VTG" => Some(SentenceCode::Vtg),
            _ => None,
        }
    }

    /// The 3-character type code.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceCode::Rmc => "RMC",
            SentenceCode::Vtg => "VTG",
        }
    }
}

/// One complete recognized sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// The recognized type code
    pub code: SentenceCode,
    /// Frame content after the type code, treated as an opaque payload
    pub body: String,
}

impl Sentence {
    /// The text persisted for this sentence: the type code followed by
    /// the body (the talker prefix is not retained).
    pub fn record(&self) -> String {
        format!("{}{}", self.code.as_str(), self.body)
    }
}
