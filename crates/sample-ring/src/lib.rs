//! Inertial Sample Ring Buffer
//!
//! Retains the K most recent inertial readings for snapshotting alongside
//! each committed position record.

mod ring;

pub use ring::{SampleRing, DEFAULT_CAPACITY};

use serde::{Deserialize, Serialize};

/// One bias-corrected 6-axis inertial reading.
///
/// Raw register values are 16-bit, but corrected values (raw minus a
/// calibration offset) can exceed the i16 range, so fields are widened.
/// The all-zero `Default` reading is the placeholder that occupies ring
/// slots before the first wrap-around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImuReading {
    /// Acceleration, X axis (raw LSB)
    pub ax: i32,
    /// Acceleration, Y axis (raw LSB)
    pub ay: i32,
    /// Acceleration, Z axis (raw LSB)
    pub az: i32,
    /// Angular rate, X axis (raw LSB)
    pub gx: i32,
    /// Angular rate, Y axis (raw LSB)
    pub gy: i32,
    /// Angular rate, Z axis (raw LSB)
    pub gz: i32,
}

impl ImuReading {
    /// Create a reading from the six axis values.
    pub const fn new(ax: i32, ay: i32, az: i32, gx: i32, gy: i32, gz: i32) -> Self {
        Self {
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
        }
    }
}
