//! MPU6050 register driver
//!
//! Talks to the sensor over any bus implementing the `embedded-hal` I2C
//! trait. Axis words are big-endian signed 16-bit pairs; corrected readings
//! subtract the bias offsets captured by [`Mpu6050::calibrate`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::{debug, info};

use crate::{ImuError, ImuReading, InertialSampler};

/// Default 7-bit bus address (AD0 pulled low)
pub const MPU6050_ADDR: u8 = 0x68;

/// Accelerometer LSB per g at the +-2g full-scale setting
pub const ACCEL_LSB_PER_G: i32 = 16_384;

mod reg {
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const GYRO_XOUT_H: u8 = 0x43;
}

/// Per-axis bias subtracted from every corrected reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiasOffsets {
    pub ax: i32,
    pub ay: i32,
    pub az: i32,
    pub gx: i32,
    pub gy: i32,
    pub gz: i32,
}

/// Register driver over a generic I2C bus and delay provider
pub struct Mpu6050<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    offsets: BiasOffsets,
}

impl<I2C, D> Mpu6050<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Driver at the default address with zeroed bias offsets.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, MPU6050_ADDR)
    }

    /// Driver at an explicit bus address (AD0 high boards sit at 0x69).
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            offsets: BiasOffsets::default(),
        }
    }

    /// Wake the sensor out of sleep and select +-2g / +-250 deg/s full scale.
    pub fn init(&mut self) -> Result<(), ImuError> {
        self.write_reg(reg::PWR_MGMT_1, 0x00)?;
        self.write_reg(reg::ACCEL_CONFIG, 0x00)?;
        self.write_reg(reg::GYRO_CONFIG, 0x00)?;
        debug!("MPU6050 awake at address {:#04x}", self.address);
        Ok(())
    }

    /// One uncorrected reading straight off the output registers.
    pub fn read_raw(&mut self) -> Result<ImuReading, ImuError> {
        let [ax, ay, az] = self.read_axes(reg::ACCEL_XOUT_H)?;
        let [gx, gy, gz] = self.read_axes(reg::GYRO_XOUT_H)?;
        Ok(ImuReading::new(
            ax.into(),
            ay.into(),
            az.into(),
            gx.into(),
            gy.into(),
            gz.into(),
        ))
    }

    /// Average `samples` stationary readings into bias offsets.
    ///
    /// The device must be held still and level for the duration. One g is
    /// left on the Z accelerometer axis so corrected readings keep their
    /// gravity reference.
    pub fn calibrate(&mut self, samples: usize) -> Result<BiasOffsets, ImuError> {
        let n = samples.max(1);
        info!("Calibrating IMU over {} samples, keep the device stationary", n);
        let mut sum = [0i64; 6];
        for _ in 0..n {
            let r = self.read_raw()?;
            for (acc, value) in sum.iter_mut().zip([r.ax, r.ay, r.az, r.gx, r.gy, r.gz]) {
                *acc += i64::from(value);
            }
            self.delay.delay_ms(2);
        }
        let avg = |axis: usize| (sum[axis] / n as i64) as i32;
        self.offsets = BiasOffsets {
            ax: avg(0),
            ay: avg(1),
            az: avg(2) - ACCEL_LSB_PER_G,
            gx: avg(3),
            gy: avg(4),
            gz: avg(5),
        };
        info!("IMU calibration complete: {:?}", self.offsets);
        Ok(self.offsets)
    }

    /// Bias offsets currently applied to corrected reads.
    pub fn offsets(&self) -> BiasOffsets {
        self.offsets
    }

    /// One reading with the calibration bias removed.
    pub fn read_corrected(&mut self) -> Result<ImuReading, ImuError> {
        let raw = self.read_raw()?;
        let o = self.offsets;
        Ok(ImuReading::new(
            raw.ax - o.ax,
            raw.ay - o.ay,
            raw.az - o.az,
            raw.gx - o.gx,
            raw.gy - o.gy,
            raw.gz - o.gz,
        ))
    }

    /// Release the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), ImuError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| ImuError::Init(format!("{e:?}")))
    }

    /// Three consecutive big-endian axis words starting at `start`.
    fn read_axes(&mut self, start: u8) -> Result<[i16; 3], ImuError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[start], &mut buf)
            .map_err(|e| ImuError::Read(format!("{e:?}")))?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}

impl<I2C, D> InertialSampler for Mpu6050<I2C, D>
where
    I2C: I2c + Send,
    D: DelayNs + Send,
{
    fn sample(&mut self) -> Result<ImuReading, ImuError> {
        self.read_corrected()
    }
}
