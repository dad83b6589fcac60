//! Orientation samples (device attitude quaternions)

use serde::{Deserialize, Serialize};

/// Device attitude at one instant, as a unit quaternion.
///
/// Field order follows the sensor convention: vector part first, scalar last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl OrientationSample {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Identity attitude (device flat, screen up)
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `degrees` about the device x axis.
    ///
    /// For 0..=180 the classifier reads the same pitch back.
    pub fn from_pitch_degrees(degrees: f64) -> Self {
        let half = degrees.to_radians() / 2.0;
        Self::new(half.sin(), 0.0, 0.0, half.cos())
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Scaled to unit length; near-zero quaternions are returned unchanged
    pub fn normalized(&self) -> Self {
        let len = self.norm();
        if len > 1e-9 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            *self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl std::str::FromStr for OrientationSample {
    type Err = String;

    /// Parse `x,y,z,w`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid quaternion component: {}", e))?;

        let sample = match parts.as_slice() {
            [x, y, z, w] => Self::new(*x, *y, *z, *w),
            _ => return Err(format!("expected 4 components (x,y,z,w), got {}", parts.len())),
        };
        if !sample.is_finite() {
            return Err(format!("non-finite quaternion component in {:?}", s));
        }
        Ok(sample)
    }
}
