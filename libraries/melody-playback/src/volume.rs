//! Output volume in PWM duty-cycle units
//!
//! Volume is the duty cycle driven onto the buzzer pin while a tone is
//! sounding, from 0 (silent) to 65535 (full duty). Remote values are coerced
//! to an integer and clamped into that range.

use serde_json::Value;

/// Volume level as a 16-bit duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u16);

impl Volume {
    /// Silent output
    pub const MIN: Volume = Volume(0);

    /// Full duty cycle
    pub const MAX: Volume = Volume(u16::MAX);

    /// Default level used until the server reports one (about 2% duty)
    pub const DEFAULT: Volume = Volume(1500);

    pub const fn new(duty: u16) -> Self {
        Self(duty)
    }

    /// Duty cycle to drive while a tone is sounding
    pub const fn duty(self) -> u16 {
        self.0
    }

    /// Coerce an arbitrary number to a volume
    ///
    /// Truncates toward zero, then clamps to `[0, 65535]`.
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let clamped = value.trunc().clamp(0.0, f64::from(u16::MAX));
        Some(Self(clamped as u16))
    }

    /// Decode the `volume` field of a server response
    ///
    /// Numbers and numeric strings are accepted. `null` and anything else
    /// decode to `None`, meaning "keep the previous volume".
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().and_then(Self::from_f64),
            Value::String(s) => s.trim().parse::<f64>().ok().and_then(Self::from_f64),
            _ => None,
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u16> for Volume {
    fn from(duty: u16) -> Self {
        Self(duty)
    }
}
