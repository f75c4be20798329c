//! Host stand-in for the buzzer's PWM pin

use melody_playback::PwmOutput;
use tracing::trace;

/// PWM output that logs every change instead of driving a pin
///
/// Run with `RUST_LOG=melody_player::output=trace` to watch the waveform
/// settings the buzzer would receive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TracingPwm {
    frequency: u32,
    duty: u16,
}

impl TracingPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Whether the pin is currently producing sound
    pub fn is_sounding(&self) -> bool {
        self.duty > 0
    }
}

impl PwmOutput for TracingPwm {
    fn set_frequency(&mut self, hz: u32) {
        if hz != self.frequency {
            trace!(hz, "PWM frequency");
        }
        self.frequency = hz;
    }

    fn set_duty(&mut self, duty: u16) {
        if duty != self.duty {
            trace!(duty, frequency = self.frequency, "PWM duty");
        }
        self.duty = duty;
    }
}
