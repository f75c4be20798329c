//! Tone generation traits and the PWM buzzer driver
//!
//! The engine talks to a [`ToneDriver`]; the buzzer implementation in turn
//! talks to a single PWM channel through [`PwmOutput`], which is the only
//! piece a hardware target has to provide.

use crate::volume::Volume;

/// Lowest frequency the buzzer is driven at (Hz)
pub const DEFAULT_MIN_FREQUENCY: u32 = 35;

/// Highest frequency the buzzer is driven at (Hz)
pub const DEFAULT_MAX_FREQUENCY: u32 = 20_000;

/// Square-wave tone generator
///
/// Calling `tone` twice in a row changes pitch without a gap; the engine
/// still calls `silence` between notes so no tone is ever left stuck on.
pub trait ToneDriver: Send {
    /// Sound `frequency` Hz at the current volume
    fn tone(&mut self, frequency: u32);

    /// Drop the duty cycle to zero, leaving the frequency as is
    fn silence(&mut self);

    /// Volume applied by the next `tone` call
    fn set_volume(&mut self, volume: Volume);

    fn volume(&self) -> Volume;
}

/// One PWM-capable output pin
pub trait PwmOutput: Send {
    fn set_frequency(&mut self, hz: u32);

    /// Duty cycle in `[0, 65535]`
    fn set_duty(&mut self, duty: u16);
}

/// Passive buzzer on a PWM pin
pub struct Buzzer<P: PwmOutput> {
    pwm: P,
    volume: Volume,
    min_freq: u32,
    max_freq: u32,
}

impl<P: PwmOutput> Buzzer<P> {
    pub fn new(pwm: P) -> Self {
        Self::with_frequency_range(pwm, DEFAULT_MIN_FREQUENCY, DEFAULT_MAX_FREQUENCY)
    }

    pub fn with_frequency_range(mut pwm: P, min_freq: u32, max_freq: u32) -> Self {
        pwm.set_duty(0);
        Self {
            pwm,
            volume: Volume::default(),
            min_freq,
            max_freq,
        }
    }

    pub fn can_play_tone(&self, frequency: u32) -> bool {
        (self.min_freq..=self.max_freq).contains(&frequency)
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

impl<P: PwmOutput> ToneDriver for Buzzer<P> {
    fn tone(&mut self, frequency: u32) {
        if frequency == 0 {
            self.silence();
            return;
        }

        let frequency = frequency.clamp(self.min_freq, self.max_freq);
        self.pwm.set_frequency(frequency);
        self.pwm.set_duty(self.volume.duty());
    }

    fn silence(&mut self) {
        self.pwm.set_duty(0);
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn volume(&self) -> Volume {
        self.volume
    }
}
