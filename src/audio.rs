//! Audio system
//!
//! Every cue is a short procedurally generated tone sequence, so no audio
//! files are needed. The browser build plays them through the Web Audio API.

use crate::sim::SoundCue;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Sawtooth,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Exponential pitch sweep target, if any
    pub sweep_to: Option<f32>,
    /// Seconds
    pub duration: f64,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Start offset (seconds)
    pub delay: f64,
    pub wave: Wave,
}

impl Tone {
    const fn sine(freq: f32, duration: f64, gain: f32) -> Self {
        Self {
            freq,
            sweep_to: None,
            duration,
            gain,
            delay: 0.0,
            wave: Wave::Sine,
        }
    }
}

/// Rising C-E-G jingle, 100 ms apart
const SUCCESS_NOTES: [f32; 3] = [523.25, 659.25, 783.99];

impl SoundCue {
    /// Notes making up this cue
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            SoundCue::Pickup => vec![Tone::sine(800.0, 0.1, 0.3)],
            SoundCue::Drop => vec![Tone::sine(400.0, 0.12, 0.25)],
            SoundCue::ButtonClick => vec![Tone::sine(600.0, 0.08, 0.25)],
            SoundCue::Chomp => vec![Tone {
                freq: 400.0,
                sweep_to: Some(100.0),
                duration: 0.15,
                gain: 0.3,
                delay: 0.0,
                wave: Wave::Sawtooth,
            }],
            SoundCue::Success => SUCCESS_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone {
                    delay: i as f64 * 0.1,
                    ..Tone::sine(freq, 0.2, 0.4)
                })
                .collect(),
        }
    }
}

/// Where sound cues go
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    fn set_muted(&mut self, muted: bool);
}

/// Volume state shared by every sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Mixer {
    pub fn from_settings(settings: &crate::Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Scale applied to every tone's gain
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

/// Sink for headless runs: logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogAudio {
    pub mixer: Mixer,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        if self.mixer.effective_volume() > 0.0 {
            log::debug!("Sound {:?} ({} notes)", cue, cue.tones().len());
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.mixer.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Mixer, Tone, Wave};
    use crate::sim::SoundCue;

    /// Web Audio player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        mixer: Mixer,
    }

    impl AudioManager {
        pub fn new(mixer: Mixer) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, mixer }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let osc_type = match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            gain.gain().set_value_at_time(tone.gain * vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if let Some(to) = tone.sweep_to {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.mixer.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in cue.tones() {
                self.play_tone(ctx, &tone, vol);
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.mixer.muted = muted;
        }
    }
}
