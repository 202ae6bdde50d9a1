//! Audio cues
//!
//! The session only talks to the `SoundPlayer` capability, so a missing or
//! failing audio backend never affects the game. On the web the cues are
//! procedurally generated with Web Audio oscillators - no external files.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player flapped
    Flap,
    /// Run ended in a collision
    Crash,
    /// Run beat the stored best
    NewBest,
}

/// Background music transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Restart from the beginning (new run)
    Start,
    Pause,
    Resume,
    Stop,
}

/// Audio capability injected into the session
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);
    fn music(&mut self, cue: MusicCue);
    /// Unlock audio after the first user gesture
    fn prime(&mut self) {}
    /// Apply new volume levels (settings change, mute)
    fn set_volumes(&mut self, _volumes: Volumes) {}
}

impl<T: SoundPlayer + ?Sized> SoundPlayer for Box<T> {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect)
    }

    fn music(&mut self, cue: MusicCue) {
        (**self).music(cue)
    }

    fn prime(&mut self) {
        (**self).prime()
    }

    fn set_volumes(&mut self, volumes: Volumes) {
        (**self).set_volumes(volumes)
    }
}

/// Silent player (headless runs, tests, no audio device)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("(silent) {:?}", effect);
    }

    fn music(&mut self, _cue: MusicCue) {}
}

/// Volume pair derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volumes {
    pub sfx: f32,
    pub music: f32,
}

impl Volumes {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sfx: settings.effective_sfx_volume(),
            music: settings.effective_music_volume(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{MusicCue, SoundEffect, SoundPlayer, Volumes};

    /// Web Audio implementation
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volumes: Volumes,
        /// Running music voices (oscillator, gain)
        music: Vec<(OscillatorNode, GainNode)>,
        music_paused: bool,
    }

    impl WebAudio {
        pub fn new(volumes: Volumes) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volumes,
                music: Vec::new(),
                music_paused: false,
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
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

        /// Flap - quick upward chirp
        fn play_flap(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 320.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(320.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(720.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.14).ok();
        }

        /// Crash - low thud plus falling sawtooth
        fn play_crash(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = Self::create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(400.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(80.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = Self::create_osc(ctx, 70.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }

        /// New best - rising arpeggio
        fn play_new_best(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 0.5 + i as f64 * 0.08;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        fn start_music(&mut self) {
            self.stop_music();
            self.music_paused = false;
            let Some(ctx) = &self.ctx else { return };
            // Soft fifth drone
            for (freq, level) in [(110.0, 0.12), (165.0, 0.06)] {
                if let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) {
                    gain.gain().set_value(self.volumes.music * level);
                    osc.start().ok();
                    self.music.push((osc, gain));
                }
            }
        }

        fn stop_music(&mut self) {
            for (osc, _) in self.music.drain(..) {
                osc.stop().ok();
            }
        }

        fn set_music_gain(&self, volume: f32) {
            for (i, (_, gain)) in self.music.iter().enumerate() {
                let level = if i == 0 { 0.12 } else { 0.06 };
                gain.gain().set_value(volume * level);
            }
        }
    }

    impl SoundPlayer for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volumes.sfx;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flap => Self::play_flap(ctx, vol),
                SoundEffect::Crash => Self::play_crash(ctx, vol),
                SoundEffect::NewBest => Self::play_new_best(ctx, vol),
            }
        }

        fn music(&mut self, cue: MusicCue) {
            match cue {
                MusicCue::Start => self.start_music(),
                MusicCue::Pause => {
                    self.music_paused = true;
                    self.set_music_gain(0.0);
                }
                MusicCue::Resume => {
                    self.music_paused = false;
                    self.set_music_gain(self.volumes.music);
                }
                MusicCue::Stop => self.stop_music(),
            }
        }

        fn prime(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn set_volumes(&mut self, volumes: Volumes) {
            self.volumes = volumes;
            if !self.music_paused {
                self.set_music_gain(volumes.music);
            }
        }
    }
}
