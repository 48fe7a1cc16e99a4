//! Music and sound-effect playback
//!
//! Controllers talk to the `Audio` capability. `SilentAudio` tracks what would be
//! playing (native runs and tests); `WebAudio` synthesizes everything with Web Audio
//! oscillators, so there are no asset files to load.

/// Every sound the game can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Menu music, played looped
    BackgroundMusic,
    /// Star collected
    StarCollect,
    /// Player left the ground
    Jump,
    /// Last star of a level taken
    LevelUp,
    /// Bomb hit
    GameOver,
}

/// Playback options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Playback {
    pub looped: bool,
}

impl Playback {
    pub const ONCE: Self = Self { looped: false };
    pub const LOOP: Self = Self { looped: true };
}

/// Audio capability consumed by the scene controllers
pub trait Audio {
    fn play(&mut self, clip: Clip, playback: Playback);

    /// Stop a looped clip. One-shots end on their own.
    fn stop(&mut self, clip: Clip);

    fn is_playing(&self, clip: Clip) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn muted(&self) -> bool;

    /// Flip the mute flag and return the new value
    fn toggle_mute(&mut self) -> bool {
        let muted = !self.muted();
        self.set_muted(muted);
        muted
    }
}

/// Records playback without making a sound
#[derive(Debug, Default)]
pub struct SilentAudio {
    looping: Vec<Clip>,
    history: Vec<Clip>,
    muted: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every clip that was audibly started, oldest first
    pub fn history(&self) -> &[Clip] {
        &self.history
    }
}

impl Audio for SilentAudio {
    fn play(&mut self, clip: Clip, playback: Playback) {
        if self.muted {
            log::debug!("Muted, skipping {:?}", clip);
            return;
        }
        log::debug!("Play {:?} (looped: {})", clip, playback.looped);
        self.history.push(clip);
        if playback.looped && !self.looping.contains(&clip) {
            self.looping.push(clip);
        }
    }

    fn stop(&mut self, clip: Clip) {
        self.looping.retain(|c| *c != clip);
    }

    fn is_playing(&self, clip: Clip) -> bool {
        self.looping.contains(&clip)
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.looping.clear();
        }
    }

    fn muted(&self) -> bool {
        self.muted
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Audio, Clip, Playback};
    use crate::settings::Settings;

    /// Background tune, one note per beat (Hz, 0 = rest)
    const MELODY: [f32; 16] = [
        392.0, 440.0, 523.3, 440.0, 392.0, 329.6, 392.0, 0.0, 349.2, 392.0, 440.0, 392.0, 349.2,
        293.7, 329.6, 0.0,
    ];
    const BEAT: f64 = 0.25;
    /// How far ahead music notes are scheduled
    const LOOKAHEAD: f64 = 0.5;

    /// Web Audio playback with procedurally generated clips
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        music: Option<MusicCursor>,
    }

    struct MusicCursor {
        next_note: usize,
        next_time: f64,
        voices: Vec<OscillatorNode>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume,
                sfx_volume: settings.sfx_volume,
                music_volume: settings.music_volume,
                muted: settings.start_muted,
                music: None,
            }
        }

        /// Resume the context (browsers require a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Keep the music queue filled. Called once per frame.
        pub fn pump(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let Some(music) = &mut self.music else { return };
            let vol = self.master_volume * self.music_volume;

            let horizon = ctx.current_time() + LOOKAHEAD;
            if music.next_time < ctx.current_time() {
                music.next_time = ctx.current_time();
            }
            while music.next_time < horizon {
                let freq = MELODY[music.next_note];
                let voice = if freq > 0.0 {
                    create_osc(ctx, freq, OscillatorType::Triangle)
                } else {
                    None
                };
                if let Some((osc, gain)) = voice {
                    let t = music.next_time;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + BEAT * 0.9)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + BEAT).ok();
                    music.voices.push(osc);
                }
                music.next_note = (music.next_note + 1) % MELODY.len();
                music.next_time += BEAT;
            }

            // Only notes inside the lookahead window can still need stopping
            let excess = music.voices.len().saturating_sub(MELODY.len());
            music.voices.drain(..excess);
        }

        fn sfx_volume(&self) -> f32 {
            self.master_volume * self.sfx_volume
        }

        fn start_music(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            self.music = Some(MusicCursor {
                next_note: 0,
                next_time: ctx.current_time(),
                voices: Vec::new(),
            });
            self.pump();
        }

        fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                for voice in music.voices {
                    voice.stop().ok();
                }
            }
        }
    }

    impl Audio for WebAudio {
        fn play(&mut self, clip: Clip, playback: Playback) {
            if self.muted {
                return;
            }
            log::debug!("Play {:?} (looped: {})", clip, playback.looped);

            if clip == Clip::BackgroundMusic {
                if self.music.is_none() {
                    self.start_music();
                }
                return;
            }

            let vol = self.sfx_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match clip {
                Clip::StarCollect => play_star(ctx, vol),
                Clip::Jump => play_jump(ctx, vol),
                Clip::LevelUp => play_level_up(ctx, vol),
                Clip::GameOver => play_game_over(ctx, vol),
                Clip::BackgroundMusic => {}
            }
        }

        fn stop(&mut self, clip: Clip) {
            if clip == Clip::BackgroundMusic {
                self.stop_music();
            }
        }

        fn is_playing(&self, clip: Clip) -> bool {
            clip == Clip::BackgroundMusic && self.music.is_some()
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.stop_music();
            }
        }

        fn muted(&self) -> bool {
            self.muted
        }
    }

    /// Oscillator routed through a gain node to the destination
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

    /// Star - two bright blips
    fn play_star(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    /// Jump - quick upward sweep
    fn play_jump(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.12, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Level up - rising arpeggio
    fn play_level_up(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.3, 659.3, 784.0, 1046.5].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
