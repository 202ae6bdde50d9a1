//! Session controller and frame driver
//!
//! Owns one `GameState` plus the collaborators around it (renderer, sound,
//! key-value store) and maps host callbacks onto simulation ticks. The host
//! calls `frame(now_ms)` once per display refresh and stops scheduling when
//! it returns `FrameStatus::Stop`.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{MusicCue, SoundEffect, SoundPlayer, Volumes};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, STEP_MS};
use crate::highscores::HighScore;
use crate::platform::input::InputAction;
use crate::platform::storage::KeyValueStore;
use crate::renderer::{Renderer, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

/// Whether the host should keep requesting frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stop,
}

/// Fixed-step accumulator fed by host timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: f64,
    accumulator: f64,
}

impl FrameClock {
    /// Restart timing from `now_ms`, dropping any pending time
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
        self.accumulator = 0.0;
    }

    /// Feed a timestamp; returns how many fixed steps to run
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let delta = (now_ms - self.last_ms).clamp(0.0, MAX_FRAME_MS);
        self.last_ms = now_ms;
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= STEP_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= STEP_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop what the cap could not absorb
            self.accumulator %= STEP_MS;
        }
        steps
    }
}

/// One player's game: state machine, best score and collaborators
pub struct Session<R: Renderer, S: SoundPlayer, K: KeyValueStore> {
    state: GameState,
    high_score: HighScore,
    settings: Settings,
    clock: FrameClock,
    /// Derives a fresh seed for every run
    seeds: Pcg32,
    autopilot: bool,
    audio_primed: bool,
    events: Vec<GameEvent>,
    renderer: R,
    sound: S,
    store: K,
}

impl<R: Renderer, S: SoundPlayer, K: KeyValueStore> Session<R, S, K> {
    /// Build a session on the title screen, loading tuning, settings and best
    /// score from the store
    pub fn new(seed: u64, viewport: Viewport, renderer: R, sound: S, store: K) -> Self {
        let tuning = Tuning::load(&store);
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        log::info!("Session created (seed {}, best {})", seed, high_score.best());

        Self {
            state: GameState::new(seed, tuning, viewport),
            high_score,
            settings,
            clock: FrameClock::default(),
            seeds: Pcg32::seed_from_u64(seed),
            autopilot: false,
            audio_primed: false,
            events: Vec::new(),
            renderer,
            sound,
            store,
        }
    }

    /// Start a fresh run (also used for restart)
    pub fn start(&mut self, now_ms: f64) {
        let seed = self.seeds.next_u64();
        self.state.reset(seed);
        self.clock.reset(now_ms);
        self.sound.music(MusicCue::Start);
        log::info!("Run started with seed {}", seed);
        self.pump_events();
        self.render();
    }

    /// Restart from the title screen, game over or the pause menu
    ///
    /// Ignored mid-run; the score only ends through game over.
    pub fn restart(&mut self, now_ms: f64) {
        if self.state.phase == GamePhase::Running {
            log::debug!("Restart ignored while running");
            return;
        }
        self.start(now_ms);
    }

    /// Primary action: starts from the title screen or after game over,
    /// flaps mid-run
    ///
    /// Ignored while paused.
    pub fn flap(&mut self, now_ms: f64) {
        match self.state.phase {
            GamePhase::Idle | GamePhase::GameOver => self.start(now_ms),
            GamePhase::Running => {
                self.state.flap();
                self.pump_events();
            }
            GamePhase::Paused => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.state.phase = GamePhase::Paused;
        self.state.events.push(GameEvent::Paused);
        self.sound.music(MusicCue::Pause);
        log::info!("Paused at score {}", self.state.score);
        self.pump_events();
        self.render();
    }

    /// Resume a paused run; time spent paused is never simulated
    pub fn resume(&mut self, now_ms: f64) {
        if self.state.phase != GamePhase::Paused {
            return;
        }
        self.state.phase = GamePhase::Running;
        self.clock.reset(now_ms);
        self.state.events.push(GameEvent::Resumed);
        self.sound.music(MusicCue::Resume);
        log::info!("Resumed");
        self.pump_events();
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(now_ms),
            _ => {}
        }
    }

    /// Pause because the page lost focus, if the player wants that
    pub fn auto_pause(&mut self) {
        if self.settings.pause_on_blur && self.state.phase == GamePhase::Running {
            log::info!("Auto-paused");
            self.pause();
        }
    }

    /// Apply a mapped input action
    ///
    /// Returns `Continue` when the run is live and the host must make sure a
    /// frame is scheduled.
    pub fn handle(&mut self, action: InputAction, now_ms: f64) -> FrameStatus {
        match action {
            InputAction::Flap => self.flap(now_ms),
            InputAction::Pause => self.pause(),
            InputAction::Resume => self.resume(now_ms),
            InputAction::TogglePause => self.toggle_pause(now_ms),
            InputAction::Restart => self.restart(now_ms),
        }
        self.status()
    }

    /// Advance by the time elapsed since the last frame, then draw
    pub fn frame(&mut self, now_ms: f64) -> FrameStatus {
        if self.state.phase != GamePhase::Running {
            return FrameStatus::Stop;
        }

        let input = TickInput {
            flap: false,
            autopilot: self.autopilot,
        };
        let steps = self.clock.advance(now_ms);
        for _ in 0..steps {
            tick(&mut self.state, &input);
            self.pump_events();
            if self.state.phase != GamePhase::Running {
                break;
            }
        }

        if self.state.phase == GamePhase::GameOver {
            self.finish_run();
        }
        self.render();
        self.status()
    }

    /// New viewport from the host (window resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.state.resize(viewport);
        log::debug!("Viewport {}x{}", viewport.width, viewport.height);
        self.render();
    }

    /// Unlock audio on the first user gesture
    pub fn prime_audio(&mut self) {
        if !self.audio_primed {
            self.audio_primed = true;
            self.sound.prime();
        }
    }

    /// Replace and persist player settings; volumes apply immediately
    pub fn update_settings(&mut self, settings: Settings) {
        if let Err(e) = settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.sound.set_volumes(Volumes::from_settings(&settings));
        self.settings = settings;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Take pending UI events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best(&self) -> u32 {
        self.high_score.best()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    fn status(&self) -> FrameStatus {
        if self.state.phase == GamePhase::Running {
            FrameStatus::Continue
        } else {
            FrameStatus::Stop
        }
    }

    fn render(&mut self) {
        let scene = build_scene(&self.state, self.high_score.best());
        self.renderer.draw(&scene);
    }

    /// Move simulation events to the UI queue, reacting to the audible ones
    fn pump_events(&mut self) {
        for event in self.state.drain_events() {
            if event == GameEvent::Flapped {
                self.sound.play(SoundEffect::Flap);
            }
            self.events.push(event);
        }
    }

    /// Game-over bookkeeping: best score, persistence, audio
    fn finish_run(&mut self) {
        let score = self.state.score;
        let new_best = self.high_score.submit(score);
        let best = self.high_score.best();

        self.sound.music(MusicCue::Stop);
        self.sound.play(SoundEffect::Crash);
        self.events.push(GameEvent::GameOver {
            score,
            best,
            new_best,
        });

        if new_best {
            log::info!("New best score: {}", best);
            if let Err(e) = self.high_score.save(&mut self.store) {
                log::warn!("Failed to save best score: {}", e);
            }
            self.sound.play(SoundEffect::NewBest);
            self.events.push(GameEvent::BestUpdated { best });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSound;
    use crate::platform::storage::MemoryStore;
    use crate::renderer::NullRenderer;

    type TestSession = Session<NullRenderer, NullSound, MemoryStore>;

    fn session() -> TestSession {
        Session::new(
            7,
            Viewport::new(800.0, 600.0),
            NullRenderer,
            NullSound,
            MemoryStore::new(),
        )
    }

    /// Run frames 20 ms apart until the host would stop
    fn run_until_stop(s: &mut TestSession, mut now: f64) -> f64 {
        for _ in 0..10_000 {
            now += 20.0;
            if s.frame(now) == FrameStatus::Stop {
                break;
            }
        }
        now
    }

    #[test]
    fn test_frame_clock_steps() {
        let mut clock = FrameClock::default();
        clock.reset(1000.0);
        assert_eq!(clock.advance(1000.0), 0);
        assert_eq!(clock.advance(1020.0), 1);
        // 3.33 left over + 15 = 18.33
        assert_eq!(clock.advance(1035.0), 1);
        // Long stall is clamped and capped
        assert_eq!(clock.advance(60_000.0), MAX_SUBSTEPS);
        assert!(clock.accumulator < STEP_MS);
    }

    #[test]
    fn test_frame_clock_ignores_backwards_time() {
        let mut clock = FrameClock::default();
        clock.reset(500.0);
        assert_eq!(clock.advance(400.0), 0);
    }

    #[test]
    fn test_idle_flap_starts_run() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.frame(16.0), FrameStatus::Stop);
        s.flap(0.0);
        assert_eq!(s.phase(), GamePhase::Running);
        // Starting does not flap
        assert_eq!(s.state().actor.vel, 0.0);
        assert_eq!(s.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_pause_accumulates_no_gravity() {
        let mut s = session();
        s.start(0.0);
        s.frame(100.0);
        let vel = s.state().actor.vel;
        let y = s.state().actor.y;
        assert!(vel > 0.0);

        s.pause();
        assert_eq!(s.phase(), GamePhase::Paused);
        assert_eq!(s.frame(5_000.0), FrameStatus::Stop);
        assert_eq!(s.state().actor.y, y);

        s.resume(10_000.0);
        assert_eq!(s.frame(10_000.0), FrameStatus::Continue);
        assert_eq!(s.state().actor.vel, vel);
        s.frame(10_020.0);
        assert!((s.state().actor.vel - vel - 0.277).abs() < 1e-5);
    }

    #[test]
    fn test_flap_ignored_while_paused() {
        let mut s = session();
        s.start(0.0);
        s.frame(50.0);
        s.pause();
        let vel = s.state().actor.vel;
        s.flap(60.0);
        assert_eq!(s.state().actor.vel, vel);
    }

    #[test]
    fn test_falling_ends_run_and_records_best() {
        let mut s = session();
        s.start(0.0);
        s.state.score = 4;
        run_until_stop(&mut s, 0.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.best(), 4);
        assert_eq!(
            s.store().get(HighScore::STORAGE_KEY).ok().flatten().as_deref(),
            Some("4")
        );
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 4,
            best: 4,
            new_best: true
        }));
        assert!(events.contains(&GameEvent::BestUpdated { best: 4 }));

        // Primary action after game over starts a fresh run
        s.flap(10_000.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.score(), 0);
        assert_eq!(s.state().actor.vel, 0.0);
        assert_eq!(s.best(), 4);
    }

    #[test]
    fn test_restart_ignored_mid_run() {
        let mut s = session();
        s.start(0.0);
        s.frame(50.0);
        s.state.score = 3;
        let y = s.state().actor.y;
        assert_eq!(s.handle(InputAction::Restart, 60.0), FrameStatus::Continue);
        assert_eq!(s.score(), 3);
        assert_eq!(s.state().actor.y, y);
        assert_eq!(s.best(), 0);
    }

    #[test]
    fn test_restart_resets_score_keeps_best() {
        let mut s = session();
        s.start(0.0);
        s.state.score = 6;
        let now = run_until_stop(&mut s, 0.0);

        assert_eq!(s.handle(InputAction::Restart, now), FrameStatus::Continue);
        assert_eq!(s.score(), 0);
        assert_eq!(s.best(), 6);

        // A worse run leaves the best alone
        s.state.score = 2;
        run_until_stop(&mut s, now);
        assert_eq!(s.best(), 6);
        assert!(s.drain_events().contains(&GameEvent::GameOver {
            score: 2,
            best: 6,
            new_best: false
        }));
    }

    #[test]
    fn test_restart_from_pause() {
        let mut s = session();
        s.start(0.0);
        s.frame(100.0);
        s.pause();
        s.handle(InputAction::Restart, 200.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.state().actor.y, 300.0);
    }

    #[test]
    fn test_auto_pause_respects_setting() {
        let mut s = session();
        s.start(0.0);
        s.update_settings(Settings {
            pause_on_blur: false,
            ..Default::default()
        });
        s.auto_pause();
        assert_eq!(s.phase(), GamePhase::Running);

        s.update_settings(Settings::default());
        s.auto_pause();
        assert_eq!(s.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_best_loaded_from_store() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "12").unwrap();
        let s = Session::new(1, Viewport::new(800.0, 600.0), NullRenderer, NullSound, store);
        assert_eq!(s.best(), 12);
    }
}
