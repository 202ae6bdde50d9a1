//! Drives a whole session through the public API with recording collaborators

use flappy_canvas::audio::{MusicCue, SoundEffect, SoundPlayer, Volumes};
use flappy_canvas::platform::{InputAction, KeyValueStore, MemoryStore, action_for_key};
use flappy_canvas::renderer::{Renderer, Scene};
use flappy_canvas::sim::{GameEvent, GamePhase, Viewport};
use flappy_canvas::{FrameStatus, HighScore, Session, Settings};

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Scene>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, scene: &Scene) {
        self.frames.push(scene.clone());
    }
}

#[derive(Default)]
struct RecordingSound {
    effects: Vec<SoundEffect>,
    music: Vec<MusicCue>,
    primed: u32,
    volumes: Vec<Volumes>,
}

impl SoundPlayer for RecordingSound {
    fn play(&mut self, effect: SoundEffect) {
        self.effects.push(effect);
    }

    fn music(&mut self, cue: MusicCue) {
        self.music.push(cue);
    }

    fn prime(&mut self) {
        self.primed += 1;
    }

    fn set_volumes(&mut self, volumes: Volumes) {
        self.volumes.push(volumes);
    }
}

type TestSession = Session<RecordingRenderer, RecordingSound, MemoryStore>;

fn new_session(store: MemoryStore) -> TestSession {
    Session::new(
        2024,
        Viewport::new(800.0, 600.0),
        RecordingRenderer::default(),
        RecordingSound::default(),
        store,
    )
}

/// Press a key the way the browser host does
fn press(session: &mut TestSession, code: &str, now: f64) -> Option<FrameStatus> {
    let action = action_for_key(code, session.phase())?;
    Some(session.handle(action, now))
}

fn run_until_stop(session: &mut TestSession, mut now: f64) -> f64 {
    for _ in 0..10_000 {
        now += 1000.0 / 60.0;
        if session.frame(now) == FrameStatus::Stop {
            break;
        }
    }
    now
}

#[test]
fn full_run_without_input_falls_to_the_floor() {
    let mut session = new_session(MemoryStore::new());
    session.prime_audio();
    session.prime_audio();
    assert_eq!(session.sound().primed, 1);

    assert_eq!(press(&mut session, "Space", 0.0), Some(FrameStatus::Continue));
    assert_eq!(session.phase(), GamePhase::Running);
    assert_eq!(session.sound().music, vec![MusicCue::Start]);

    run_until_stop(&mut session, 0.0);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.score(), 0);
    // Zero never beats a fresh best, so nothing is written
    assert_eq!(session.best(), 0);
    assert_eq!(session.store().get(HighScore::STORAGE_KEY).unwrap(), None);

    let sound = session.sound();
    assert_eq!(sound.effects, vec![SoundEffect::Crash]);
    assert_eq!(sound.music.last(), Some(&MusicCue::Stop));

    let events = session.drain_events();
    assert_eq!(events.first(), Some(&GameEvent::Started));
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            score: 0,
            best: 0,
            new_best: false
        })
    );

    let last = session.renderer().frames.last().unwrap();
    assert_eq!(last.hud.phase, GamePhase::GameOver);
}

#[test]
fn autopilot_scores_and_persists_best() {
    let mut session = new_session(MemoryStore::new());
    session.set_autopilot(true);
    session.start(0.0);

    let mut now = 0.0;
    for _ in 0..2400 {
        now += 1000.0 / 60.0;
        session.frame(now);
    }
    let score = session.score();
    assert!(score >= 5, "autopilot only scored {}", score);
    assert_eq!(session.phase(), GamePhase::Running);
    assert!(session.sound().effects.contains(&SoundEffect::Flap));

    let events = session.drain_events();
    let scored: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Scored { score } => Some(*score),
            _ => None,
        })
        .collect();
    assert_eq!(scored, (1..=score).collect::<Vec<_>>());

    // Hand control back and let it fall
    session.set_autopilot(false);
    run_until_stop(&mut session, now);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.best(), session.score());
    assert!(session.sound().effects.contains(&SoundEffect::NewBest));

    let stored = session.store().get(HighScore::STORAGE_KEY).unwrap();
    assert_eq!(stored, Some(session.score().to_string()));
}

#[test]
fn best_survives_into_next_session() {
    let mut store = MemoryStore::new();
    store.set(HighScore::STORAGE_KEY, "9").unwrap();
    let mut session = new_session(store);
    assert_eq!(session.best(), 9);

    session.start(0.0);
    let now = run_until_stop(&mut session, 0.0);
    assert_eq!(session.best(), 9);

    // Enter restarts only once the run is over
    assert_eq!(press(&mut session, "Enter", now), Some(FrameStatus::Continue));
    assert_eq!(session.phase(), GamePhase::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(press(&mut session, "Enter", now), None);
}

#[test]
fn pause_key_freezes_and_resumes() {
    let mut session = new_session(MemoryStore::new());
    session.start(0.0);
    session.frame(50.0);
    let y = session.state().actor.y;

    assert_eq!(press(&mut session, "KeyP", 60.0), Some(FrameStatus::Stop));
    assert_eq!(session.phase(), GamePhase::Paused);
    assert_eq!(session.frame(30_000.0), FrameStatus::Stop);
    assert_eq!(session.state().actor.y, y);

    assert_eq!(
        session.handle(InputAction::TogglePause, 30_000.0),
        FrameStatus::Continue
    );
    assert_eq!(session.sound().music.last(), Some(&MusicCue::Resume));
    session.frame(30_000.0);
    assert_eq!(session.state().actor.y, y);

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::Paused));
    assert!(events.contains(&GameEvent::Resumed));
}

#[test]
fn space_after_game_over_starts_a_new_run() {
    let mut session = new_session(MemoryStore::new());
    session.start(0.0);
    let now = run_until_stop(&mut session, 0.0);
    assert_eq!(session.phase(), GamePhase::GameOver);
    session.drain_events();

    assert_eq!(press(&mut session, "Space", now), Some(FrameStatus::Continue));
    assert_eq!(session.phase(), GamePhase::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(session.state().actor.vel, 0.0);
    assert_eq!(session.drain_events(), vec![GameEvent::Started]);

    // Pointer-down maps to a flap, which also restarts after game over
    let now = run_until_stop(&mut session, now);
    assert_eq!(
        session.handle(InputAction::Flap, now),
        FrameStatus::Continue
    );
    assert_eq!(session.phase(), GamePhase::Running);
}

#[test]
fn settings_change_reaches_the_sound_player() {
    let mut session = new_session(MemoryStore::new());
    session.update_settings(Settings {
        muted: true,
        ..Default::default()
    });
    assert_eq!(
        session.sound().volumes,
        vec![Volumes {
            sfx: 0.0,
            music: 0.0
        }]
    );
    assert!(session.settings().muted);
    assert!(
        session
            .store()
            .get(Settings::STORAGE_KEY)
            .unwrap()
            .is_some()
    );
}
