//! The game world owned by the frame driver: current state, the active
//! session, the sound toggle and the run RNG.
//!
//! Every entry point returns the cues it raised; nothing here talks to the
//! audio backend.

use std::sync::Arc;

use rand::rngs::StdRng;
use se_core::input::{InputState, Key};

use crate::audio_director::Cue;
use crate::config::GameConfig;
use crate::hero::MoveInput;
use crate::menu::{self, MenuAction};
use crate::session::{GameSession, RunResult};
use crate::sprite::ImageCatalog;
use crate::state::{transition, GameState, Trigger};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOutcome {
    pub cues: Vec<Cue>,
    pub exit: bool,
}

pub struct GameWorld {
    pub state: GameState,
    pub session: Option<GameSession>,
    pub sound_on: bool,
    config: GameConfig,
    pending_config: Option<GameConfig>,
    catalog: Arc<ImageCatalog>,
    rng: StdRng,
}

impl GameWorld {
    pub fn new(config: GameConfig, catalog: Arc<ImageCatalog>, rng: StdRng) -> Self {
        Self {
            state: GameState::Menu,
            session: None,
            sound_on: true,
            config,
            pending_config: None,
            catalog,
            rng,
        }
    }

    /// Cues for entering the initial menu.
    pub fn boot(&self) -> Vec<Cue> {
        self.state.entry_cue().into_iter().collect()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Stage a reloaded config; it replaces the active one at the next run start.
    pub fn queue_config(&mut self, config: GameConfig) {
        log::info!("Config reload staged for next run");
        self.pending_config = Some(config);
    }

    pub fn update(&mut self, dt: f32, input: &InputState) -> Vec<Cue> {
        let mut cues = Vec::new();
        match self.state {
            GameState::Menu => {}
            GameState::Win | GameState::Lose => {
                if input.is_held(Key::R) {
                    self.fire(Trigger::Restart, &mut cues);
                }
            }
            GameState::Play => {
                let Some(session) = self.session.as_mut() else {
                    return cues;
                };
                let outcome = session.update(dt, &MoveInput::from_input(input));
                cues.extend(outcome.cues);
                match outcome.result {
                    Some(RunResult::Caught) => self.fire(Trigger::Caught, &mut cues),
                    Some(RunResult::GoalReached) => self.fire(Trigger::GoalReached, &mut cues),
                    None => {}
                }
            }
        }
        cues
    }

    /// Handle a primary click at logical `(x, y)`. Only the menu reacts.
    pub fn click(&mut self, x: f32, y: f32) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();
        if self.state != GameState::Menu {
            return outcome;
        }
        match menu::hit_test(x, y) {
            Some(MenuAction::Start) => self.fire(Trigger::Start, &mut outcome.cues),
            Some(MenuAction::ToggleSound) => {
                self.sound_on = !self.sound_on;
                log::info!("Sound {}", if self.sound_on { "on" } else { "off" });
                if self.sound_on {
                    self.fire(Trigger::SoundEnabled, &mut outcome.cues);
                } else {
                    outcome.cues.push(Cue::StopMusic);
                }
            }
            Some(MenuAction::Exit) => {
                log::info!("Exit requested from menu");
                outcome.exit = true;
            }
            None => {}
        }
        outcome
    }

    fn fire(&mut self, trigger: Trigger, cues: &mut Vec<Cue>) {
        let Some(next) = transition(self.state, trigger) else {
            return;
        };
        if next == GameState::Play {
            self.start_new_run();
        }
        if next != self.state {
            log::info!("State {} -> {}", self.state.label(), next.label());
        }
        self.state = next;
        cues.extend(next.entry_cue());
    }

    fn start_new_run(&mut self) {
        if let Some(config) = self.pending_config.take() {
            log::info!("Applying reloaded config");
            self.config = config;
        }
        self.session = Some(GameSession::start_new_run(
            &self.config,
            Arc::clone(&self.catalog),
            &mut self.rng,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_director::{
        AudioDirector, RecordingAudio, MUSIC_GAME, MUSIC_MENU, MUSIC_WIN, SFX_HIT, SFX_WIN,
    };
    use glam::Vec2;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;
    const START: (f32, f32) = (400.0, 190.0);
    const SOUND: (f32, f32) = (400.0, 260.0);
    const EXIT: (f32, f32) = (400.0, 330.0);

    fn world() -> GameWorld {
        GameWorld::new(
            GameConfig::default(),
            Arc::new(ImageCatalog::new()),
            StdRng::seed_from_u64(42),
        )
    }

    fn started() -> GameWorld {
        let mut world = world();
        world.click(START.0, START.1);
        world
    }

    #[test]
    fn boots_into_menu_with_menu_music() {
        let world = world();
        assert_eq!(world.state, GameState::Menu);
        assert!(world.session.is_none());
        assert_eq!(world.boot(), vec![Cue::Music(MUSIC_MENU)]);
    }

    #[test]
    fn start_button_begins_a_run() {
        let mut world = world();
        let outcome = world.click(START.0, START.1);
        assert_eq!(world.state, GameState::Play);
        assert_eq!(outcome.cues, vec![Cue::Music(MUSIC_GAME)]);
        assert!(!outcome.exit);
        let session = world.session.as_ref().expect("session after start");
        assert_eq!(session.candies.len(), 20);
    }

    #[test]
    fn menu_update_does_nothing() {
        let mut world = world();
        let mut input = InputState::new();
        input.key_down(Key::Right);
        assert!(world.update(DT, &input).is_empty());
        assert_eq!(world.state, GameState::Menu);
    }

    #[test]
    fn clicks_outside_menu_are_ignored() {
        let mut world = started();
        let outcome = world.click(EXIT.0, EXIT.1);
        assert_eq!(outcome, ClickOutcome::default());
        assert_eq!(world.state, GameState::Play);
    }

    #[test]
    fn exit_button_requests_exit() {
        let mut world = world();
        assert!(world.click(EXIT.0, EXIT.1).exit);
    }

    #[test]
    fn sound_toggle_stops_and_refreshes_music() {
        let mut world = world();
        let mut director = AudioDirector::new(0.6);
        let mut audio = RecordingAudio::default();
        director.dispatch(&world.boot(), world.sound_on, &mut audio);
        assert_eq!(director.music_now(), Some("menu"));

        let off = world.click(SOUND.0, SOUND.1);
        assert!(!world.sound_on);
        assert_eq!(off.cues, vec![Cue::StopMusic]);
        director.dispatch(&off.cues, world.sound_on, &mut audio);
        assert_eq!(director.music_now(), None);

        audio.calls.clear();
        let on = world.click(SOUND.0, SOUND.1);
        assert!(world.sound_on);
        assert_eq!(world.state, GameState::Menu);
        assert_eq!(on.cues, vec![Cue::Music(MUSIC_MENU)]);
        director.dispatch(&on.cues, world.sound_on, &mut audio);
        assert_eq!(audio.calls, vec!["stop", "music:menu@0.6"]);
    }

    #[test]
    fn sound_off_run_produces_no_backend_calls() {
        let mut world = world();
        let mut director = AudioDirector::new(0.6);
        let mut audio = RecordingAudio::default();
        let off = world.click(SOUND.0, SOUND.1);
        director.dispatch(&off.cues, world.sound_on, &mut audio);
        audio.calls.clear();

        let start = world.click(START.0, START.1);
        director.dispatch(&start.cues, world.sound_on, &mut audio);
        assert!(audio.calls.is_empty());
    }

    #[test]
    fn caught_enters_lose_without_music() {
        let mut world = started();
        let session = world.session.as_mut().expect("session");
        let hero = session.hero.sprite.pos;
        session.enemies[0].sprite.pos = hero;

        let cues = world.update(DT, &InputState::new());
        assert_eq!(world.state, GameState::Lose);
        assert_eq!(cues, vec![Cue::Sfx(SFX_HIT)]);
    }

    #[test]
    fn goal_reached_enters_win_with_sfx_then_music() {
        let mut world = started();
        let session = world.session.as_mut().expect("session");
        session.enemies.clear();
        session.candies.clear();
        session.collected = 20;
        session.hero.sprite.pos = Vec2::new(730.0, 60.0);

        let cues = world.update(DT, &InputState::new());
        assert_eq!(world.state, GameState::Win);
        assert_eq!(cues, vec![Cue::Sfx(SFX_WIN), Cue::Music(MUSIC_WIN)]);
    }

    #[test]
    fn restart_key_starts_fresh_run() {
        let mut world = started();
        world.state = GameState::Lose;
        world.session.as_mut().expect("session").collected = 7;

        assert!(world.update(DT, &InputState::new()).is_empty());
        assert_eq!(world.state, GameState::Lose);

        let mut input = InputState::new();
        input.key_down(Key::R);
        let cues = world.update(DT, &input);
        assert_eq!(world.state, GameState::Play);
        assert_eq!(cues, vec![Cue::Music(MUSIC_GAME)]);
        assert_eq!(world.session.as_ref().map(|s| s.collected), Some(0));
    }

    #[test]
    fn play_without_session_is_a_no_op() {
        let mut world = started();
        world.session = None;
        assert!(world.update(DT, &InputState::new()).is_empty());
        assert_eq!(world.state, GameState::Play);
    }

    #[test]
    fn reloaded_config_applies_at_next_run() {
        let mut world = started();
        let mut config = GameConfig::default();
        config.session.candy_target = 5;
        world.queue_config(config);
        assert_eq!(world.session.as_ref().map(|s| s.target), Some(20));

        world.state = GameState::Win;
        let mut input = InputState::new();
        input.key_down(Key::R);
        world.update(DT, &input);
        assert_eq!(world.session.as_ref().map(|s| s.target), Some(5));
        assert_eq!(world.config().session.candy_target, 5);
    }
}
