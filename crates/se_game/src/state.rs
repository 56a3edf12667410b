//! Top-level game states and the transition table between them.

use crate::audio_director::{Cue, MUSIC_GAME, MUSIC_MENU, MUSIC_WIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Menu,
    Play,
    Win,
    Lose,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Play => "play",
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }

    /// Music cue emitted on entering this state.
    pub fn entry_cue(self) -> Option<Cue> {
        match self {
            Self::Menu => Some(Cue::Music(MUSIC_MENU)),
            Self::Play => Some(Cue::Music(MUSIC_GAME)),
            Self::Win => Some(Cue::Music(MUSIC_WIN)),
            Self::Lose => None,
        }
    }

    /// Whether the playfield (hero, enemies, candies) is drawn.
    pub fn shows_playfield(self) -> bool {
        !matches!(self, Self::Menu)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Caught,
    GoalReached,
    Restart,
    /// Sound switched back on from the menu; re-enters the menu.
    SoundEnabled,
}

/// `None` means the trigger does not apply in `state`.
pub fn transition(state: GameState, trigger: Trigger) -> Option<GameState> {
    use GameState::*;
    match (state, trigger) {
        (Menu, Trigger::Start) => Some(Play),
        (Menu, Trigger::SoundEnabled) => Some(Menu),
        (Play, Trigger::Caught) => Some(Lose),
        (Play, Trigger::GoalReached) => Some(Win),
        (Win | Lose, Trigger::Restart) => Some(Play),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [GameState; 4] =
        [GameState::Menu, GameState::Play, GameState::Win, GameState::Lose];

    #[test]
    fn initial_state_is_menu() {
        assert_eq!(GameState::default(), GameState::Menu);
    }

    #[test]
    fn menu_start_enters_play() {
        assert_eq!(transition(GameState::Menu, Trigger::Start), Some(GameState::Play));
    }

    #[test]
    fn play_outcomes() {
        assert_eq!(transition(GameState::Play, Trigger::Caught), Some(GameState::Lose));
        assert_eq!(
            transition(GameState::Play, Trigger::GoalReached),
            Some(GameState::Win)
        );
    }

    #[test]
    fn restart_only_from_end_states() {
        assert_eq!(transition(GameState::Win, Trigger::Restart), Some(GameState::Play));
        assert_eq!(transition(GameState::Lose, Trigger::Restart), Some(GameState::Play));
        assert_eq!(transition(GameState::Play, Trigger::Restart), None);
        assert_eq!(transition(GameState::Menu, Trigger::Restart), None);
    }

    #[test]
    fn sound_enabled_refreshes_menu_only() {
        for state in ALL_STATES {
            let expected = (state == GameState::Menu).then_some(GameState::Menu);
            assert_eq!(transition(state, Trigger::SoundEnabled), expected);
        }
    }

    #[test]
    fn end_states_ignore_play_triggers() {
        for state in [GameState::Win, GameState::Lose] {
            assert_eq!(transition(state, Trigger::Caught), None);
            assert_eq!(transition(state, Trigger::GoalReached), None);
            assert_eq!(transition(state, Trigger::Start), None);
        }
    }

    #[test]
    fn entry_cues() {
        assert_eq!(GameState::Menu.entry_cue(), Some(Cue::Music("menu")));
        assert_eq!(GameState::Play.entry_cue(), Some(Cue::Music("bgm")));
        assert_eq!(GameState::Win.entry_cue(), Some(Cue::Music("win")));
        assert_eq!(GameState::Lose.entry_cue(), None);
    }
}
