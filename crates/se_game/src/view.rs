//! Read-only draw pass: turns the world into a sprite batch and a HUD frame.

use se_render::SpriteBatch;
use se_ui::{Anchor, ButtonItem, HudFrame};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::menu::{self, MENU_BUTTONS};
use crate::sprite::{ImageCatalog, Sprite};
use crate::state::GameState;
use crate::world::GameWorld;

/// Texture key for sprites whose image is not in the catalog.
pub const PLACEHOLDER_KEY: &str = "__placeholder";

pub const BG_MENU: [u8; 3] = [255, 205, 230];
pub const BG_GAME: [u8; 3] = [255, 255, 255];

const TEXT_DARK: [u8; 3] = [50, 50, 50];
const TEXT_BLACK: [u8; 3] = [0, 0, 0];
const TEXT_RED: [u8; 3] = [255, 0, 0];
const TEXT_GREEN: [u8; 3] = [0, 255, 0];
const TEXT_WHITE: [u8; 3] = [255, 255, 255];
const TEXT_HINT: [u8; 3] = [120, 60, 90];
const BUTTON_FILL: [u8; 3] = [255, 245, 250];
const BUTTON_BORDER: [u8; 3] = [255, 120, 170];
const BUTTON_TEXT: [u8; 3] = [140, 60, 100];

pub fn background(state: GameState) -> [u8; 3] {
    match state {
        GameState::Menu => BG_MENU,
        _ => BG_GAME,
    }
}

/// Flat colour for a missing image, keyed on the image name so each actor
/// stays recognisable without art.
pub fn placeholder_tint(image: &str) -> [f32; 4] {
    if image.starts_with("sweet") {
        [1.0, 0.47, 0.67, 1.0]
    } else if image.starts_with("cake") {
        [0.55, 0.35, 0.2, 1.0]
    } else if image.starts_with("candy") {
        [1.0, 0.78, 0.0, 1.0]
    } else if image.starts_with("goal") {
        [0.2, 0.75, 0.3, 1.0]
    } else {
        [0.6, 0.6, 0.6, 1.0]
    }
}

fn push_sprite(batch: &mut SpriteBatch, catalog: &ImageCatalog, sprite: &Sprite) {
    let center = sprite.pos.to_array();
    let size = sprite.size().to_array();
    if catalog.contains(sprite.image()) {
        batch.push_quad(sprite.image(), center, size, [1.0; 4]);
    } else {
        batch.push_quad(PLACEHOLDER_KEY, center, size, placeholder_tint(sprite.image()));
    }
}

pub fn build_sprite_batch(world: &GameWorld, catalog: &ImageCatalog, batch: &mut SpriteBatch) {
    batch.clear();
    if !world.state.shows_playfield() {
        return;
    }
    let Some(session) = &world.session else {
        return;
    };
    for sprite in session.draw_list() {
        push_sprite(batch, catalog, sprite);
    }
}

pub fn build_hud(world: &GameWorld) -> HudFrame {
    let mut hud = HudFrame::default();
    let center_x = SCREEN_WIDTH / 2.0;
    let center_y = SCREEN_HEIGHT / 2.0;

    if world.state == GameState::Menu {
        hud.text("SWEET ESCAPE", [center_x, 90.0], Anchor::Center, 64.0, TEXT_WHITE);
        for (action, top) in MENU_BUTTONS {
            hud.buttons.push(ButtonItem {
                rect: menu::button_rect(top).as_array(),
                label: menu::button_label(action, world.sound_on),
                fill: BUTTON_FILL,
                border: BUTTON_BORDER,
                text_color: BUTTON_TEXT,
                text_size: 34.0,
            });
        }
        hud.text(
            "Click buttons with mouse",
            [center_x, 410.0],
            Anchor::Center,
            24.0,
            TEXT_HINT,
        );
        return hud;
    }

    let (collected, target) = world
        .session
        .as_ref()
        .map(|s| (s.collected, s.target))
        .unwrap_or((0, world.config().session.candy_target));
    hud.text(
        format!("CANDY: {}/{}", collected, target),
        [12.0, 10.0],
        Anchor::TopLeft,
        30.0,
        TEXT_DARK,
    );

    let banner = match world.state {
        GameState::Lose => Some(("GAME OVER", TEXT_RED, "Press R to restart")),
        GameState::Win => Some(("YOU WIN!", TEXT_GREEN, "Press R to play again")),
        _ => None,
    };
    if let Some((title, color, hint)) = banner {
        hud.text(title, [center_x, center_y], Anchor::Center, 70.0, color);
        hud.text(hint, [center_x, center_y + 60.0], Anchor::Center, 36.0, TEXT_BLACK);
    }
    hud
}
