pub mod debug_overlay;
pub mod hud;

pub use debug_overlay::{DebugStats, UiLayer};
pub use hud::{Anchor, ButtonItem, HudFrame, TextItem};
