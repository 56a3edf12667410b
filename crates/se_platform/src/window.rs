use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    /// Logical size; the game draws in this coordinate space regardless of DPI.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Sweet Escape".to_string(),
            width: 800,
            height: 450,
            resizable: false,
        }
    }
}

impl PlatformConfig {
    pub fn logical_size(&self) -> LogicalSize<u32> {
        LogicalSize::new(self.width, self.height)
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(config.logical_size())
        .with_resizable(config.resizable);

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!(
        "Window scale factor {:.2} for logical {}x{}",
        window.scale_factor(),
        config.width,
        config.height
    );
    Arc::new(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_800_by_450() {
        let config = PlatformConfig::default();
        assert_eq!(config.logical_size(), LogicalSize::new(800, 450));
        assert!(!config.resizable);
        assert_eq!(config.title, "Sweet Escape");
    }
}
