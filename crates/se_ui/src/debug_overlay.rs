//! egui layer drawn on top of the sprite pass: the HUD/menu primitives every
//! frame, plus a debug window toggled with F3.
//!
//! egui needs a split render: `egui_wgpu::Renderer::render()` takes a
//! `RenderPass<'static>` while `begin_render_pass` borrows the encoder. The
//! phases are:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use se_core::time::TimeState;
use winit::window::Window;

use crate::hud::{paint_hud, HudFrame};

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub state_label: String,
    pub collected: u32,
    pub target: u32,
    pub candies_left: usize,
    pub sprite_count: u32,
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub memory_estimate_mb: f32,
    pub sound_on: bool,
    pub music_label: String,
}

pub struct UiLayer {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl UiLayer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    /// Feed a window event to egui. Returns true when the debug window
    /// consumed it; HUD shapes are not interactive and never consume input.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.debug_visible && response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        hud: &HudFrame,
        time: &TimeState,
        stats: &DebugStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_hud(ctx, hud);
            if debug_visible {
                show_debug_window(ctx, time, stats);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn show_debug_window(ctx: &egui::Context, time: &TimeState, stats: &DebugStats) {
    egui::Window::new("Debug")
        .default_pos([560.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Steps this frame: {}", time.steps_this_frame));
            ui.label(format!("Total steps: {}", time.fixed_step_count));
            ui.separator();
            ui.label(format!("State: {}", stats.state_label));
            ui.label(format!(
                "Candy: {}/{} ({} left)",
                stats.collected, stats.target, stats.candies_left
            ));
            ui.label(format!(
                "Sound: {} ({})",
                if stats.sound_on { "on" } else { "off" },
                stats.music_label
            ));
            ui.separator();
            ui.label(format!("Sprites: {}", stats.sprite_count));
            ui.label(format!("Draw calls: {}", stats.draw_calls));
            ui.label(format!("Texture binds: {}", stats.texture_binds));
            ui.label(format!("Memory: {:.2} MB", stats.memory_estimate_mb));
        });
}
