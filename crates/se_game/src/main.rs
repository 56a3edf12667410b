//! Sweet Escape -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- menu clicks, world update, audio cues
//!   3. Rebuild the sprite batch and HUD from the world
//!   4. Upload camera uniform, issue sprite draws, composite the egui layer
//!
//! The game config is watched via mtime polling; a valid reload is staged and
//! takes effect when the next run starts.

mod audio_director;
mod collision;
mod config;
mod enemy;
mod hero;
mod menu;
#[cfg(test)]
mod replay;
mod session;
mod sprite;
mod state;
mod view;
mod world;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use audio_director::{AudioDirector, Cue};
use config::{load_config_from_path, load_config_or_default, ConfigWatcher};
use se_core::audio::AudioService;
use se_core::input::{InputState, Key};
use se_core::time::TimeState;
use se_platform::window::PlatformConfig;
use se_render::{GpuContext, MeshBuffers, ScreenCamera, SpriteBatch, SpritePipeline, Texture};
use se_ui::{DebugStats, UiLayer};
use sprite::ImageCatalog;
use world::GameWorld;

const ASSET_ROOT: &str = "assets";
const IMAGE_DIR: &str = "assets/images";
const CONFIG_PATH: &str = "assets/config/game.json";

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Everything that exists once the window is up.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    ui: UiLayer,

    // --- Game ---------------------------------------------------------------
    world: GameWorld,
    catalog: Arc<ImageCatalog>,
    audio: Box<dyn AudioService>,
    director: AudioDirector,
    config_watcher: ConfigWatcher,

    // --- Per-frame GPU state ------------------------------------------------
    batch: SpriteBatch,
    mesh: MeshBuffers,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl EngineState {
    fn new(window: Arc<Window>, logical: (u32, u32)) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let ui = UiLayer::new(&gpu.device, gpu.surface_format, &window);
        let camera = ScreenCamera::new(logical.0, logical.1);

        let catalog = Arc::new(ImageCatalog::scan_or_empty(Path::new(IMAGE_DIR)));
        log::info!("Image catalog: {} images", catalog.len());

        let config_path = std::path::PathBuf::from(CONFIG_PATH);
        let game_config = load_config_or_default(&config_path);
        let config_watcher = ConfigWatcher::new(config_path);

        let director = AudioDirector::new(game_config.audio.music_volume);
        let audio = se_audio::open_audio(Path::new(ASSET_ROOT));
        let world = GameWorld::new(game_config, Arc::clone(&catalog), StdRng::from_entropy());

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let mesh = MeshBuffers::new(&gpu.device);

        let mut state = Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            ui,
            world,
            catalog,
            audio,
            director,
            config_watcher,
            batch: SpriteBatch::new(),
            mesh,
            textures: HashMap::new(),
            camera_buffer,
            camera_bind_group,
        };

        let cues = state.world.boot();
        play_cues(
            &mut state.director,
            &state.world,
            &cues,
            state.audio.as_mut(),
        );
        Ok(state)
    }

    fn check_config_reload(&mut self) {
        if !self.config_watcher.should_reload() {
            return;
        }
        match load_config_from_path(self.config_watcher.path()) {
            Ok(config) => self.world.queue_config(config),
            Err(err) => log::error!("Config reload rejected: {}", err),
        }
    }

    /// One fixed step. Returns false when the game asked to exit.
    fn step(&mut self, dt: f32) -> bool {
        if self.input.is_just_pressed(Key::Escape) {
            return false;
        }
        if self.input.is_just_pressed(Key::F3) {
            self.ui.toggle_debug();
        }

        for (x, y) in self.input.take_clicks() {
            let outcome = self.world.click(x, y);
            play_cues(
                &mut self.director,
                &self.world,
                &outcome.cues,
                self.audio.as_mut(),
            );
            if outcome.exit {
                return false;
            }
        }

        let cues = self.world.update(dt, &self.input);
        play_cues(&mut self.director, &self.world, &cues, self.audio.as_mut());
        true
    }

    /// Create GPU textures for every key the batch references. A file that
    /// fails to load is replaced by the white texture once and not retried.
    fn ensure_textures(&mut self) {
        for draw in &self.batch.draw_calls {
            if self.textures.contains_key(&draw.texture_key) {
                continue;
            }
            let key: &str = &draw.texture_key;
            let texture = if key == view::PLACEHOLDER_KEY {
                Texture::white(&self.gpu.device, &self.gpu.queue)
            } else {
                match self.catalog.get(key) {
                    Some(info) => Texture::from_path(&self.gpu.device, &self.gpu.queue, &info.path)
                        .unwrap_or_else(|err| {
                            log::warn!("{}; drawing '{}' untextured", err, key);
                            Texture::white(&self.gpu.device, &self.gpu.queue)
                        }),
                    None => Texture::white(&self.gpu.device, &self.gpu.queue),
                }
            };
            let bind_group = self
                .sprite_pipeline
                .create_texture_bind_group(&self.gpu.device, &texture);
            self.textures.insert(
                Arc::clone(&draw.texture_key),
                GpuSpriteTexture {
                    texture,
                    bind_group,
                },
            );
        }
    }

    fn estimate_memory_mb(&self) -> f32 {
        let texture_bytes: u64 = self
            .textures
            .values()
            .map(|t| {
                let (w, h) = t.texture.size;
                u64::from(w) * u64::from(h) * 4
            })
            .sum();
        let total = texture_bytes + self.mesh.memory_bytes() as u64;
        total as f32 / (1024.0 * 1024.0)
    }

    fn debug_stats(&self) -> DebugStats {
        let session = self.world.session.as_ref();
        DebugStats {
            state_label: self.world.state.label().to_string(),
            collected: session.map_or(0, |s| s.collected),
            target: session.map_or(self.world.config().session.candy_target, |s| s.target),
            candies_left: session.map_or(0, |s| s.candies.len()),
            sprite_count: self.batch.sprite_count() as u32,
            draw_calls: self.batch.draw_calls.len() as u32,
            texture_binds: self.batch.texture_binds() as u32,
            memory_estimate_mb: self.estimate_memory_mb(),
            sound_on: self.world.sound_on,
            music_label: self.director.music_now().unwrap_or("-").to_string(),
        }
    }

    fn render(&mut self) {
        view::build_sprite_batch(&self.world, &self.catalog, &mut self.batch);
        self.ensure_textures();
        self.mesh
            .upload(&self.gpu.device, &self.gpu.queue, &self.batch);
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, frame_view)) = self.gpu.begin_frame() else {
            return;
        };

        let hud = view::build_hud(&self.world);
        let stats = self.debug_stats();
        let (egui_primitives, egui_textures_delta) =
            self.ui.prepare(&self.window, &hud, &self.time, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let clear_color = clear_color(
                view::background(self.world.state),
                self.gpu.surface_format.is_srgb(),
            );
            let mut last_bound_texture_key: Option<&Arc<str>> = None;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !self.batch.is_empty() {
                render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for draw in &self.batch.draw_calls {
                    let Some(texture) = self.textures.get(&draw.texture_key) else {
                        continue;
                    };
                    let need_rebind = match last_bound_texture_key {
                        Some(last) => **last != *draw.texture_key,
                        None => true,
                    };
                    if need_rebind {
                        render_pass.set_bind_group(1, &texture.bind_group, &[]);
                        last_bound_texture_key = Some(&draw.texture_key);
                    }
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.ui.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.ui
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.ui.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = se_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        match EngineState::new(window, (self.config.width, self.config.height)) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Failed to initialise renderer: {}", err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.ui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = state
                    .camera
                    .physical_to_logical((position.x, position.y), state.window.scale_factor());
                state.input.pointer_moved(logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } if !egui_consumed => match button_state {
                ElementState::Pressed => state.input.pointer_pressed(),
                ElementState::Released => state.input.pointer_released(),
            },

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();
                state.check_config_reload();

                let dt = state.time.step_seconds();
                while state.time.should_step() {
                    if !state.step(dt) {
                        log::info!("Exiting.");
                        event_loop.exit();
                        return;
                    }
                }

                state.render();

                // Edge-triggered input survives until a fixed step has seen it.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

/// Dispatch cues at the music volume of the config the world is running,
/// which may have just been swapped in by a run start.
fn play_cues(
    director: &mut AudioDirector,
    world: &GameWorld,
    cues: &[Cue],
    audio: &mut dyn AudioService,
) {
    director.music_volume = world.config().audio.music_volume;
    director.dispatch(cues, world.sound_on, audio);
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

/// sRGB byte colour to a clear colour for the given surface.
fn clear_color(rgb: [u8; 3], srgb_surface: bool) -> wgpu::Color {
    let channel = |c: u8| {
        let v = f64::from(c) / 255.0;
        if !srgb_surface {
            v
        } else if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: channel(rgb[0]),
        g: channel(rgb[1]),
        b: channel(rgb[2]),
        a: 1.0,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Sweet Escape starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_director::RecordingAudio;
    use crate::config::GameConfig;

    #[test]
    fn reloaded_music_volume_applies_to_the_starting_run() {
        let mut world = GameWorld::new(
            GameConfig::default(),
            Arc::new(ImageCatalog::new()),
            StdRng::seed_from_u64(1),
        );
        let mut director = AudioDirector::new(0.6);
        let mut audio = RecordingAudio::default();
        let boot = world.boot();
        play_cues(&mut director, &world, &boot, &mut audio);

        let mut config = GameConfig::default();
        config.audio.music_volume = 0.25;
        world.queue_config(config);
        let start = world.click(400.0, 190.0);
        play_cues(&mut director, &world, &start.cues, &mut audio);

        assert_eq!(audio.calls.last().map(String::as_str), Some("music:bgm@0.25"));
    }

    #[test]
    fn key_map_covers_game_keys() {
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyR), Some(Key::R));
        assert_eq!(map_key(KeyCode::F3), Some(Key::F3));
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn clear_color_linearises_for_srgb_surfaces() {
        let white = clear_color([255, 255, 255], true);
        assert!((white.r - 1.0).abs() < 1e-9);
        let pink = clear_color([255, 205, 230], true);
        let pink_raw = clear_color([255, 205, 230], false);
        assert!(pink.g < pink_raw.g);
        assert!((pink_raw.g - 205.0 / 255.0).abs() < 1e-9);
    }
}
