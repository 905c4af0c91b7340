//! Core application state and lifecycle.

use crate::event_handler::EventHandler;
use crate::picker::{ColorPicker, PalettePicker};
use inkboard_core::{Repaint, Response, ShortcutRegistry, Whiteboard, WhiteboardConfig};
use inkboard_render::{RenderContext, Renderer, RendererError, SkiaRenderer};
use kurbo::Rect;
use peniko::Color;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::error::{EventLoopError, OsError};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] OsError),
    #[error("Presentation surface error: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

/// Host-only settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Initial and minimum window width.
    pub width: u32,
    /// Initial and minimum window height.
    pub height: u32,
    pub background_color: Color,
    pub border_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Inkboard".to_string(),
            width: 900,
            height: 600,
            background_color: Color::from_rgba8(0x1f, 0x1f, 0x28, 0xff),
            border_color: Color::from_rgba8(0x24, 0x7c, 0xa3, 0xff),
        }
    }
}

/// Location of the optional whiteboard settings file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inkboard").join("config.json"))
}

/// Load whiteboard settings, falling back to defaults when the file is
/// missing or rejected.
pub fn load_whiteboard_config(path: Option<&Path>) -> WhiteboardConfig {
    let Some(path) = path else {
        return WhiteboardConfig::default();
    };
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return WhiteboardConfig::default();
    }
    match WhiteboardConfig::load(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring config {}: {}", path.display(), e);
            WhiteboardConfig::default()
        }
    }
}

/// Runtime state that exists once the window does.
struct WindowState {
    window: Arc<Window>,
    /// Kept alive for the surface.
    _context: softbuffer::Context<Arc<Window>>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
}

/// Main application.
pub struct App {
    config: AppConfig,
    board: Whiteboard,
    renderer: SkiaRenderer,
    picker: Box<dyn ColorPicker>,
    events: EventHandler,
    state: Option<WindowState>,
    /// Repaint accumulated since the last presented frame.
    pending: Repaint,
}

impl App {
    /// Create a new application with default host settings and the user's
    /// whiteboard config.
    pub fn new() -> Self {
        let board_config = load_whiteboard_config(config_path().as_deref());
        Self::with_config(AppConfig::default(), board_config)
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig, board_config: WhiteboardConfig) -> Self {
        let board = Whiteboard::with_config(board_config, config.width, config.height);
        Self {
            config,
            board,
            renderer: SkiaRenderer::new(),
            picker: Box::new(PalettePicker::default()),
            events: EventHandler::new(),
            state: None,
            pending: Repaint::Full,
        }
    }

    /// Replace the color picker.
    pub fn with_picker(mut self, picker: Box<dyn ColorPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// The whiteboard engine.
    pub fn board(&self) -> &Whiteboard {
        &self.board
    }

    /// Run the application until the window closes.
    pub fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new();
        ShortcutRegistry::log_all();
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let min_size = LogicalSize::new(self.config.width, self.config.height);
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(min_size)
            .with_min_inner_size(min_size);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        self.state = Some(WindowState {
            window: window.clone(),
            _context: context,
            surface,
        });
        self.handle_scale_factor(window.scale_factor());
        self.handle_resize(window.inner_size());
        window.request_redraw();
        Ok(())
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(state) = self.state.as_mut()
            && let (Some(width), Some(height)) =
                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
            && let Err(e) = state.surface.resize(width, height)
        {
            log::warn!("Failed to resize presentation surface: {}", e);
        }
        let response = self.board.resize(size.width, size.height);
        self.apply(response);
    }

    /// Follow a change of the window's scale factor. The window reports
    /// its new physical size separately.
    fn handle_scale_factor(&mut self, scale_factor: f64) {
        let response = self.board.set_scale_factor(scale_factor);
        self.apply(response);
    }

    /// Act on a handler response: run the color picker if asked and
    /// schedule a redraw.
    fn apply(&mut self, response: Response) {
        let mut repaint = response.repaint;
        if let Some(initial) = response.color_request {
            let picked = self.picker.pick(initial);
            repaint = repaint.merge(self.board.apply_picked_color(picked).repaint);
        }
        self.pending = self.pending.merge(repaint);
        if self.pending.is_needed()
            && let Some(state) = self.state.as_ref()
        {
            state.window.request_redraw();
        }
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let repaint = std::mem::take(&mut self.pending);
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        if self.board.surface().is_zero_area() {
            return Ok(());
        }

        let ctx = RenderContext::new(&self.board)
            .with_background(self.config.background_color)
            .with_border(self.config.border_color);
        self.renderer.build_frame(&ctx)?;

        let mut buffer = state.surface.buffer_mut()?;
        self.renderer.write_xrgb(&mut buffer)?;
        match repaint {
            Repaint::Region(rect) => match damage_rect(rect) {
                Some(damage) => buffer.present_with_damage(&[damage])?,
                None => buffer.present()?,
            },
            Repaint::Full | Repaint::None => buffer.present()?,
        }
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a repaint region to whole-pixel presentation damage.
fn damage_rect(rect: Rect) -> Option<softbuffer::Rect> {
    let rect = rect.expand();
    let x0 = rect.x0.max(0.0);
    let y0 = rect.y0.max(0.0);
    Some(softbuffer::Rect {
        x: x0 as u32,
        y: y0 as u32,
        width: NonZeroU32::new((rect.x1 - x0).max(0.0) as u32)?,
        height: NonZeroU32::new((rect.y1 - y0).max(0.0) as u32)?,
    })
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        log::info!("Creating window...");
        if let Err(e) = self.create_window(event_loop) {
            log::error!("{}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.handle_scale_factor(scale_factor);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.events.set_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = self.events.cursor_moved(position);
                let response = self.board.handle_pointer(&pointer);
                self.apply(response);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(pointer) = self.events.mouse_input(state, button) {
                    let response = self.board.handle_pointer(&pointer);
                    self.apply(response);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = self.events.key_input(&event.logical_key, event.state) {
                    let response = self.board.handle_key(&key, self.events.modifiers());
                    self.apply(response);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::warn!("Failed to present frame: {}", e);
                }
            }
            _ => {}
        }
    }
}
