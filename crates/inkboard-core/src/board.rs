//! The whiteboard engine.
//!
//! [`Whiteboard`] owns the surface, its history and the drawing state, and
//! turns host events into mutations of them. The surface and pointer
//! positions are in physical pixels. Overlay layouts are recomputed on demand
//! in logical pixels, the physical size divided by the scale factor. Every handler runs to completion
//! synchronously and reports what the host needs to repaint.

use crate::config::WhiteboardConfig;
use crate::history::History;
use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::overlay::{self, ButtonId, OverlayHit, SliderLayout, ToolbarLayout, WidthRange};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::surface::Surface;
use crate::tools::{ToolKind, ToolManager, ToolSelection};
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Which part of the host needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Repaint {
    #[default]
    None,
    /// Only this region of the canvas changed.
    Region(Rect),
    /// Repaint everything.
    Full,
}

impl Repaint {
    /// Combine two repaint requests.
    pub fn merge(self, other: Repaint) -> Repaint {
        match (self, other) {
            (Repaint::Full, _) | (_, Repaint::Full) => Repaint::Full,
            (Repaint::Region(a), Repaint::Region(b)) => Repaint::Region(a.union(b)),
            (Repaint::Region(r), Repaint::None) | (Repaint::None, Repaint::Region(r)) => {
                Repaint::Region(r)
            }
            (Repaint::None, Repaint::None) => Repaint::None,
        }
    }

    /// Check if anything needs repainting.
    pub fn is_needed(&self) -> bool {
        !matches!(self, Repaint::None)
    }
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    /// Repaint request for the host.
    pub repaint: Repaint,
    /// Set when the host should open its color picker, seeded with this color.
    /// The picked color goes back through [`Whiteboard::apply_picked_color`].
    pub color_request: Option<Color>,
}

impl Response {
    /// Nothing changed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything needs repainting.
    pub fn full() -> Self {
        Self {
            repaint: Repaint::Full,
            color_request: None,
        }
    }

    /// Only `damage` needs repainting, if anything.
    pub fn region(damage: Option<Rect>) -> Self {
        Self {
            repaint: damage.map_or(Repaint::None, Repaint::Region),
            color_request: None,
        }
    }

    fn changed(changed: bool) -> Self {
        if changed { Self::full() } else { Self::none() }
    }
}

/// An interactive drawing surface with history and overlays.
#[derive(Debug, Clone)]
pub struct Whiteboard {
    config: WhiteboardConfig,
    surface: Surface,
    history: History,
    tools: ToolManager,
    slider_visible: bool,
    slider_dragging: bool,
    scale_factor: f64,
}

impl Whiteboard {
    /// Create a blank whiteboard with default settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(WhiteboardConfig::default(), width, height)
    }

    /// Create a blank whiteboard.
    pub fn with_config(config: WhiteboardConfig, width: u32, height: u32) -> Self {
        let surface = Surface::new(width, height);
        let history = History::new(&surface, config.history_capacity);
        let range = WidthRange::new(config.min_width, config.max_width);
        let tools = ToolManager::new(config.default_color(), range.clamp(config.default_width));
        Self {
            config,
            surface,
            history,
            tools,
            slider_visible: false,
            slider_dragging: false,
            scale_factor: 1.0,
        }
    }

    /// Settings this whiteboard was created with.
    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    /// The drawing bitmap.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tool, color, width and stroke state.
    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn pen_color(&self) -> Color {
        self.tools.color
    }

    pub fn pen_width(&self) -> u32 {
        self.tools.width
    }

    /// Check if a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.tools.is_active()
    }

    pub fn slider_visible(&self) -> bool {
        self.slider_visible
    }

    /// Selectable stroke widths.
    pub fn width_range(&self) -> WidthRange {
        WidthRange::new(self.config.min_width, self.config.max_width)
    }

    /// Current host size; the surface always matches it.
    pub fn host_size(&self) -> Size {
        self.surface.size()
    }

    /// Ratio of physical to logical pixels.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Host size in logical pixels.
    pub fn logical_size(&self) -> Size {
        let size = self.host_size();
        Size::new(size.width / self.scale_factor, size.height / self.scale_factor)
    }

    /// Toolbar geometry in logical pixels.
    pub fn toolbar_layout(&self) -> ToolbarLayout {
        ToolbarLayout::compute(self.logical_size())
    }

    /// Slider geometry in logical pixels, visible or not.
    pub fn slider_layout(&self) -> SliderLayout {
        SliderLayout::compute(&self.toolbar_layout(), self.width_range())
    }

    /// Slider geometry if the slider is showing.
    pub fn visible_slider(&self) -> Option<SliderLayout> {
        self.slider_visible.then(|| self.slider_layout())
    }

    /// Follow a host resize. Resizing is not recorded in history.
    pub fn resize(&mut self, width: u32, height: u32) -> Response {
        if !self.surface.resize(width, height) {
            return Response::none();
        }
        log::debug!("Resized surface to {}x{}", width, height);
        Response::full()
    }

    /// Change the scale factor. Non-positive or non-finite factors are ignored.
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Response {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            log::warn!("Ignoring invalid scale factor {}", scale_factor);
            return Response::none();
        }
        if scale_factor == self.scale_factor {
            return Response::none();
        }
        log::debug!("Scale factor changed to {}", scale_factor);
        self.scale_factor = scale_factor;
        Response::full()
    }

    /// Process a pointer event. Positions are in physical pixels.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Response {
        match *event {
            PointerEvent::Down { position, button } => match button {
                MouseButton::Left => self.press(position),
                MouseButton::Right => self.secondary_action(),
                MouseButton::Middle => Response::none(),
            },
            PointerEvent::Move { position } => {
                if self.slider_dragging {
                    self.drag_slider(position.x)
                } else {
                    Response::region(self.tools.update(&mut self.surface, position))
                }
            }
            PointerEvent::Up { button, .. } => {
                if button != MouseButton::Left {
                    return Response::none();
                }
                if self.slider_dragging {
                    self.slider_dragging = false;
                    return Response::none();
                }
                self.end_stroke()
            }
        }
    }

    /// Process a keyboard event through the shortcut registry.
    pub fn handle_key(&mut self, event: &KeyEvent, modifiers: Modifiers) -> Response {
        let KeyEvent::Pressed(key) = event else {
            return Response::none();
        };
        match ShortcutRegistry::resolve(key, modifiers) {
            Some(action) => self.run_shortcut(action),
            None => Response::none(),
        }
    }

    /// Perform a shortcut action.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> Response {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Clear => self.clear(),
        }
    }

    /// Activate a toolbar button.
    pub fn press_button(&mut self, id: ButtonId) -> Response {
        log::debug!("Toolbar button: {}", id.name());
        match id {
            ButtonId::Pen => self.select_tool(ToolKind::Pen),
            ButtonId::Eraser => self.select_tool(ToolKind::Eraser),
            ButtonId::Clear => self.clear(),
            ButtonId::Undo => self.undo(),
            ButtonId::Redo => self.redo(),
            ButtonId::Color => self.request_color(),
        }
    }

    /// Select a tool. Selecting the active tool toggles the width slider
    /// instead; switching tools hides it.
    pub fn select_tool(&mut self, tool: ToolKind) -> Response {
        match self.tools.select(tool) {
            ToolSelection::AlreadyActive => {
                self.slider_visible = !self.slider_visible;
            }
            ToolSelection::Switched => {
                log::debug!("Switched to {}", tool.name());
                self.slider_visible = false;
            }
        }
        self.slider_dragging = false;
        Response::full()
    }

    /// Show or hide the width slider.
    pub fn toggle_slider(&mut self) -> Response {
        self.slider_visible = !self.slider_visible;
        self.slider_dragging = false;
        Response::full()
    }

    /// Set the stroke width, clamped to the configured range.
    pub fn set_width(&mut self, width: u32) -> Response {
        let width = self.width_range().clamp(width);
        if width == self.tools.width {
            return Response::none();
        }
        self.tools.width = width;
        Response::full()
    }

    /// Ask the host for a new pen color.
    pub fn request_color(&mut self) -> Response {
        self.hide_slider();
        Response {
            repaint: Repaint::Full,
            color_request: Some(self.tools.color),
        }
    }

    /// Accept the result of a color pick. `None` means the pick was cancelled.
    pub fn apply_picked_color(&mut self, color: Option<Color>) -> Response {
        let Some(color) = color else {
            log::debug!("Color pick cancelled");
            return Response::none();
        };
        self.tools.color = color;
        self.hide_slider();
        Response::full()
    }

    /// Erase everything. Recorded as one undoable edit.
    pub fn clear(&mut self) -> Response {
        self.abandon_stroke();
        self.hide_slider();
        self.surface.clear();
        self.history.push_snapshot(&self.surface);
        log::info!("Board cleared");
        Response::full()
    }

    /// Undo the last stroke or clear.
    pub fn undo(&mut self) -> Response {
        let abandoned = self.abandon_stroke();
        let was_visible = self.hide_slider();
        let undone = self.history.undo(&mut self.surface);
        if undone {
            log::info!("Undo performed");
        } else {
            log::info!("Nothing to undo");
        }
        Response::changed(undone || abandoned || was_visible)
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) -> Response {
        let abandoned = self.abandon_stroke();
        let was_visible = self.hide_slider();
        let redone = self.history.redo(&mut self.surface);
        if redone {
            log::info!("Redo performed");
        } else {
            log::info!("Nothing to redo");
        }
        Response::changed(redone || abandoned || was_visible)
    }

    fn press(&mut self, position: Point) -> Response {
        if self.tools.is_active() {
            return Response::none();
        }

        let toolbar = self.toolbar_layout();
        let slider = self.visible_slider();
        match overlay::hit_test(self.to_logical(position), &toolbar, slider.as_ref()) {
            OverlayHit::Slider => {
                self.slider_dragging = true;
                self.drag_slider(position.x);
                Response::full()
            }
            OverlayHit::Button(id) => self.press_button(id),
            OverlayHit::Toolbar => Response::none(),
            OverlayHit::Canvas => Response::region(self.tools.begin(&mut self.surface, position)),
        }
    }

    fn secondary_action(&mut self) -> Response {
        if self.tools.current_tool == ToolKind::Pen {
            self.toggle_slider()
        } else {
            Response::none()
        }
    }

    fn drag_slider(&mut self, x: f64) -> Response {
        let value = self
            .slider_layout()
            .value_from_pointer_x(x / self.scale_factor);
        self.set_width(value)
    }

    fn end_stroke(&mut self) -> Response {
        if !self.tools.end() {
            return Response::none();
        }
        self.history.push_snapshot(&self.surface);
        Response::full()
    }

    fn to_logical(&self, position: Point) -> Point {
        Point::new(position.x / self.scale_factor, position.y / self.scale_factor)
    }

    /// Drop an unfinished stroke, putting back the last recorded state.
    /// Returns whether a stroke was in progress.
    fn abandon_stroke(&mut self) -> bool {
        if !self.tools.is_active() {
            return false;
        }
        self.tools.cancel();
        if let Some(top) = self.history.current() {
            self.surface.restore(top);
        }
        log::debug!("Abandoned unfinished stroke");
        true
    }

    /// Hide the slider; returns whether it was visible.
    fn hide_slider(&mut self) -> bool {
        self.slider_dragging = false;
        std::mem::replace(&mut self.slider_visible, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn right_down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Right,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn draw(board: &mut Whiteboard, from: (f64, f64), to: (f64, f64)) {
        board.handle_pointer(&down(from.0, from.1));
        board.handle_pointer(&moved(to.0, to.1));
        board.handle_pointer(&up(to.0, to.1));
    }

    fn red_board() -> Whiteboard {
        let mut board = Whiteboard::new(200, 200);
        board.apply_picked_color(Some(red()));
        board.set_width(4);
        board
    }

    fn click(board: &mut Whiteboard, id: ButtonId) -> Response {
        let center = board.toolbar_layout().button_rect(id).center();
        let response = board.handle_pointer(&down(center.x, center.y));
        board.handle_pointer(&up(center.x, center.y));
        response
    }

    #[test]
    fn test_initial_state() {
        let board = Whiteboard::new(900, 600);
        assert_eq!(board.active_tool(), ToolKind::Pen);
        assert_eq!(board.pen_width(), 4);
        assert_eq!(board.pen_color(), Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff));
        assert!(!board.slider_visible());
        assert!(!board.is_drawing());
        assert!(board.surface().is_blank());
        assert_eq!(board.history().undo_len(), 1);
    }

    #[test]
    fn test_stroke_then_undo_leaves_transparent() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));

        let px = board.surface().pixel(30, 30).unwrap();
        assert!(px.alpha() > 200 && px.red() > 200);

        board.undo();
        assert_eq!(board.surface().pixel(30, 30).unwrap().alpha(), 0);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));
        let stroked = board.surface().snapshot();

        board.clear();
        assert!(board.surface().is_blank());

        board.undo();
        assert_eq!(board.surface().snapshot(), stroked);
        assert!(board.surface().pixel(30, 30).unwrap().red() > 200);
    }

    #[test]
    fn test_one_snapshot_per_stroke() {
        let mut board = red_board();
        board.handle_pointer(&down(10.0, 10.0));
        for i in 0..20 {
            board.handle_pointer(&moved(10.0 + i as f64 * 5.0, 20.0));
        }
        assert_eq!(board.history().undo_len(), 1);
        board.handle_pointer(&up(110.0, 20.0));
        assert_eq!(board.history().undo_len(), 2);
    }

    #[test]
    fn test_single_click_marks_dot() {
        let mut board = red_board();
        board.handle_pointer(&down(100.5, 100.5));
        board.handle_pointer(&up(100.5, 100.5));
        assert!(board.surface().pixel(100, 100).unwrap().alpha() > 0);
        assert!(board.history().can_undo());
    }

    #[test]
    fn test_undo_redo_sequence_restores_exactly() {
        let mut board = red_board();
        let blank = board.surface().snapshot();
        let mut states = Vec::new();
        for i in 0..6 {
            let y = 10.0 + i as f64 * 12.0;
            if i == 3 {
                board.clear();
            } else {
                draw(&mut board, (5.0, y), (90.0, y + 30.0));
            }
            states.push(board.surface().snapshot());
        }

        for _ in 0..states.len() {
            board.undo();
        }
        assert_eq!(board.surface().snapshot(), blank);

        for _ in 0..states.len() {
            board.redo();
        }
        assert_eq!(&board.surface().snapshot(), states.last().unwrap());
    }

    #[test]
    fn test_new_edit_after_undo_drops_redo() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));
        board.undo();
        assert!(board.history().can_redo());

        draw(&mut board, (60.0, 60.0), (90.0, 90.0));
        assert!(!board.history().can_redo());
        assert_eq!(board.redo(), Response::none());
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let mut board = red_board();
        let response = board.handle_pointer(&moved(20.0, 20.0));
        assert_eq!(response.repaint, Repaint::None);
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_stroke_segments_report_damage() {
        let mut board = red_board();
        board.handle_pointer(&down(20.0, 20.0));
        let response = board.handle_pointer(&moved(40.0, 20.0));
        let Repaint::Region(damage) = response.repaint else {
            panic!("expected a region, got {:?}", response.repaint);
        };
        assert!(damage.contains(Point::new(30.0, 20.0)));
        assert!(damage.width() < 50.0);
    }

    #[test]
    fn test_eraser_clears_and_records() {
        let mut board = red_board();
        draw(&mut board, (10.0, 100.0), (190.0, 100.0));
        board.select_tool(ToolKind::Eraser);
        draw(&mut board, (100.0, 60.0), (100.0, 140.0));

        assert_eq!(board.surface().pixel(100, 100).unwrap().alpha(), 0);
        assert!(board.surface().pixel(30, 100).unwrap().alpha() > 200);
        assert_eq!(board.history().undo_len(), 3);
    }

    #[test]
    fn test_tool_selection_policy() {
        let mut board = Whiteboard::new(900, 600);

        board.select_tool(ToolKind::Pen);
        assert!(board.slider_visible());
        board.select_tool(ToolKind::Pen);
        assert!(!board.slider_visible());

        board.select_tool(ToolKind::Pen);
        board.select_tool(ToolKind::Eraser);
        assert_eq!(board.active_tool(), ToolKind::Eraser);
        assert!(!board.slider_visible());

        board.select_tool(ToolKind::Eraser);
        assert!(board.slider_visible());
    }

    #[test]
    fn test_right_click_toggles_slider_for_pen_only() {
        let mut board = Whiteboard::new(900, 600);
        board.handle_pointer(&right_down(100.0, 100.0));
        assert!(board.slider_visible());
        board.handle_pointer(&right_down(100.0, 100.0));
        assert!(!board.slider_visible());

        board.select_tool(ToolKind::Eraser);
        board.handle_pointer(&right_down(100.0, 100.0));
        assert!(!board.slider_visible());
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_toolbar_buttons_do_not_draw() {
        let mut board = Whiteboard::new(900, 600);
        click(&mut board, ButtonId::Eraser);
        assert_eq!(board.active_tool(), ToolKind::Eraser);
        click(&mut board, ButtonId::Pen);
        assert_eq!(board.active_tool(), ToolKind::Pen);

        // Toolbar background swallows presses too.
        let toolbar = board.toolbar_layout();
        board.handle_pointer(&down(toolbar.rect.x0 + 3.0, toolbar.rect.center().y));
        assert!(!board.is_drawing());
        board.handle_pointer(&up(toolbar.rect.x0 + 3.0, toolbar.rect.center().y));

        assert!(board.surface().is_blank());
        assert_eq!(board.history().undo_len(), 1);
    }

    #[test]
    fn test_history_buttons() {
        let mut board = Whiteboard::new(900, 600);
        draw(&mut board, (100.0, 100.0), (200.0, 150.0));

        click(&mut board, ButtonId::Undo);
        assert!(board.surface().is_blank());
        click(&mut board, ButtonId::Redo);
        assert!(!board.surface().is_blank());
        click(&mut board, ButtonId::Clear);
        assert!(board.surface().is_blank());
        assert_eq!(board.history().undo_len(), 3);
    }

    #[test]
    fn test_color_button_requests_pick() {
        let mut board = Whiteboard::new(900, 600);
        board.toggle_slider();

        let response = click(&mut board, ButtonId::Color);
        assert_eq!(response.color_request, Some(board.pen_color()));
        assert!(!board.slider_visible());

        assert_eq!(board.apply_picked_color(None), Response::none());
        assert_eq!(board.pen_color(), Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff));

        board.apply_picked_color(Some(red()));
        assert_eq!(board.pen_color(), red());
    }

    #[test]
    fn test_slider_drag_sets_width() {
        let mut board = Whiteboard::new(900, 600);
        board.toggle_slider();
        let slider = board.slider_layout();
        let y = slider.rect.center().y;

        board.handle_pointer(&down(slider.track.x0, y));
        assert_eq!(board.pen_width(), 1);

        board.handle_pointer(&moved(slider.track.x1 - 1.0, y));
        assert_eq!(board.pen_width(), 30);

        // Dragging far beyond the slider keeps clamping.
        board.handle_pointer(&moved(-400.0, 10.0));
        assert_eq!(board.pen_width(), 1);
        board.handle_pointer(&up(-400.0, 10.0));

        // After release, moves draw nothing and leave the width alone.
        board.handle_pointer(&moved(slider.track.x1, y));
        assert_eq!(board.pen_width(), 1);
        assert!(board.surface().is_blank());
        assert_eq!(board.history().undo_len(), 1);
    }

    #[test]
    fn test_hidden_slider_area_is_canvas() {
        let mut board = Whiteboard::new(900, 600);
        let center = board.slider_layout().rect.center();
        board.handle_pointer(&down(center.x, center.y));
        assert!(board.is_drawing());
    }

    #[test]
    fn test_actions_hide_slider() {
        let mut board = Whiteboard::new(900, 600);
        for action in [ShortcutAction::Undo, ShortcutAction::Redo, ShortcutAction::Clear] {
            board.toggle_slider();
            assert!(board.slider_visible());
            board.run_shortcut(action);
            assert!(!board.slider_visible());
        }
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        let ctrl_shift = Modifiers {
            ctrl: true,
            shift: true,
            ..Default::default()
        };
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));

        board.handle_key(&KeyEvent::Pressed("z".into()), ctrl);
        assert!(board.surface().is_blank());
        board.handle_key(&KeyEvent::Pressed("Z".into()), ctrl_shift);
        assert!(!board.surface().is_blank());
        board.handle_key(&KeyEvent::Pressed("z".into()), ctrl);
        board.handle_key(&KeyEvent::Pressed("y".into()), ctrl);
        assert!(!board.surface().is_blank());
        board.handle_key(&KeyEvent::Pressed("k".into()), ctrl);
        assert!(board.surface().is_blank());

        // Releases and plain letters are ignored.
        assert_eq!(board.handle_key(&KeyEvent::Released("z".into()), ctrl), Response::none());
        assert_eq!(
            board.handle_key(&KeyEvent::Pressed("z".into()), Modifiers::default()),
            Response::none()
        );
    }

    #[test]
    fn test_clear_mid_stroke_ends_stroke_without_snapshot() {
        let mut board = red_board();
        board.handle_pointer(&down(10.0, 10.0));
        board.handle_pointer(&moved(50.0, 50.0));
        board.clear();

        assert!(!board.is_drawing());
        assert_eq!(board.history().undo_len(), 2);
        // The release no longer records anything.
        board.handle_pointer(&up(50.0, 50.0));
        assert_eq!(board.history().undo_len(), 2);
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_width_change_applies_to_next_segment() {
        let mut board = red_board();
        board.set_width(2);
        board.handle_pointer(&down(20.0, 40.0));
        board.handle_pointer(&moved(60.0, 40.0));
        board.set_width(20);
        board.handle_pointer(&moved(100.0, 40.0));
        board.handle_pointer(&up(100.0, 40.0));

        // Thin first half, thick second half.
        assert_eq!(board.surface().pixel(40, 48).unwrap().alpha(), 0);
        assert!(board.surface().pixel(80, 48).unwrap().alpha() > 200);
    }

    #[test]
    fn test_set_width_clamps() {
        let mut board = Whiteboard::new(100, 100);
        board.set_width(0);
        assert_eq!(board.pen_width(), 1);
        board.set_width(1000);
        assert_eq!(board.pen_width(), 30);
    }

    #[test]
    fn test_resize_preserves_drawing_without_history() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));
        let before = board.surface().snapshot();

        assert_eq!(board.resize(400, 300), Response::full());
        assert_eq!(board.resize(400, 300), Response::none());
        assert_eq!(board.history().undo_len(), 2);
        assert_eq!(board.host_size(), Size::new(400.0, 300.0));
        assert_eq!(board.surface().pixel(30, 30), before.pixel(30, 30));

        // The toolbar follows the new size.
        assert!((board.toolbar_layout().rect.center().x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undo_after_resize_keeps_host_size() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 50.0));
        board.resize(500, 400);
        draw(&mut board, (300.0, 300.0), (350.0, 350.0));

        board.undo();
        assert_eq!((board.surface().width(), board.surface().height()), (500, 400));
        assert!(board.surface().pixel(30, 30).unwrap().alpha() > 0);
        assert_eq!(board.surface().pixel(325, 325).unwrap().alpha(), 0);
    }

    #[test]
    fn test_zero_size_board() {
        let mut board = red_board();
        board.resize(0, 0);
        draw(&mut board, (1.0, 1.0), (5.0, 5.0));
        assert!(board.surface().is_blank());
        board.resize(50, 50);
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = WhiteboardConfig {
            history_capacity: 3,
            ..Default::default()
        };
        let mut board = Whiteboard::with_config(config, 100, 100);
        for i in 0..6 {
            let y = 10.0 + i as f64 * 10.0;
            draw(&mut board, (5.0, y), (95.0, y));
        }
        // Three undoable edits on top of the oldest kept state.
        assert_eq!(board.history().undo_len(), 4);
        let mut undone = 0;
        while board.history().can_undo() {
            board.undo();
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert!(!board.surface().is_blank());
    }

    #[test]
    fn test_capacity_strokes_undo_to_blank() {
        let config = WhiteboardConfig {
            history_capacity: 3,
            ..Default::default()
        };
        let mut board = Whiteboard::with_config(config, 100, 100);
        for i in 0..3 {
            let y = 10.0 + i as f64 * 10.0;
            draw(&mut board, (5.0, y), (95.0, y));
        }
        for _ in 0..3 {
            board.undo();
        }
        assert!(board.surface().is_blank());
    }

    fn assert_mirrors_history(board: &Whiteboard) {
        assert_eq!(board.history().current(), Some(&board.surface().snapshot()));
    }

    #[test]
    fn test_undo_mid_first_stroke_discards_it() {
        let mut board = red_board();
        board.handle_pointer(&down(10.0, 10.0));
        board.handle_pointer(&moved(100.0, 100.0));
        assert!(!board.surface().is_blank());

        assert_eq!(board.undo(), Response::full());
        assert!(!board.is_drawing());
        assert!(board.surface().is_blank());
        assert_mirrors_history(&board);

        board.handle_pointer(&moved(150.0, 150.0));
        board.handle_pointer(&up(150.0, 150.0));
        assert_eq!(board.history().undo_len(), 1);
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_undo_mid_stroke_discards_it_and_undoes() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 10.0));
        board.handle_pointer(&down(10.0, 100.0));
        board.handle_pointer(&moved(150.0, 100.0));

        board.undo();
        assert!(board.surface().is_blank());
        assert_eq!(board.history().undo_len(), 1);
        assert_eq!(board.history().redo_len(), 1);
        assert_mirrors_history(&board);

        // The redone state holds only the recorded stroke.
        board.redo();
        assert!(board.surface().pixel(30, 10).unwrap().alpha() > 0);
        assert_eq!(board.surface().pixel(80, 100).unwrap().alpha(), 0);
    }

    #[test]
    fn test_redo_mid_stroke_with_nothing_to_redo() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 10.0));
        let recorded = board.surface().snapshot();
        board.handle_pointer(&down(10.0, 100.0));
        board.handle_pointer(&moved(150.0, 100.0));

        assert_eq!(board.redo(), Response::full());
        assert!(!board.is_drawing());
        assert_eq!(board.surface().snapshot(), recorded);
        assert_mirrors_history(&board);

        board.handle_pointer(&up(150.0, 100.0));
        assert_eq!(board.history().undo_len(), 2);
    }

    #[test]
    fn test_redo_mid_stroke_restores_redone_state() {
        let mut board = red_board();
        draw(&mut board, (10.0, 10.0), (50.0, 10.0));
        let recorded = board.surface().snapshot();
        board.undo();
        board.handle_pointer(&down(10.0, 100.0));
        board.handle_pointer(&moved(150.0, 100.0));

        board.redo();
        assert!(!board.is_drawing());
        assert_eq!(board.surface().snapshot(), recorded);
        assert_mirrors_history(&board);
        assert_eq!(board.history().redo_len(), 0);
    }

    #[test]
    fn test_overlays_lay_out_in_logical_pixels() {
        let mut board = Whiteboard::new(1800, 1200);
        assert_eq!(board.set_scale_factor(2.0), Response::full());
        assert_eq!(board.set_scale_factor(2.0), Response::none());
        assert_eq!(board.set_scale_factor(0.0), Response::none());
        assert_eq!(board.set_scale_factor(f64::NAN), Response::none());
        assert_eq!(board.scale_factor(), 2.0);

        let logical = Whiteboard::new(900, 600);
        assert_eq!(board.logical_size(), Size::new(900.0, 600.0));
        assert_eq!(board.toolbar_layout(), logical.toolbar_layout());
    }

    #[test]
    fn test_scaled_pointer_hits_toolbar() {
        let mut board = Whiteboard::new(1800, 1200);
        board.set_scale_factor(2.0);
        let eraser = board.toolbar_layout().button_rect(ButtonId::Eraser).center();
        board.handle_pointer(&down(eraser.x * 2.0, eraser.y * 2.0));
        board.handle_pointer(&up(eraser.x * 2.0, eraser.y * 2.0));
        assert_eq!(board.active_tool(), ToolKind::Eraser);
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_scaled_slider_drag() {
        let mut board = Whiteboard::new(1800, 1200);
        board.set_scale_factor(2.0);
        board.toggle_slider();
        let track = board.slider_layout().track;
        let y = track.center().y * 2.0;
        board.handle_pointer(&down(track.x1 * 2.0, y));
        assert_eq!(board.pen_width(), board.width_range().max);
        board.handle_pointer(&moved(track.x0 * 2.0, y));
        assert_eq!(board.pen_width(), board.width_range().min);
        board.handle_pointer(&up(track.x0 * 2.0, y));
        assert!(board.surface().is_blank());
    }

    #[test]
    fn test_scaled_strokes_use_physical_pixels() {
        let mut board = red_board();
        board.resize(400, 400);
        board.set_scale_factor(2.0);
        // Logical (150, 20) is clear of the toolbar.
        draw(&mut board, (300.0, 40.0), (350.0, 40.0));
        assert!(board.surface().pixel(325, 40).unwrap().alpha() > 0);
        assert_eq!(board.history().undo_len(), 2);
    }

    #[test]
    fn test_repaint_merge() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(
            Repaint::Region(a).merge(Repaint::Region(b)),
            Repaint::Region(Rect::new(0.0, 0.0, 30.0, 30.0))
        );
        assert_eq!(Repaint::None.merge(Repaint::Region(a)), Repaint::Region(a));
        assert_eq!(Repaint::Region(a).merge(Repaint::Full), Repaint::Full);
        assert!(!Repaint::None.merge(Repaint::None).is_needed());
    }
}
