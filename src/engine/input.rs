// Input state tracking for the orbit controller.
// Abstracts winit events into a queryable per-frame snapshot

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

pub struct InputState {
    // Mouse
    pub mouse_position: (f32, f32),
    mouse_prev_position: (f32, f32),
    pub mouse_delta: (f32, f32),
    left_held: bool,

    // Scroll: accumulated vertical scroll this frame, reset in end_frame()
    pub scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_position: (0.0, 0.0),
            mouse_prev_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            left_held: false,
            scroll_delta: 0.0,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Events already consumed by the overlay should not be passed here.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
                self.mouse_delta = (
                    self.mouse_delta.0 + self.mouse_position.0 - self.mouse_prev_position.0,
                    self.mouse_delta.1 + self.mouse_position.1 - self.mouse_prev_position.1,
                );
                self.mouse_prev_position = self.mouse_position;
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.left_held = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll_delta += y;
            }
            WindowEvent::CursorLeft { .. } => {
                self.left_held = false;
            }
            _ => {}
        }
    }

    /// Call once per frame after the controller has consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.left_held
    }

    #[cfg(test)]
    pub fn set_dragging(&mut self, held: bool) {
        self.left_held = held;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
