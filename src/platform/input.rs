//! Per-frame input sampling

use glam::Vec2;

/// Raw input the host samples once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Mouse button or jump key went down this frame
    pub jump_pressed: bool,
    /// Mouse button is held
    pub held: bool,
    /// Pointer position in window pixels
    pub pointer: Vec2,
    /// Debug overlay toggle key went down this frame
    pub toggle_gui: bool,
}

impl FrameInput {
    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }
}

/// Input tracked across frames (pointer positions feed the debug overlay only)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub jump_pressed: bool,
    pub held: bool,
    pub pointer: Vec2,
    /// Where the last press happened
    pub pressed_pos: Vec2,
    /// Latest position while held
    pub drag_pos: Vec2,
}

impl InputState {
    /// Record this frame's sample
    pub fn update(&mut self, input: &FrameInput) {
        self.jump_pressed = input.jump_pressed;
        self.held = input.held;
        self.pointer = input.pointer;

        if input.jump_pressed {
            self.pressed_pos = input.pointer;
        }
        if input.held {
            self.drag_pos = input.pointer;
        }
    }
}
