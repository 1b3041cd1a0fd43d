use winit::event::{ElementState, MouseButton, WindowEvent};

/// Pointer snapshot for one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PointerFrame {
    /// Cursor position in physical pixels, `None` outside the window.
    pub position: Option<(u32, u32)>,
    /// Where the primary button was last pressed since the previous frame.
    /// Meant for [`PathIdBuffer::pick`](crate::render::PathIdBuffer::pick).
    pub pick: Option<(u32, u32)>,
}

/// Accumulates pointer events between frames.
#[derive(Debug, Default)]
pub struct PointerState {
    position: Option<(u32, u32)>,
    pick: Option<(u32, u32)>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a window event. Returns `true` if the event was a pointer event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.moved(position.x, position.y);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.left();
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(*button, *state);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn position(&self) -> Option<(u32, u32)> {
        self.position
    }

    /// Returns this frame's snapshot and clears the pending pick.
    pub fn take_frame(&mut self) -> PointerFrame {
        PointerFrame {
            position: self.position,
            pick: self.pick.take(),
        }
    }

    fn moved(&mut self, x: f64, y: f64) {
        // Cursors captured during a drag can report positions left of or
        // above the window.
        self.position = (x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0)
            .then(|| (x.floor() as u32, y.floor() as u32));
    }

    fn left(&mut self) {
        self.position = None;
    }

    fn button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && state == ElementState::Pressed {
            if let Some(p) = self.position {
                self.pick = Some(p);
            }
        }
    }
}
