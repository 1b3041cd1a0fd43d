use winit::event::WindowEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
