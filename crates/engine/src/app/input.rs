use winit::event::ElementState;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PressLatch {
    is_down: bool,
    pressed_edge: bool,
}

impl PressLatch {
    pub(crate) fn handle(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.is_down {
                    self.pressed_edge = true;
                }
                self.is_down = true;
            }
            ElementState::Released => self.is_down = false,
        }
    }

    pub(crate) fn take(&mut self) -> bool {
        std::mem::take(&mut self.pressed_edge)
    }
}
