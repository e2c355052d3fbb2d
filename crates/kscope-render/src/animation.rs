/// Cooperative animation state.
///
/// The host drives ticks (display refresh, [`crate::FrameClock`], a test
/// loop); this type only answers whether a tick should render. Only one loop
/// exists per renderer, so starting twice is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationLoop {
    active: bool,
    ticks: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate. Returns `true` when the loop was inactive.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Deactivate. Returns `true` when the loop was active.
    pub fn stop(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks accepted since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Cancellation check at the top of a tick. Returns `true` and counts the
    /// tick when the loop is active.
    pub fn begin_tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.ticks += 1;
        true
    }
}
