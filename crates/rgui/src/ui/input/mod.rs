//! UI input
//!
//! Per-frame input samples and the hit-test state machine that turns them
//! into enter/leave/hover/release events.

pub mod processor;

pub use processor::InteractionState;

use std::collections::VecDeque;

use crate::foundation::math::Vec2;

bitflags::bitflags! {
    /// One-shot signals sampled with a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputSignals: u8 {
        /// Primary mouse button was released since the last frame
        const PRIMARY_RELEASED = 1 << 0;
        /// The user asked to close the window
        const QUIT = 1 << 1;
    }
}

/// Input sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    /// Pointer position in window pixels
    pub pointer: Vec2,
    /// One-shot signals for this frame
    pub signals: InputSignals,
}

impl FrameInput {
    /// Pointer at `(x, y)` with no signals
    pub fn at(x: i32, y: i32) -> Self {
        Self { pointer: Vec2::new(x, y), signals: InputSignals::empty() }
    }

    /// Add signals (builder pattern)
    pub fn with(mut self, signals: InputSignals) -> Self {
        self.signals |= signals;
        self
    }

    /// Whether the primary button was released this frame
    pub fn primary_released(&self) -> bool {
        self.signals.contains(InputSignals::PRIMARY_RELEASED)
    }

    /// Whether the user asked to quit this frame
    pub fn quit_requested(&self) -> bool {
        self.signals.contains(InputSignals::QUIT)
    }
}

/// Source of per-frame input, polled by the frame loop
pub trait InputSource {
    /// Sample the next frame; `None` when the source is exhausted
    fn poll(&mut self) -> Option<FrameInput>;
}

/// Pre-recorded input, replayed one frame per poll
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    /// Replay `frames` in order
    pub fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }

    /// Pointer moving in a straight line from `from` to `to` over `steps` frames
    pub fn sweep(from: Vec2, to: Vec2, steps: u32) -> Self {
        let mut script = Self::default();
        script.push_sweep(from, to, steps);
        script
    }

    /// Append a straight-line pointer movement, ending exactly on `to`
    pub fn push_sweep(&mut self, from: Vec2, to: Vec2, steps: u32) {
        let steps = steps.max(1);
        let divisor = i32::try_from(steps).unwrap_or(i32::MAX);
        for step in 1..=divisor {
            let offset = (to - from) * step / divisor;
            self.frames.push_back(FrameInput { pointer: from + offset, signals: InputSignals::empty() });
        }
    }

    /// Append one frame
    pub fn push(&mut self, frame: FrameInput) {
        self.frames.push_back(frame);
    }

    /// Frames left to replay
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<FrameInput> {
        self.frames.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_input_signals() {
        let frame = FrameInput::at(3, 4).with(InputSignals::PRIMARY_RELEASED);
        assert!(frame.primary_released());
        assert!(!frame.quit_requested());
        assert_eq!(frame.pointer, Vec2::new(3, 4));
    }

    #[test]
    fn test_sweep_ends_on_target() {
        let mut script = ScriptedInput::sweep(Vec2::new(0, 0), Vec2::new(100, 50), 4);
        assert_eq!(script.remaining(), 4);

        let points: Vec<_> = std::iter::from_fn(|| script.poll()).map(|f| f.pointer).collect();
        assert_eq!(points.first(), Some(&Vec2::new(25, 12)));
        assert_eq!(points.last(), Some(&Vec2::new(100, 50)));
        assert!(script.poll().is_none());
    }
}
