//! Loop tracking for the re-scanning engine.
//!
//! There is no bracket-matching pass. A loop is identified only by the
//! source offset just after its `[`, recorded in a [`LoopFrame`] when the
//! loop is entered. A `]` seeks back onto the top frame's `[`, which makes
//! the engine re-run the entry check; the frame is popped only when that
//! check reads zero.
//!
//! The "already on top" test in [`LoopStack::enter`] is what keeps exactly
//! one frame per nesting depth: a backward jump always lands on the loop
//! whose frame is on top, while a first entry always comes from code
//! outside (before) that loop, where its frame cannot be on top.

use tracing::trace;

/// One active loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopFrame {
    /// Source offset of the byte following the loop's `[`
    pub start: u64,
}

/// What [`LoopStack::enter`] did with the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEntry {
    /// First entry: a new frame was pushed
    Pushed,
    /// Re-entry after a backward jump: the top frame was refreshed
    Repeated,
}

/// Stack of active loops, innermost on top
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStack {
    frames: Vec<LoopFrame>,
}

impl LoopStack {
    pub fn new() -> Self {
        LoopStack { frames: Vec::new() }
    }

    /// Record entry into the loop starting at `start`
    pub fn enter(&mut self, start: u64) -> LoopEntry {
        if let Some(top) = self.frames.last_mut() {
            if top.start == start {
                top.start = start;
                return LoopEntry::Repeated;
            }
        }
        trace!(start, depth = self.frames.len() + 1, "loop frame pushed");
        self.frames.push(LoopFrame { start });
        LoopEntry::Pushed
    }

    /// Drop the top frame if it belongs to the loop at `start`.
    ///
    /// Called when the entry check at `start` reads zero: if we got here by
    /// jumping back, the loop is finished; otherwise the loop was never
    /// entered and there is nothing to pop.
    pub fn leave(&mut self, start: u64) -> Option<LoopFrame> {
        if self.top().is_some_and(|top| top.start == start) {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn top(&self) -> Option<&LoopFrame> {
        self.frames.last()
    }

    /// All frames, outermost first (for UI display)
    pub fn frames(&self) -> &[LoopFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
