//! Front/back framebuffer pair.
//!
//! Drawing always targets the front buffer. When a frame is handed to the
//! transfer engine it is *lent*: in double-buffered mode the two buffers
//! swap roles (an index exchange) and the new front is re-seeded from the
//! lent frame, so drawing continues on top of what is being sent without
//! touching it. In single-buffered mode the front buffer itself is lent,
//! and mutating it before [`FrameBuffers::release`] is a bug caught by a
//! debug assertion.

use crate::framebuffer::Framebuffer;
use crate::mapping::RowMapping;
use crate::panel::PanelSize;

/// How many framebuffers the driver keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferMode {
    /// One buffer. Drawing must wait while a transfer is in flight.
    Single,
    /// Two buffers. Drawing continues while the previous frame is sent.
    #[default]
    Double,
}

pub struct FrameBuffers<P: PanelSize> {
    buffers: [Framebuffer<P>; 2],
    front: usize,
    mode: BufferMode,
    lent: bool,
}

impl<P: PanelSize> FrameBuffers<P> {
    pub fn new(mode: BufferMode, mapping: RowMapping) -> Self {
        Self {
            buffers: [Framebuffer::new(mapping), Framebuffer::new(mapping)],
            front: 0,
            mode,
            lent: false,
        }
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn front(&self) -> &Framebuffer<P> {
        &self.buffers[self.front]
    }

    /// Mutable access to the drawing buffer.
    ///
    /// In single-buffered mode this must not be called while the buffer is
    /// lent to a transfer.
    pub fn front_mut(&mut self) -> &mut Framebuffer<P> {
        debug_assert!(
            !(self.lent && self.mode == BufferMode::Single),
            "framebuffer mutated while owned by a transfer"
        );
        &mut self.buffers[self.front]
    }

    /// The buffer not currently drawn to. Equal to the front buffer in
    /// single-buffered mode.
    pub fn back(&self) -> &Framebuffer<P> {
        match self.mode {
            BufferMode::Single => &self.buffers[self.front],
            BufferMode::Double => &self.buffers[self.front ^ 1],
        }
    }

    /// Exchange the front and back roles. A no-op in single-buffered mode.
    pub fn swap(&mut self) {
        if self.mode == BufferMode::Double {
            self.front ^= 1;
        }
    }

    /// Hand the current frame to a transfer.
    ///
    /// Double-buffered: swap, then copy the lent frame into the new front
    /// so later draws build on it. Returns the bytes to stream; they stay
    /// untouched until [`release`](Self::release).
    pub fn lend(&mut self) -> &[u8] {
        debug_assert!(!self.lent, "frame lent twice");
        self.lent = true;
        if self.mode == BufferMode::Double {
            self.swap();
            let [b0, b1] = &mut self.buffers;
            if self.front == 0 {
                b0.copy_from(b1);
            } else {
                b1.copy_from(b0);
            }
        }
        self.lent_bytes()
    }

    /// Bytes of the frame currently lent (the back buffer).
    pub fn lent_bytes(&self) -> &[u8] {
        self.back().as_bytes()
    }

    /// The transfer is over; the lent buffer may be reused.
    pub fn release(&mut self) {
        self.lent = false;
    }

    pub fn is_lent(&self) -> bool {
        self.lent
    }
}
