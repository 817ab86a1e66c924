//! Bounded call stack.
use crate::constants::*;

/// Stack of return addresses pushed by `CALL` and popped by `RET`.
///
/// Storage is a fixed array of [`STACK_SIZE`] slots. Pushing onto a
/// full stack or popping an empty one is refused, leaving the stack
/// unchanged, so the caller can report the broken program.
pub(crate) struct CallStack {
    slots: [Address; STACK_SIZE],
    /// Number of occupied slots, and index of the next free one.
    depth: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self {
            slots: [0; STACK_SIZE],
            depth: 0,
        }
    }
}

impl CallStack {
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Push a return address. Returns `None` when the stack is full.
    #[must_use]
    pub(crate) fn push(&mut self, address: Address) -> Option<()> {
        let slot = self.slots.get_mut(self.depth)?;
        *slot = address;
        self.depth += 1;
        Some(())
    }

    /// Pop the most recent return address. Returns `None` when the stack is empty.
    #[must_use]
    pub(crate) fn pop(&mut self) -> Option<Address> {
        let depth = self.depth.checked_sub(1)?;
        self.depth = depth;
        Some(self.slots[depth])
    }
}
