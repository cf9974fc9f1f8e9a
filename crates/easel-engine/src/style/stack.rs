use crate::error::{DrawError, DrawResult};

use super::StyleSnapshot;

/// Default `push_style` nesting limit.
pub const DEFAULT_DEPTH: usize = 64;

/// Fixed-depth stack of style snapshots.
///
/// Restoring a popped frame is the owner's job: it re-applies each field
/// through its setter rather than copying the frame back wholesale.
#[derive(Debug, Clone)]
pub struct StyleStack {
    frames: Vec<StyleSnapshot>,
    depth: usize,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl StyleStack {
    pub fn new(depth: usize) -> Self {
        Self { frames: Vec::with_capacity(depth), depth }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self, snapshot: StyleSnapshot) -> DrawResult<()> {
        if self.frames.len() == self.depth {
            return Err(DrawError::StackOverflow { depth: self.depth });
        }
        self.frames.push(snapshot);
        Ok(())
    }

    pub fn pop(&mut self) -> DrawResult<StyleSnapshot> {
        self.frames.pop().ok_or(DrawError::StackUnderflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_at_depth() {
        let mut stack = StyleStack::default();
        for _ in 0..DEFAULT_DEPTH {
            stack.push(StyleSnapshot::default()).unwrap();
        }
        assert_eq!(stack.push(StyleSnapshot::default()), Err(DrawError::StackOverflow { depth: 64 }));
        assert_eq!(stack.len(), 64);
    }

    #[test]
    fn underflow_when_empty() {
        let mut stack = StyleStack::new(4);
        assert_eq!(stack.pop(), Err(DrawError::StackUnderflow));
    }

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = StyleStack::new(4);
        let mut a = StyleSnapshot::default();
        a.stroke_weight = 2.0;
        let mut b = a;
        b.stroke_weight = 3.0;
        stack.push(a).unwrap();
        stack.push(b).unwrap();
        assert_eq!(stack.pop().unwrap().stroke_weight, 3.0);
        assert_eq!(stack.pop().unwrap().stroke_weight, 2.0);
        assert!(stack.is_empty());
    }
}
