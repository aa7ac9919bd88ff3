//! Shape identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a shape within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out shape ids for locally constructed shapes.
///
/// Reconstructed shapes carry their own ids and never advance the allocator.
#[derive(Clone, Debug, Default)]
pub struct ShapeIdAllocator {
    next: u64,
}

impl ShapeIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start handing out ids from `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to `allocate` will return.
    pub fn peek(&self) -> ShapeId {
        ShapeId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_allocation() {
        let mut ids = ShapeIdAllocator::new();
        assert_eq!(ids.allocate(), ShapeId(0));
        assert_eq!(ids.allocate(), ShapeId(1));
        assert_eq!(ids.peek(), ShapeId(2));
    }

    #[test]
    fn test_starting_at() {
        let mut ids = ShapeIdAllocator::starting_at(100);
        assert_eq!(ids.allocate(), ShapeId(100));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&ShapeId(7)).unwrap(), "7");
    }
}
