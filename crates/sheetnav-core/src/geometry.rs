#![forbid(unsafe_code)]

//! Cell-based geometry primitives.

/// A width/height pair in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin covering `size`.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// The bottom `height` rows of this rectangle.
    #[must_use]
    pub fn bottom_slice(&self, height: u16) -> Rect {
        let height = height.min(self.height);
        Rect::new(self.x, self.bottom() - height, self.width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_slice_clamps_to_rect() {
        let r = Rect::new(0, 2, 10, 8);
        assert_eq!(r.bottom_slice(3), Rect::new(0, 7, 10, 3));
        assert_eq!(r.bottom_slice(50), r);
        assert!(r.bottom_slice(0).is_empty());
    }

    #[test]
    fn edges() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.right(), 4);
        assert_eq!(r.bottom(), 6);
    }
}
