use core::ops::BitOr;

use crate::paint::Color;

/// Buffer planes affected by [`Graphics::clear`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ClearPlanes {
    pub color: bool,
    pub depth: bool,
}

impl ClearPlanes {
    pub const NONE: Self = Self { color: false, depth: false };
    pub const COLOR: Self = Self { color: true, depth: false };
    pub const DEPTH: Self = Self { color: false, depth: true };
    pub const ALL: Self = Self { color: true, depth: true };

    #[inline]
    pub fn is_empty(self) -> bool {
        !self.color && !self.depth
    }
}

impl BitOr for ClearPlanes {
    type Output = ClearPlanes;

    #[inline]
    fn bitor(self, rhs: ClearPlanes) -> ClearPlanes {
        ClearPlanes {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// Frame-level graphics operations used by the canvas.
pub trait Graphics {
    /// Sets the color used by subsequent color clears.
    fn set_clear_color(&mut self, color: Color);

    /// Clears the requested planes of the current frame.
    fn clear(&mut self, planes: ClearPlanes);
}

impl<G: Graphics + ?Sized> Graphics for &mut G {
    #[inline]
    fn set_clear_color(&mut self, color: Color) {
        (**self).set_clear_color(color);
    }

    #[inline]
    fn clear(&mut self, planes: ClearPlanes) {
        (**self).clear(planes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitor_combines_planes() {
        assert_eq!(ClearPlanes::COLOR | ClearPlanes::DEPTH, ClearPlanes::ALL);
        assert_eq!(ClearPlanes::NONE | ClearPlanes::COLOR, ClearPlanes::COLOR);
        assert!(ClearPlanes::NONE.is_empty());
        assert!(!ClearPlanes::DEPTH.is_empty());
    }
}
