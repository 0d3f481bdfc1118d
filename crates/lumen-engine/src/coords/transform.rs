use core::ops::Mul;

use super::{Rect, Vec2, Viewport};

/// Scale-then-translate 2D affine transform.
///
/// Maps a point as `p' = p * scale + translate` (component-wise).
///
/// Composition reads left to right with [`then`](Self::then): `a.then(b)`
/// applies `a` first. The `*` operator follows the matrix convention instead,
/// so `b * a == a.then(b)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub scale: Vec2,
    pub translate: Vec2,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: Vec2::ONE,
        translate: Vec2::ZERO,
    };

    #[inline]
    pub const fn new(scale: Vec2, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    #[inline]
    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self::new(Vec2::new(sx, sy), Vec2::ZERO)
    }

    #[inline]
    pub const fn from_translate(tx: f32, ty: f32) -> Self {
        Self::new(Vec2::ONE, Vec2::new(tx, ty))
    }

    /// Maps normalized-device coordinates (origin center, +Y up) to pixel
    /// coordinates (origin top-left, +Y down) for a canvas of `size`.
    ///
    /// `(-1, 1)` lands on the top-left corner and `(1, -1)` on the bottom-right.
    #[inline]
    pub fn nd_to_pixel(size: Viewport) -> Self {
        let half = size.center();
        Self::new(Vec2::new(half.x, -half.y), half)
    }

    /// Returns the transform equivalent to applying `a`, then `b`.
    #[inline]
    pub fn compose(a: Transform, b: Transform) -> Transform {
        Transform {
            scale: a.scale.mul_elem(b.scale),
            translate: a.translate.mul_elem(b.scale) + b.translate,
        }
    }

    /// Applies `self`, then `next`.
    #[inline]
    pub fn then(self, next: Transform) -> Transform {
        Self::compose(self, next)
    }

    #[inline]
    pub fn map(self, p: Vec2) -> Vec2 {
        p.mul_elem(self.scale) + self.translate
    }

    /// Maps a point back through the inverse transform.
    ///
    /// Returns `None` when a scale component is zero.
    #[inline]
    pub fn imap(self, p: Vec2) -> Option<Vec2> {
        self.inverse().map(|inv| inv.map(p))
    }

    /// Maps both corners of `rect`. The result keeps the orientation produced
    /// by the transform, so a Y flip yields a negative height.
    #[inline]
    pub fn map_rect(self, rect: Rect) -> Rect {
        let origin = self.map(rect.origin);
        Rect {
            origin,
            size: rect.size.mul_elem(self.scale),
        }
    }

    pub fn inverse(self) -> Option<Transform> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        let scale = Vec2::new(1.0 / self.scale.x, 1.0 / self.scale.y);
        Some(Transform {
            scale,
            translate: -self.translate.mul_elem(scale),
        })
    }

    pub fn approx_eq(self, other: Transform, eps: f32) -> bool {
        self.scale.approx_eq(other.scale, eps) && self.translate.approx_eq(other.translate, eps)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `self * rhs` applies `rhs` first.
    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        rhs.then(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn t(sx: f32, sy: f32, tx: f32, ty: f32) -> Transform {
        Transform::new(Vec2::new(sx, sy), Vec2::new(tx, ty))
    }

    // ── map ───────────────────────────────────────────────────────────────

    #[test]
    fn map_scales_then_translates() {
        let p = t(2.0, 3.0, 10.0, 20.0).map(Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(12.0, 23.0));
    }

    // ── nd_to_pixel ───────────────────────────────────────────────────────

    #[test]
    fn nd_to_pixel_maps_reference_points() {
        for &(w, h) in &[(800.0, 600.0), (1.0, 1.0), (1920.0, 1080.0), (333.0, 17.0)] {
            let nd = Transform::nd_to_pixel(Viewport::new(w, h));
            assert!(nd.map(Vec2::new(0.0, 0.0)).approx_eq(Vec2::new(w / 2.0, h / 2.0), EPS));
            assert!(nd.map(Vec2::new(1.0, 1.0)).approx_eq(Vec2::new(w, 0.0), EPS));
            assert!(nd.map(Vec2::new(-1.0, -1.0)).approx_eq(Vec2::new(0.0, h), EPS));
        }
    }

    #[test]
    fn nd_to_pixel_flips_y() {
        let nd = Transform::nd_to_pixel(Viewport::new(800.0, 600.0));
        assert_eq!(nd.scale, Vec2::new(400.0, -300.0));
        assert_eq!(nd.translate, Vec2::new(400.0, 300.0));
    }

    // ── compose ───────────────────────────────────────────────────────────

    #[test]
    fn compose_applies_first_then_second() {
        let a = t(2.0, 2.0, 1.0, 0.0);
        let b = t(1.0, -1.0, 0.0, 5.0);
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(a.then(b).map(p), b.map(a.map(p)));
        assert_eq!((b * a).map(p), b.map(a.map(p)));
    }

    #[test]
    fn compose_is_associative() {
        let a = t(2.0, 0.5, 1.0, -1.0);
        let b = t(-1.0, 3.0, 4.0, 2.0);
        let c = t(0.25, 1.0, -8.0, 0.0);
        let left = a.then(b).then(c);
        let right = a.then(b.then(c));
        assert!(left.approx_eq(right, EPS));
    }

    #[test]
    fn identity_is_neutral() {
        let a = t(2.0, -3.0, 7.0, 1.0);
        assert_eq!(a.then(Transform::IDENTITY), a);
        assert_eq!(Transform::IDENTITY.then(a), a);
    }

    // ── inverse ───────────────────────────────────────────────────────────

    #[test]
    fn inverse_round_trips_point() {
        let a = t(4.0, -2.0, 3.0, 9.0);
        let p = Vec2::new(-1.5, 6.0);
        let back = a.imap(a.map(p)).unwrap();
        assert!(back.approx_eq(p, EPS));
        assert!(a.then(a.inverse().unwrap()).approx_eq(Transform::IDENTITY, EPS));
    }

    #[test]
    fn inverse_of_degenerate_scale_is_none() {
        assert!(t(0.0, 1.0, 0.0, 0.0).inverse().is_none());
        assert!(t(1.0, 0.0, 0.0, 0.0).imap(Vec2::ZERO).is_none());
    }

    #[test]
    fn map_rect_keeps_flip() {
        let nd = Transform::nd_to_pixel(Viewport::new(100.0, 100.0));
        let rect = nd.map_rect(Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!(rect.origin, Vec2::new(0.0, 100.0));
        assert_eq!(rect.size, Vec2::new(100.0, -100.0));
        assert_eq!(rect.normalized(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }
}
