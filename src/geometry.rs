//! Small math helpers shared by every entity: angle conversion, random range
//! sampling and playfield edge wrapping.

use bevy::math::Vec2;
use rand::Rng;

/// Converts degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Uniform sample in `[min, max)`.
///
/// Unlike `Rng::gen_range` this tolerates an empty or inverted range and
/// returns `min`, so a zero-width spread (e.g. a perfectly accurate saucer)
/// never panics inside a tick.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Unit vector for a heading in radians (0 points along +x).
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// The rectangular play area, `[0, width] × [0, height]`, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// `true` while `p` lies inside the closed rectangle.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Fold a position that crossed an edge back to the opposite edge.
    ///
    /// This is an exact-edge wrap: anything left of 0 lands on `width`,
    /// anything right of `width` lands on 0 (same for `y`).  Positions on the
    /// boundary itself are left alone.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        let mut out = p;
        if out.x < 0.0 {
            out.x = self.width;
        } else if out.x > self.width {
            out.x = 0.0;
        }
        if out.y < 0.0 {
            out.y = self.height;
        } else if out.y > self.height {
            out.y = 0.0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn wrap_folds_each_axis_to_opposite_edge() {
        let field = Playfield::new(100.0, 50.0);
        assert_eq!(field.wrap(Vec2::new(101.0, 10.0)), Vec2::new(0.0, 10.0));
        assert_eq!(field.wrap(Vec2::new(-1.0, 10.0)), Vec2::new(100.0, 10.0));
        assert_eq!(field.wrap(Vec2::new(10.0, -0.5)), Vec2::new(10.0, 50.0));
        assert_eq!(field.wrap(Vec2::new(10.0, 51.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn wrap_leaves_boundary_points_untouched() {
        let field = Playfield::new(100.0, 50.0);
        assert_eq!(field.wrap(Vec2::new(100.0, 0.0)), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn random_range_tolerates_empty_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_range(&mut rng, 2.0, 2.0), 2.0);
        let v = random_range(&mut rng, -1.0, 1.0);
        assert!((-1.0..1.0).contains(&v));
    }

    #[test]
    fn heading_zero_points_along_x() {
        let h = heading(0.0);
        assert!((h - Vec2::X).length() < 1e-6);
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
    }
}
