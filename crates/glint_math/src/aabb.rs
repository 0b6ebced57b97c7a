use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used to gate intersection against
/// unbounded implicit surfaces.
///
/// The box is stored as raw min/max corners. An inverted box
/// (min > max on any axis) is a legal value meaning "intersects
/// nothing" - callers never get undefined behavior out of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min/max corners. Corners are stored as
    /// given; use `is_valid` to check for inversion.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points, sorting each
    /// component so the result is always valid.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// True when min <= max on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Test whether a point lies inside the box (inclusive bounds).
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Slab-method ray/box test returning the parametric interval the
    /// ray spends inside the box, clipped to `ray_t`.
    ///
    /// Zero direction components are handled by the IEEE semantics of
    /// the reciprocal: 1/0 = +-inf yields slab bounds of -+inf, which
    /// the min/max folding resolves correctly without branching.
    /// Returns None when the interval is empty or entirely behind the
    /// ray origin.
    pub fn hit_interval(&self, ray: &Ray, ray_t: Interval) -> Option<Interval> {
        if !self.is_valid() {
            return None;
        }

        let mut t_enter = ray_t.min;
        let mut t_exit = ray_t.max;

        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let t0 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let t1 = (self.max[axis] - ray.origin[axis]) * inv_d;
            let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };

            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
            if t_exit < t_enter {
                return None;
            }
        }

        // The box must be at least partly in front of the origin.
        if t_exit < 0.0 {
            return None;
        }

        Some(Interval::new(t_enter, t_exit))
    }

    /// Boolean form of `hit_interval`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit_interval(ray, ray_t).is_some()
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains(Vec3::ZERO));
        assert!(aabb.contains(Vec3::new(1.0, 1.0, 1.0))); // inclusive
        assert!(!aabb.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_interval_clipping() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let span = aabb.hit_interval(&ray, Interval::new(0.0, 100.0)).unwrap();
        assert!((span.min - 4.0).abs() < 1e-5);
        assert!((span.max - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_zero_direction_component() {
        // Ray travelling along +Z with zero X/Y components: the slab
        // reciprocals are infinite and must not poison the interval.
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 4.0));

        let inside = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&inside, Interval::new(0.0, 100.0)));

        let outside = Ray::new(Vec3::new(2.0, 0.5, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&outside, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_origin_inside() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

        // Entry is behind the origin but the exit is in front
        let span = aabb
            .hit_interval(&ray, Interval::new(f32::NEG_INFINITY, 100.0))
            .unwrap();
        assert!(span.min < 0.0);
        assert!((span.max - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_inverted_is_miss() {
        // Inverted corners mean "no intersection possible", not UB
        let aabb = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(!aabb.is_valid());

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
        assert!(!aabb.contains(Vec3::ZERO));
    }

    #[test]
    fn test_aabb_behind_origin() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -5.0), Vec3::new(1.0, 1.0, -3.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

        // Box lies entirely behind the ray
        assert!(!aabb.hit(&ray, Interval::new(f32::NEG_INFINITY, 100.0)));
    }
}
