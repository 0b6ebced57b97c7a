//! General quadric surfaces and ray intersection.
//!
//! A quadric is the zero set of the second-degree polynomial
//!
//! ```text
//! Ax² + By² + Cz² + Dxy + Exz + Fyz + Gx + Hy + Iz + J = 0
//! ```
//!
//! Substituting the ray `P(t) = O + tD` yields a scalar quadratic in t;
//! the surface normal is the gradient of the polynomial at the hit
//! point. Unbounded families (cylinders, cones, paraboloids) carry an
//! axis-aligned bounding box that gates which parts of the infinite
//! surface count as geometry.

use glint_math::{Aabb, Interval, Ray, Vec3};

/// Hard capacity for simultaneous quadrics in a scene. Slots are
/// reused by the editor, never destroyed.
pub const MAX_QUADRICS: usize = 8;

/// Threshold below which the quadratic's leading coefficient is
/// treated as zero (ray direction in the surface's null cone) and the
/// solver falls back to the linear case.
const DEGENERATE_EPS: f32 = 1e-6;

/// Coefficients of the general quadric equation, in the order they
/// appear in the polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadricCoefficients {
    // Second-degree terms
    pub a: f32, // x²
    pub b: f32, // y²
    pub c: f32, // z²
    pub d: f32, // xy
    pub e: f32, // xz
    pub f: f32, // yz
    // First-degree terms
    pub g: f32, // x
    pub h: f32, // y
    pub i: f32, // z
    // Constant term
    pub j: f32,
}

impl QuadricCoefficients {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
        g: f32,
        h: f32,
        i: f32,
        j: f32,
    ) -> Self {
        Self {
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            h,
            i,
            j,
        }
    }
}

/// Result of a successful ray-quadric intersection.
#[derive(Debug, Clone, Copy)]
pub struct QuadricHit {
    /// Distance along the ray direction (same magnitude convention as
    /// the ray itself).
    pub t: f32,
    /// Hit point `origin + t * direction`.
    pub point: Vec3,
    /// Unit normal, flipped to face the incoming ray.
    pub normal: Vec3,
    /// True when the ray approached from outside (the gradient already
    /// pointed against the ray).
    pub front_face: bool,
}

/// A quadric surface instance in the scene: coefficients, optional
/// bounding box, and a material table index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric {
    pub coefficients: QuadricCoefficients,
    pub bounds: Aabb,
    pub use_bounds: bool,
    pub material_index: u32,
}

impl Default for Quadric {
    fn default() -> Self {
        Self {
            coefficients: QuadricCoefficients::default(),
            bounds: Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0)),
            use_bounds: false,
            material_index: 0,
        }
    }
}

/// Solve `a t² + b t + c = 0`.
///
/// When |a| is below the degeneracy threshold the equation collapses
/// to the linear case `b t + c = 0` (both returned roots coincide);
/// dividing by a near-zero `a` would be numerically unstable, so that
/// path is guarded explicitly. For the true quadratic the stable
/// `q`-form is used: `q` takes the sign of `-b` to avoid catastrophic
/// cancellation, then `t0 = q/a`, `t1 = c/q`, ordered so `t0 <= t1`.
/// A discriminant of exactly zero yields two equal roots.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a.abs() < DEGENERATE_EPS {
        if b.abs() < DEGENERATE_EPS {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let q = if b < 0.0 {
        (-b + sqrt_d) * 0.5
    } else {
        (-b - sqrt_d) * 0.5
    };

    let t0 = q / a;
    let t1 = if q.abs() < DEGENERATE_EPS { t0 } else { c / q };

    if t0 <= t1 {
        Some((t0, t1))
    } else {
        Some((t1, t0))
    }
}

impl Quadric {
    /// Create an unbounded quadric from raw coefficients.
    pub fn new(coefficients: QuadricCoefficients, material_index: u32) -> Self {
        Self {
            coefficients,
            material_index,
            ..Default::default()
        }
    }

    /// Create a quadric gated by a bounding box.
    pub fn bounded(coefficients: QuadricCoefficients, bounds: Aabb, material_index: u32) -> Self {
        Self {
            coefficients,
            bounds,
            use_bounds: true,
            material_index,
        }
    }

    /// Evaluate the implicit function at a point.
    pub fn evaluate(&self, p: Vec3) -> f32 {
        let q = &self.coefficients;
        q.a * p.x * p.x
            + q.b * p.y * p.y
            + q.c * p.z * p.z
            + q.d * p.x * p.y
            + q.e * p.x * p.z
            + q.f * p.y * p.z
            + q.g * p.x
            + q.h * p.y
            + q.i * p.z
            + q.j
    }

    /// Gradient of the implicit function, perpendicular to the surface
    /// wherever the point lies on it:
    ///
    /// ```text
    /// ∇f = (2Ax + Dy + Ez + G, 2By + Dx + Fz + H, 2Cz + Ex + Fy + I)
    /// ```
    pub fn gradient(&self, p: Vec3) -> Vec3 {
        let q = &self.coefficients;
        Vec3::new(
            2.0 * q.a * p.x + q.d * p.y + q.e * p.z + q.g,
            2.0 * q.b * p.y + q.d * p.x + q.f * p.z + q.h,
            2.0 * q.c * p.z + q.e * p.x + q.f * p.y + q.i,
        )
    }

    /// Intersect a ray with the surface over `[t_min, t_max]`.
    ///
    /// Root selection is a two-try policy: the near root is tested
    /// first against the admissible range and (when bounded) the
    /// point-in-box post-filter; if it fails either test the far root
    /// gets the same treatment before the whole surface reports a
    /// miss. Secondary rays starting on the surface routinely need the
    /// far root, and a partially-boxed surface can pass the slab
    /// pre-filter while a root's point still lands outside the box.
    ///
    /// All failure modes (negative discriminant, unsolvable linear
    /// case, roots out of range or out of box, degenerate gradient)
    /// are ordinary misses, not errors.
    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<QuadricHit> {
        let mut range = Interval::new(t_min, t_max);

        // Slab pre-filter: clip the admissible range to the box before
        // looking at roots at all.
        if self.use_bounds {
            range = self.bounds.hit_interval(ray, range)?;
        }

        let q = &self.coefficients;
        let o = ray.origin;
        let d = ray.direction;

        let a = q.a * d.x * d.x
            + q.b * d.y * d.y
            + q.c * d.z * d.z
            + q.d * d.x * d.y
            + q.e * d.x * d.z
            + q.f * d.y * d.z;

        let b = 2.0 * q.a * o.x * d.x
            + 2.0 * q.b * o.y * d.y
            + 2.0 * q.c * o.z * d.z
            + q.d * (o.x * d.y + o.y * d.x)
            + q.e * (o.x * d.z + o.z * d.x)
            + q.f * (o.y * d.z + o.z * d.y)
            + q.g * d.x
            + q.h * d.y
            + q.i * d.z;

        let c = self.evaluate(o);

        let (t0, t1) = solve_quadratic(a, b, c)?;

        let accept = |t: f32| -> Option<Vec3> {
            if !range.contains(t) {
                return None;
            }
            let p = ray.at(t);
            if self.use_bounds && !self.bounds.contains(p) {
                return None;
            }
            Some(p)
        };

        let (t, point) = if let Some(p) = accept(t0) {
            (t0, p)
        } else if let Some(p) = accept(t1) {
            (t1, p)
        } else {
            return None;
        };

        let grad = self.gradient(point);
        if grad.length_squared() < DEGENERATE_EPS * DEGENERATE_EPS {
            // Saddle points of some families have vanishing gradients;
            // a zero-length or NaN normal must never escape.
            return None;
        }

        let mut normal = grad.normalize();
        let front_face = ray.direction.dot(normal) < 0.0;
        if !front_face {
            normal = -normal;
        }

        Some(QuadricHit {
            t,
            point,
            normal,
            front_face,
        })
    }

    /// True when the surface is bounded on its own (all three squared
    /// terms positive - the ellipsoid family). Everything else needs
    /// its bounding box to be finite geometry.
    pub fn is_bounded(&self) -> bool {
        let q = &self.coefficients;
        q.a > DEGENERATE_EPS && q.b > DEGENERATE_EPS && q.c > DEGENERATE_EPS
    }

    /// Heuristic display name for the editor.
    pub fn type_name(&self) -> &'static str {
        let q = &self.coefficients;
        let has_a = q.a.abs() > DEGENERATE_EPS;
        let has_b = q.b.abs() > DEGENERATE_EPS;
        let has_c = q.c.abs() > DEGENERATE_EPS;
        let has_cross =
            q.d.abs() > DEGENERATE_EPS || q.e.abs() > DEGENERATE_EPS || q.f.abs() > DEGENERATE_EPS;
        let has_linear =
            q.g.abs() > DEGENERATE_EPS || q.h.abs() > DEGENERATE_EPS || q.i.abs() > DEGENERATE_EPS;

        if has_cross {
            return "General Quadric";
        }
        if has_a && has_b && has_c {
            if q.a > 0.0 && q.b > 0.0 && q.c > 0.0 {
                return "Ellipsoid";
            }
            return "Hyperboloid";
        }
        if has_a && has_b && !has_c {
            if has_linear {
                return "Paraboloid";
            }
            return "Cylinder";
        }
        if has_linear && !has_a && !has_b && !has_c {
            return "Plane";
        }
        "Quadric Surface"
    }

    // ------------------------------------------------------------------
    // Factory presets for the editor
    // ------------------------------------------------------------------

    /// Sphere: x² + y² + z² - r² = 0
    pub fn sphere(radius: f32, material_index: u32) -> Self {
        Self::new(
            QuadricCoefficients {
                a: 1.0,
                b: 1.0,
                c: 1.0,
                j: -radius * radius,
                ..Default::default()
            },
            material_index,
        )
    }

    /// Ellipsoid: x²/a² + y²/b² + z²/c² - 1 = 0
    pub fn ellipsoid(rx: f32, ry: f32, rz: f32, material_index: u32) -> Self {
        Self::new(
            QuadricCoefficients {
                a: 1.0 / (rx * rx),
                b: 1.0 / (ry * ry),
                c: 1.0 / (rz * rz),
                j: -1.0,
                ..Default::default()
            },
            material_index,
        )
    }

    /// Circular cylinder along Z: x² + y² - r² = 0, boxed in z.
    pub fn cylinder(radius: f32, height: f32, material_index: u32) -> Self {
        let coeffs = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            j: -radius * radius,
            ..Default::default()
        };
        let r = radius + 1.0;
        let bounds = Aabb::new(
            Vec3::new(-r, -r, -height * 0.5),
            Vec3::new(r, r, height * 0.5),
        );
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Elliptic cylinder along Z: x²/a² + y²/b² - 1 = 0, boxed in z.
    pub fn elliptic_cylinder(rx: f32, ry: f32, height: f32, material_index: u32) -> Self {
        let coeffs = QuadricCoefficients {
            a: 1.0 / (rx * rx),
            b: 1.0 / (ry * ry),
            j: -1.0,
            ..Default::default()
        };
        let r = rx.max(ry) + 1.0;
        let bounds = Aabb::new(
            Vec3::new(-r, -r, -height * 0.5),
            Vec3::new(r, r, height * 0.5),
        );
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Cone along Z: x² + y² - (z tanθ)² = 0, apex at origin.
    pub fn cone(angle: f32, height: f32, material_index: u32) -> Self {
        let k = angle.tan() * angle.tan();
        let coeffs = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            c: -k,
            ..Default::default()
        };
        let r = height * angle.tan() + 1.0;
        let bounds = Aabb::new(Vec3::new(-r, -r, 0.0), Vec3::new(r, r, height));
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Hyperboloid of one sheet: x²/a² + y²/b² - z²/c² - 1 = 0
    pub fn hyperboloid_one_sheet(
        rx: f32,
        ry: f32,
        rz: f32,
        height: f32,
        material_index: u32,
    ) -> Self {
        let coeffs = QuadricCoefficients {
            a: 1.0 / (rx * rx),
            b: 1.0 / (ry * ry),
            c: -1.0 / (rz * rz),
            j: -1.0,
            ..Default::default()
        };
        let r = rx.max(ry) * 2.0;
        let bounds = Aabb::new(
            Vec3::new(-r, -r, -height * 0.5),
            Vec3::new(r, r, height * 0.5),
        );
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Hyperboloid of two sheets: -x²/a² - y²/b² + z²/c² - 1 = 0
    pub fn hyperboloid_two_sheets(
        rx: f32,
        ry: f32,
        rz: f32,
        height: f32,
        material_index: u32,
    ) -> Self {
        let coeffs = QuadricCoefficients {
            a: -1.0 / (rx * rx),
            b: -1.0 / (ry * ry),
            c: 1.0 / (rz * rz),
            j: -1.0,
            ..Default::default()
        };
        let r = rx.max(ry) * 2.0;
        let bounds = Aabb::new(
            Vec3::new(-r, -r, -height * 0.5),
            Vec3::new(r, r, height * 0.5),
        );
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Elliptic paraboloid opening along +Z: z = x²/a² + y²/b²
    pub fn elliptic_paraboloid(rx: f32, ry: f32, height: f32, material_index: u32) -> Self {
        let coeffs = QuadricCoefficients {
            a: -1.0 / (rx * rx),
            b: -1.0 / (ry * ry),
            i: 1.0,
            ..Default::default()
        };
        let r = rx.max(ry) * height.sqrt();
        let bounds = Aabb::new(Vec3::new(-r, -r, 0.0), Vec3::new(r, r, height));
        Self::bounded(coeffs, bounds, material_index)
    }

    /// Hyperbolic paraboloid (saddle): z = x²/a² - y²/b²
    pub fn hyperbolic_paraboloid(rx: f32, ry: f32, height: f32, material_index: u32) -> Self {
        let coeffs = QuadricCoefficients {
            a: -1.0 / (rx * rx),
            b: 1.0 / (ry * ry),
            i: 1.0,
            ..Default::default()
        };
        let r = rx.max(ry) * height.abs().sqrt();
        let bounds = Aabb::new(Vec3::new(-r, -r, -height), Vec3::new(r, r, height));
        Self::bounded(coeffs, bounds, material_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn unit_sphere() -> Quadric {
        Quadric::sphere(1.0, 0)
    }

    #[test]
    fn test_sphere_round_trip() {
        // Ray from (0,0,5) toward -Z against a unit sphere must hit at
        // distance 4 with point (0,0,1) and outward normal (0,0,1).
        let q = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = q.intersect(&ray, 1e-3, 1e4).expect("sphere should hit");
        assert!((hit.t - 4.0).abs() < EPS);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < EPS);
        assert!((hit.normal - Vec3::new(0.0, 0.0, 1.0)).length() < EPS);
        assert!(hit.front_face);
    }

    #[test]
    fn test_sphere_round_trip_varied_radius() {
        for r in [0.25_f32, 0.5, 2.0] {
            let q = Quadric::sphere(r, 0);
            let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
            let hit = q.intersect(&ray, 1e-3, 1e4).expect("sphere should hit");
            assert!((hit.t - (5.0 - r)).abs() < 1e-3, "radius {r}: t={}", hit.t);
        }
    }

    #[test]
    fn test_origin_on_surface_tangential_miss() {
        // Ray starting on the surface, fired tangentially: both roots
        // are at or below the epsilon bound and must not re-hit the
        // origin point.
        let q = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));

        assert!(q.intersect(&ray, 1e-3, 1e4).is_none());
    }

    #[test]
    fn test_secondary_ray_takes_far_root() {
        // Ray starting on the surface pointed inward: the near root is
        // ~0 (below epsilon) so the far root must be selected.
        let q = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = q.intersect(&ray, 1e-3, 1e4).expect("far root expected");
        assert!((hit.t - 2.0).abs() < EPS);
        assert!((hit.point - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
        // Leaving through the far side: the ray is inside, so the
        // gradient pointed along the ray and got flipped.
        assert!(!hit.front_face);
    }

    #[test]
    fn test_cylinder_box_gating() {
        // Infinite cylinder x² + y² = 1 boxed to z in [-1, 1]: rays
        // aimed inside the box's z-range hit, rays aimed at the
        // mathematical surface outside it miss.
        let coeffs = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            j: -1.0,
            ..Default::default()
        };
        let bounds = Aabb::new(Vec3::new(-2.0, -2.0, -1.0), Vec3::new(2.0, 2.0, 1.0));
        let q = Quadric::bounded(coeffs, bounds, 0);

        let inside = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = q.intersect(&inside, 1e-3, 1e4).expect("inside z-range");
        assert!((hit.t - 4.0).abs() < EPS);

        let outside = Ray::new(Vec3::new(5.0, 0.0, 3.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(q.intersect(&outside, 1e-3, 1e4).is_none());
    }

    #[test]
    fn test_box_edge_retry_prefers_far_root() {
        // Box clipped so only the far half of the cylinder is inside:
        // the near root's point fails containment and the far root must
        // be taken instead of reporting a miss.
        let coeffs = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            j: -1.0,
            ..Default::default()
        };
        // Box covers x in [0, 2]: the near intersection at x = -1 (from
        // a ray travelling +x) is outside, the far one at x = +1 inside.
        let bounds = Aabb::new(Vec3::new(0.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0));
        let q = Quadric::bounded(coeffs, bounds, 0);

        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = q.intersect(&ray, 1e-3, 1e4).expect("far root in box");
        assert!((hit.point.x - 1.0).abs() < EPS);
        assert!((hit.t - 6.0).abs() < EPS);
    }

    #[test]
    fn test_normal_faces_incoming_ray() {
        // dot(normal, direction) <= 0 for every successful hit.
        let surfaces = [
            unit_sphere(),
            Quadric::ellipsoid(1.5, 0.8, 0.6, 0),
            Quadric::cylinder(1.0, 4.0, 0),
            Quadric::cone(0.5, 3.0, 0),
            Quadric::hyperboloid_one_sheet(1.0, 1.0, 1.0, 3.0, 0),
        ];
        let origins = [
            Vec3::new(0.0, 0.0, 6.0),
            Vec3::new(4.0, 3.0, 2.0),
            Vec3::new(-3.0, 1.0, 0.5),
            Vec3::new(0.2, 0.1, -5.0),
        ];

        for q in &surfaces {
            for o in &origins {
                let dir = -*o; // aim at the origin area
                let ray = Ray::new(*o, dir.normalize());
                if let Some(hit) = q.intersect(&ray, 1e-3, 1e4) {
                    assert!(
                        hit.normal.dot(ray.direction) <= 1e-6,
                        "normal not facing ray for {} from {:?}",
                        q.type_name(),
                        o
                    );
                    assert!((hit.normal.length() - 1.0).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_tangent_ray_single_root() {
        // Ray grazing the unit sphere at y = 1: discriminant is exactly
        // zero and exactly one valid distance comes back.
        let q = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let (t0, t1) = solve_quadratic(1.0, -10.0, 25.0).expect("tangent solves");
        assert_eq!(t0, t1);

        let hit = q.intersect(&ray, 1e-3, 1e4).expect("tangent hit");
        assert!((hit.t - 5.0).abs() < 1e-2);
    }

    #[test]
    fn test_linear_fallback_ray_parallel_to_cylinder_axis() {
        // Direction along the cylinder axis makes the leading
        // coefficient exactly zero; the solver must fall back to the
        // linear case instead of dividing by ~0. For a ray inside the
        // infinite cylinder wall (c != 0, b == 0) there is no solution.
        let q = Quadric::new(
            QuadricCoefficients {
                a: 1.0,
                b: 1.0,
                j: -1.0,
                ..Default::default()
            },
            0,
        );
        let ray = Ray::new(Vec3::new(0.5, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(q.intersect(&ray, 1e-3, 1e4).is_none());

        // A genuinely linear configuration (plane z = 2 as a quadric)
        // still intersects through the fallback.
        let plane = Quadric::new(
            QuadricCoefficients {
                i: 1.0,
                j: -2.0,
                ..Default::default()
            },
            0,
        );
        let hit = plane
            .intersect(&ray, 1e-3, 1e4)
            .expect("linear fallback hit");
        assert!((hit.t - 7.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_gradient_rejected() {
        // Cone apex: gradient vanishes exactly at the origin. A ray
        // engineered to hit the apex must miss rather than produce a
        // zero-length normal.
        let q = Quadric::new(
            QuadricCoefficients {
                a: 1.0,
                b: 1.0,
                c: -1.0,
                ..Default::default()
            },
            0,
        );
        // Along the axis toward the apex: at² with a = -1... direction
        // (0,0,1) gives a=-1, b=-2*z0, c=-z0² -> root exactly at apex.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(q.intersect(&ray, 1e-3, 1e4).is_none());
    }

    #[test]
    fn test_inverted_box_never_hits() {
        let coeffs = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            j: -1.0,
            ..Default::default()
        };
        let inverted = Aabb::new(Vec3::splat(1.0), Vec3::splat(-1.0));
        let q = Quadric::bounded(coeffs, inverted, 0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(q.intersect(&ray, 1e-3, 1e4).is_none());
    }

    #[test]
    fn test_all_zero_coefficients_render_as_absent() {
        let q = Quadric::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(q.intersect(&ray, 1e-3, 1e4).is_none());
    }

    #[test]
    fn test_evaluate_and_gradient_consistency() {
        let q = Quadric::ellipsoid(2.0, 1.0, 0.5, 0);
        // A point on the surface evaluates to ~0
        let p = Vec3::new(2.0, 0.0, 0.0);
        assert!(q.evaluate(p).abs() < 1e-5);

        // Finite-difference check of the gradient
        let x = Vec3::new(0.3, 0.4, 0.2);
        let g = q.gradient(x);
        let h = 1e-3;
        for axis in 0..3 {
            let mut dp = Vec3::ZERO;
            dp[axis] = h;
            let fd = (q.evaluate(x + dp) - q.evaluate(x - dp)) / (2.0 * h);
            assert!((fd - g[axis]).abs() < 1e-2, "axis {axis}: fd={fd} g={}", g[axis]);
        }
    }

    #[test]
    fn test_classification_names() {
        assert_eq!(unit_sphere().type_name(), "Ellipsoid");
        assert_eq!(Quadric::cylinder(1.0, 2.0, 0).type_name(), "Cylinder");
        assert_eq!(Quadric::cone(0.5, 2.0, 0).type_name(), "Hyperboloid");
        assert_eq!(
            Quadric::elliptic_paraboloid(1.0, 1.0, 2.0, 0).type_name(),
            "Paraboloid"
        );
        assert!(unit_sphere().is_bounded());
        assert!(!Quadric::cylinder(1.0, 2.0, 0).is_bounded());
    }
}
