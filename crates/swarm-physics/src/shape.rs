//! Convex shapes and the separating-axis overlap test.

use swarm_core::{Pose, Vec2};

// ── Shape ─────────────────────────────────────────────────────────────────────

/// A convex shape in body-local coordinates (origin = body position).
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Convex polygon, vertices in either winding order.
    Polygon { vertices: Vec<Vec2> },
}

impl Shape {
    #[inline]
    pub fn circle(radius: f32) -> Shape {
        Shape::Circle { radius }
    }

    /// Axis-aligned rectangle centred on the body origin.
    pub fn rect(width: f32, height: f32) -> Shape {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Shape::Polygon {
            vertices: vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
        }
    }

    /// Rectangle whose centre sits at `centre` in body-local coordinates.
    pub fn rect_at(centre: Vec2, width: f32, height: f32) -> Shape {
        match Shape::rect(width, height) {
            Shape::Polygon { vertices } => Shape::Polygon {
                vertices: vertices.into_iter().map(|v| v + centre).collect(),
            },
            circle => circle,
        }
    }

    /// Circle whose centre sits at `centre` in body-local coordinates,
    /// approximated by a 16-gon so it can be offset from the origin.
    pub fn circle_at(centre: Vec2, radius: f32) -> Shape {
        if centre == Vec2::ZERO {
            return Shape::circle(radius);
        }
        const SIDES: usize = 16;
        let vertices = (0..SIDES)
            .map(|k| {
                let a = k as f32 * std::f32::consts::TAU / SIDES as f32;
                centre + Vec2::from_angle(a) * radius
            })
            .collect();
        Shape::Polygon { vertices }
    }

    /// Radius of the smallest origin-centred circle containing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0, f32::max),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Polygon { vertices } => {
                let n = vertices.len();
                let twice: f32 = (0..n)
                    .map(|k| vertices[k].cross(vertices[(k + 1) % n]))
                    .sum();
                twice.abs() / 2.0
            }
        }
    }

    /// Place the shape in the world at `pose`.
    pub fn to_world(&self, pose: &Pose) -> WorldShape {
        match self {
            Shape::Circle { radius } => WorldShape::Circle {
                centre: pose.position,
                radius: *radius,
            },
            Shape::Polygon { vertices } => WorldShape::Polygon {
                vertices: vertices.iter().map(|&v| pose.transform(v)).collect(),
            },
        }
    }
}

// ── WorldShape ────────────────────────────────────────────────────────────────

/// A shape resolved into world coordinates for one step.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldShape {
    Circle { centre: Vec2, radius: f32 },
    Polygon { vertices: Vec<Vec2> },
}

/// Result of an overlap test: `normal` points from the first shape toward
/// the second and `depth` is the penetration along it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    pub normal: Vec2,
    pub depth:  f32,
}

impl WorldShape {
    pub fn centre(&self) -> Vec2 {
        match self {
            WorldShape::Circle { centre, .. } => *centre,
            WorldShape::Polygon { vertices } => {
                let sum = vertices.iter().fold(Vec2::ZERO, |acc, &v| acc + v);
                sum * (1.0 / vertices.len().max(1) as f32)
            }
        }
    }

    /// `[min, max]` corners of the axis-aligned bounding box.
    pub fn aabb(&self) -> ([f32; 2], [f32; 2]) {
        match self {
            WorldShape::Circle { centre, radius } => (
                [centre.x - radius, centre.y - radius],
                [centre.x + radius, centre.y + radius],
            ),
            WorldShape::Polygon { vertices } => {
                let mut lo = [f32::INFINITY; 2];
                let mut hi = [f32::NEG_INFINITY; 2];
                for v in vertices {
                    lo = [lo[0].min(v.x), lo[1].min(v.y)];
                    hi = [hi[0].max(v.x), hi[1].max(v.y)];
                }
                (lo, hi)
            }
        }
    }

    fn project(&self, axis: Vec2) -> (f32, f32) {
        match self {
            WorldShape::Circle { centre, radius } => {
                let c = centre.dot(axis);
                (c - radius, c + radius)
            }
            WorldShape::Polygon { vertices } => vertices.iter().fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), v| {
                    let p = v.dot(axis);
                    (lo.min(p), hi.max(p))
                },
            ),
        }
    }

    fn push_axes(&self, other: &WorldShape, axes: &mut Vec<Vec2>) {
        match self {
            WorldShape::Polygon { vertices } => {
                let n = vertices.len();
                for k in 0..n {
                    let edge = vertices[(k + 1) % n] - vertices[k];
                    let axis = edge.perp().normalized();
                    if axis != Vec2::ZERO {
                        axes.push(axis);
                    }
                }
            }
            WorldShape::Circle { centre, .. } => {
                // Axis toward the nearest feature of the other shape.
                let target = match other {
                    WorldShape::Circle { centre: c, .. } => *c,
                    WorldShape::Polygon { vertices } => vertices
                        .iter()
                        .copied()
                        .min_by(|a, b| {
                            a.distance_squared(*centre).total_cmp(&b.distance_squared(*centre))
                        })
                        .unwrap_or(*centre),
                };
                let axis = (target - *centre).normalized();
                axes.push(if axis == Vec2::ZERO { Vec2::new(1.0, 0.0) } else { axis });
            }
        }
    }

    /// Separating-axis test.  Returns `None` when the shapes are disjoint or
    /// merely touching.
    pub fn penetration(&self, other: &WorldShape) -> Option<Penetration> {
        let mut axes = Vec::new();
        self.push_axes(other, &mut axes);
        other.push_axes(self, &mut axes);

        let mut best = Penetration { normal: Vec2::ZERO, depth: f32::INFINITY };
        for axis in axes {
            let (a_lo, a_hi) = self.project(axis);
            let (b_lo, b_hi) = other.project(axis);
            let overlap = a_hi.min(b_hi) - a_lo.max(b_lo);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best.depth {
                best = Penetration { normal: axis, depth: overlap };
            }
        }
        if !best.depth.is_finite() {
            return None;
        }
        if (other.centre() - self.centre()).dot(best.normal) < 0.0 {
            best.normal = -best.normal;
        }
        Some(best)
    }

    #[inline]
    pub fn overlaps(&self, other: &WorldShape) -> bool {
        self.penetration(other).is_some()
    }
}
