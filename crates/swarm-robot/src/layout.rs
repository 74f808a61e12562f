//! Per-preset robot geometry: body, extra solid parts, sensors, probes.
//!
//! All offsets are in the robot frame: +x along the heading, +y to the
//! robot's right on screen (y grows downward), so "left" sensors sit at
//! negative y.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

use swarm_control::{ProbeRole, SensorRole};
use swarm_core::{KindMask, Preset, ScenarioConfig, Vec2};
use swarm_physics::Shape;

use crate::{GridProbe, SensorFilter};

/// One sensor zone: its role, what it counts, and where it sits.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorSpec {
    pub role:   SensorRole,
    pub filter: SensorFilter,
    /// Shape relative to `offset`.
    pub shape:  Shape,
    pub offset: Vec2,
}

/// A solid part rigidly fixed to the robot body.
#[derive(Clone, Debug, PartialEq)]
pub struct SolidPart {
    pub shape:  Shape,
    pub offset: Vec2,
}

/// Everything needed to spawn a robot for one scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorLayout {
    pub body_radius:  f32,
    pub friction_air: f32,
    pub parts:        Vec<SolidPart>,
    pub sensors:      Vec<SensorSpec>,
    pub probes:       Vec<(ProbeRole, GridProbe)>,
}

impl SensorLayout {
    /// The layout every robot of `config.preset` receives.
    pub fn for_config(config: &ScenarioConfig) -> Self {
        let rr = config.robot_radius;
        let preset = config.preset;
        let mut layout = SensorLayout {
            body_radius:  rr,
            friction_air: config.friction_air,
            parts:        Vec::new(),
            sensors:      Vec::new(),
            probes:       Vec::new(),
        };

        if preset == Preset::Oc2 {
            layout.parts.push(front_wedge(rr));
        }

        layout.add_obstacle_pair(config, SensorRole::LeftWall, SensorRole::RightWall, KindMask::WALL);
        layout.add_obstacle_pair(config, SensorRole::LeftRobot, SensorRole::RightRobot, KindMask::ROBOT);

        if preset == Preset::PreCluster {
            layout.add(SensorRole::GoalZone, SensorFilter::GoalZone, Shape::circle(0.15 * rr), Vec2::ZERO);
        }
        match preset {
            Preset::PreCluster | Preset::SimpleCluster => layout.add_cluster(config, false),
            Preset::AdvancedCluster => layout.add_cluster(config, true),
            Preset::Sort => {
                layout.add_cluster(config, false);
                layout.add_inner_green(config, config.inner_sensor_radius);
            }
            Preset::Firefly => layout.add_flash(rr),
            Preset::Majority => {
                layout.add_flash(rr);
                layout.add(
                    SensorRole::Robots,
                    SensorFilter::Kinds(KindMask::ROBOT),
                    Shape::circle(3.0 * rr),
                    Vec2::ZERO,
                );
            }
            Preset::Pheromone => layout.add_inner_green(config, 2.0 * config.inner_sensor_radius),
            Preset::Construct | Preset::EnlargedRobot => {
                layout.add_construct(config, KindMask::RED_PUCK);
                layout.add_construct(config, KindMask::GREEN_PUCK);
            }
            Preset::Oc2 => {
                layout.add_arc(config, KindMask::RED_PUCK);
                layout.add_arc(config, KindMask::GREEN_PUCK);
            }
            Preset::Tutorial => {}
        }

        if preset.has_fields() {
            let d = 2.0 * rr;
            layout.probes = vec![
                (ProbeRole::LeftProbe, GridProbe::new(d, -FRAC_PI_4)),
                (ProbeRole::CentreProbe, GridProbe::new(d / SQRT_2, 0.0)),
                (ProbeRole::RightProbe, GridProbe::new(d, FRAC_PI_4)),
            ];
        }
        layout
    }

    pub fn sensor(&self, role: SensorRole) -> Option<&SensorSpec> {
        self.sensors.iter().find(|s| s.role == role)
    }

    pub fn roles(&self) -> impl Iterator<Item = SensorRole> + '_ {
        self.sensors.iter().map(|s| s.role)
    }

    // ── Builders ──────────────────────────────────────────────────────────

    fn add(&mut self, role: SensorRole, filter: SensorFilter, shape: Shape, offset: Vec2) {
        self.sensors.push(SensorSpec { role, filter, shape, offset });
    }

    /// Small circles at ±45° just outside the body.
    fn add_obstacle_pair(
        &mut self,
        config: &ScenarioConfig,
        left:   SensorRole,
        right:  SensorRole,
        mask:   KindMask,
    ) {
        let rr = config.robot_radius;
        let r = config.obstacle_sensor_size_factor * rr;
        let shift = if config.preset == Preset::Oc2 { 0.75 * rr } else { 0.0 };
        let at = |angle: f32| Vec2::from_angle(angle) * (rr + r) + Vec2::new(shift, 0.0);
        self.add(left, SensorFilter::Kinds(mask), Shape::circle(r), at(-FRAC_PI_4));
        self.add(right, SensorFilter::Kinds(mask), Shape::circle(r), at(FRAC_PI_4));
    }

    fn add_cluster(&mut self, config: &ScenarioConfig, advanced: bool) {
        let (rr, pr) = (config.robot_radius, config.puck_radius);
        self.add(
            SensorRole::InnerRedPuck,
            SensorFilter::Pucks(KindMask::RED_PUCK),
            Shape::circle(config.inner_sensor_radius),
            Vec2::new(rr + pr, 0.0),
        );
        if advanced {
            let (depth, width) = (2.0 * rr, 2.0 * rr);
            let x = rr + 5.0 * pr + depth / 2.0;
            let y = width / 2.0 + pr;
            let filter = SensorFilter::Pucks(KindMask::RED_PUCK);
            self.add(SensorRole::LeftRedPuck, filter, Shape::rect(depth, width), Vec2::new(x, -y));
            self.add(SensorRole::RightRedPuck, filter, Shape::rect(depth, width), Vec2::new(x, y));
        }
    }

    fn add_inner_green(&mut self, config: &ScenarioConfig, radius: f32) {
        self.add(
            SensorRole::InnerGreenPuck,
            SensorFilter::Pucks(KindMask::GREEN_PUCK),
            Shape::circle(radius),
            Vec2::new(config.robot_radius + config.puck_radius, 0.0),
        );
    }

    fn add_flash(&mut self, rr: f32) {
        self.add(SensorRole::Flash, SensorFilter::Flashing, Shape::circle(3.0 * rr), Vec2::ZERO);
    }

    /// Long rectangles either side of the heading.
    fn add_construct(&mut self, config: &ScenarioConfig, colour: KindMask) {
        let (rr, pr) = (config.robot_radius, config.puck_radius);
        let (depth, width) = (4.0 * rr, 10.0 * rr);
        let x = rr + pr + depth / 2.0;
        let (left, right) = side_roles(colour);
        let filter = SensorFilter::Pucks(colour);
        self.add(left, filter, Shape::rect(depth, width), Vec2::new(x, -width / 2.0));
        self.add(right, filter, Shape::rect(depth, width), Vec2::new(x, width / 2.0));
    }

    /// Quarter-disc wedge sweeping forward-left; there is no right twin.
    fn add_arc(&mut self, config: &ScenarioConfig, colour: KindMask) {
        let outer = 5.0 * config.robot_radius;
        let step = PI / 10.0;
        let mut vertices = vec![Vec2::ZERO];
        vertices.extend((0..=5).map(|k| Vec2::from_angle(-FRAC_PI_2 + k as f32 * step) * outer));

        // Centroid sits on the robot centre, then the whole wedge is shifted.
        let (shape, _) = centred_polygon(vertices);
        let offset = Vec2::new(outer / 2.0, -outer / 2.0 + outer / 13.0);
        let (left, _) = side_roles(colour);
        self.add(left, SensorFilter::Pucks(colour), shape, offset);
    }
}

fn side_roles(colour: KindMask) -> (SensorRole, SensorRole) {
    if colour == KindMask::GREEN_PUCK {
        (SensorRole::LeftGreenPuck, SensorRole::RightGreenPuck)
    } else {
        (SensorRole::LeftRedPuck, SensorRole::RightRedPuck)
    }
}

/// Plough on the front of OC2 robots.
fn front_wedge(rr: f32) -> SolidPart {
    let (shape, _) = centred_polygon(vec![
        Vec2::new(0.0, rr),
        Vec2::new(1.5 * rr, 0.0),
        Vec2::new(0.0, -rr),
    ]);
    SolidPart { shape, offset: Vec2::new(0.75 * rr, 0.0) }
}

/// Re-centre a polygon on its area centroid; returns the shape and the
/// centroid it was moved from.
fn centred_polygon(vertices: Vec<Vec2>) -> (Shape, Vec2) {
    let c = polygon_centroid(&vertices);
    let shape = Shape::Polygon { vertices: vertices.into_iter().map(|v| v - c).collect() };
    (shape, c)
}

pub(crate) fn polygon_centroid(vertices: &[Vec2]) -> Vec2 {
    let n = vertices.len();
    let mut area2 = 0.0;
    let mut acc = Vec2::ZERO;
    for k in 0..n {
        let (a, b) = (vertices[k], vertices[(k + 1) % n]);
        let cross = a.cross(b);
        area2 += cross;
        acc += (a + b) * cross;
    }
    if area2.abs() <= f32::EPSILON {
        let sum = vertices.iter().fold(Vec2::ZERO, |s, &v| s + v);
        return sum * (1.0 / n.max(1) as f32);
    }
    acc * (1.0 / (3.0 * area2))
}
