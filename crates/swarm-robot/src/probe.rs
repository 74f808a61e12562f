//! Scalar-field probes.

use swarm_control::ProbeSample;
use swarm_core::{Pose, Vec2};
use swarm_field::ScalarField;

/// A sample point at `distance` from the robot centre, `angle` radians off
/// its heading.  Stateless; the point is recomputed from the pose each tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridProbe {
    pub distance: f32,
    pub angle:    f32,
}

impl GridProbe {
    pub const fn new(distance: f32, angle: f32) -> Self {
        Self { distance, angle }
    }

    #[inline]
    pub fn sample_point(&self, pose: &Pose) -> Vec2 {
        pose.polar(self.distance, self.angle)
    }

    /// Raw field values under the sample point; an absent field reads 0.0.
    pub fn sample(
        &self,
        pose:      &Pose,
        nest:      Option<&ScalarField>,
        pheromone: Option<&ScalarField>,
        world:     (f32, f32),
    ) -> ProbeSample {
        let p = self.sample_point(pose);
        let read = |f: Option<&ScalarField>| f.map_or(0.0, |f| f.sample_world(p, world.0, world.1));
        ProbeSample { nest_value: read(nest), pheromone_value: read(pheromone) }
    }
}
