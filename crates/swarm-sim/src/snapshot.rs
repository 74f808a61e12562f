//! Read-only views of the world for observers and renderers.
//!
//! Views own plain data (positions, flags) and borrow the fields; they never
//! hold physics handles, so nothing in them can outlive a reset.

use swarm_control::ControllerStatus;
use swarm_core::{ObjectKind, Pose, PuckId, RobotId, ScenarioConfig, Tick, Vec2};
use swarm_field::ScalarField;
use swarm_physics::Shape;

#[derive(Clone, Debug, PartialEq)]
pub struct RobotView {
    pub id:          RobotId,
    pub pose:        Pose,
    pub radius:      f32,
    pub flashing:    bool,
    pub holding:     Option<ObjectKind>,
    pub text:        String,
    pub text_colour: String,
    pub status:      ControllerStatus,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PuckView {
    pub id:       PuckId,
    pub kind:     ObjectKind,
    pub position: Vec2,
    pub held:     bool,
}

/// A static body: wall, obstacle, nest, or goal zone.
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureView {
    pub kind:  ObjectKind,
    pub shape: Shape,
    pub pose:  Pose,
}

/// Which scalar field to paint under the arena.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldChoice {
    #[default]
    None,
    Nest,
    Pheromone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldOverlay {
    pub width:  usize,
    pub height: usize,
    /// Column order, `i * height + j`.
    pub cells:  Vec<f32>,
}

impl FieldOverlay {
    fn of(field: &ScalarField) -> Self {
        let (width, height) = field.dimensions();
        Self { width, height, cells: field.as_slice().to_vec() }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub step:     Tick,
    pub trial:    u32,
    pub robots:   Vec<RobotView>,
    pub pucks:    Vec<PuckView>,
    pub fixtures: Vec<FixtureView>,
    pub overlay:  Option<FieldOverlay>,
    pub status:   String,
}

impl RenderSnapshot {
    pub(crate) fn overlay_of(
        choice:    FieldChoice,
        nest:      Option<&ScalarField>,
        pheromone: Option<&ScalarField>,
    ) -> Option<FieldOverlay> {
        match choice {
            FieldChoice::None => None,
            FieldChoice::Nest => nest.map(FieldOverlay::of),
            FieldChoice::Pheromone => pheromone.map(FieldOverlay::of),
        }
    }
}

// ── WorldView ─────────────────────────────────────────────────────────────────

/// What an observer sees at a sampling point.
pub struct WorldView<'a> {
    pub step:      Tick,
    pub trial:     u32,
    pub config:    &'a ScenarioConfig,
    pub robots:    &'a [RobotView],
    pub pucks:     &'a [PuckView],
    pub nest:      Option<&'a ScalarField>,
    pub pheromone: Option<&'a ScalarField>,
}

impl WorldView<'_> {
    /// Positions of every live puck of `kind`, in id order.
    pub fn puck_positions(&self, kind: ObjectKind) -> Vec<Vec2> {
        self.pucks.iter().filter(|p| p.kind == kind).map(|p| p.position).collect()
    }

    pub fn puck_count(&self, kind: ObjectKind) -> usize {
        self.pucks.iter().filter(|p| p.kind == kind).count()
    }
}
