//! Controller selection and construction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use swarm_core::{Preset, RobotRng, SpeedLimits};

use crate::{
    BiColourConstructionController, ClusterController, ControlError, Controller, IdleController,
    OrbitController, OrbitalConstructionController, Script, ScriptController,
    SimpleAvoidController, programs,
};

/// Which controller a newly spawned robot receives.
#[derive(Clone, Debug)]
pub enum ControllerKind {
    Idle,
    SimpleAvoid,
    Cluster,
    Orbit,
    OrbitalConstruction,
    BiColour,
    Script(Arc<Script>),
}

impl ControllerKind {
    /// Built-in choice for each preset.
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Tutorial | Preset::PreCluster => ControllerKind::SimpleAvoid,
            Preset::SimpleCluster | Preset::AdvancedCluster | Preset::Sort => ControllerKind::Cluster,
            Preset::Firefly | Preset::Majority => {
                ControllerKind::Script(Arc::new(Script::new(programs::FIREFLY)))
            }
            Preset::Pheromone => ControllerKind::Script(Arc::new(Script::new(programs::FORAGE))),
            Preset::Construct | Preset::EnlargedRobot => ControllerKind::OrbitalConstruction,
            Preset::Oc2 => ControllerKind::BiColour,
        }
    }

    /// Wrap program text as a script controller kind.
    pub fn script(source: impl Into<String>) -> Self {
        ControllerKind::Script(Arc::new(Script::new(source)))
    }

    /// Build a controller for one robot; role draws use that robot's RNG.
    pub fn build(&self, limits: SpeedLimits, rng: &mut RobotRng) -> Box<dyn Controller> {
        match self {
            ControllerKind::Idle => Box::new(IdleController),
            ControllerKind::SimpleAvoid => Box::new(SimpleAvoidController::new(limits)),
            ControllerKind::Cluster => Box::new(ClusterController::new(limits)),
            ControllerKind::Orbit => Box::new(OrbitController::new(limits)),
            ControllerKind::OrbitalConstruction => {
                Box::new(OrbitalConstructionController::new(limits, rng))
            }
            ControllerKind::BiColour => Box::new(BiColourConstructionController::new(limits, rng)),
            ControllerKind::Script(script) => {
                Box::new(ScriptController::new(Arc::clone(script), limits))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControllerKind::Idle                => "idle",
            ControllerKind::SimpleAvoid         => "simple-avoid",
            ControllerKind::Cluster             => "cluster",
            ControllerKind::Orbit               => "orbit",
            ControllerKind::OrbitalConstruction => "orbital-construction",
            ControllerKind::BiColour            => "bi-colour-construction",
            ControllerKind::Script(_)           => "script",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = ControlError;

    /// Parses the built-in names; scripts are built with [`ControllerKind::script`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "idle" => ControllerKind::Idle,
            "simple-avoid" | "avoid" => ControllerKind::SimpleAvoid,
            "cluster" => ControllerKind::Cluster,
            "orbit" => ControllerKind::Orbit,
            "orbital-construction" | "construction" => ControllerKind::OrbitalConstruction,
            "bi-colour-construction" | "bi-colour" => ControllerKind::BiColour,
            _ => return Err(ControlError::UnknownController(s.to_string())),
        };
        Ok(kind)
    }
}
