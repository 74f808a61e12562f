//! User-programmable controller.
//!
//! Programs are written in a small JavaScript-like language (see
//! [`parser`] for the grammar) and run by a sandboxed evaluator: no host
//! access beyond the robot's own sensor reading and a bounded number of
//! steps per tick.
//!
//! # Hold semantics
//!
//! ```text
//!                 holdTime > 0
//!   Evaluating ─────────────────▶ Holding { start, duration }
//!       ▲                              │
//!       └── timestamp - start ≥ duration (evaluates in the same call)
//! ```
//!
//! While holding, the program is not run at all and the last action is
//! returned unchanged.

pub mod eval;
pub mod lexer;
pub mod parser;

use std::sync::Arc;

use swarm_core::{RobotRng, SpeedLimits};
use tracing::warn;

use crate::{Action, ControlInput, Controller, ControllerStatus, ScriptFault};
use eval::{DEFAULT_STEP_BUDGET, Evaluator, Outputs, Value};
use parser::{Parser, Stmt};

/// Text colour of every action produced by a script.
pub const SCRIPT_TEXT_COLOUR: &str = "lightgrey";

// ── Script ────────────────────────────────────────────────────────────────────

/// Source text plus its parse result, shared by every robot running it.
#[derive(Debug)]
pub struct Script {
    source:   String,
    compiled: Result<Vec<Stmt>, ScriptFault>,
}

impl Script {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = lexer::tokenize(&source).and_then(|tokens| Parser::new(tokens).program());
        Self { source, compiled }
    }

    /// Parse `source`, failing on the first syntax error.
    pub fn compile(source: impl Into<String>) -> Result<Arc<Script>, ScriptFault> {
        let script = Script::new(source);
        match &script.compiled {
            Ok(_) => Ok(Arc::new(script)),
            Err(fault) => Err(fault.clone()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// `true` if the program contains no statements.
    pub fn is_empty(&self) -> bool {
        matches!(&self.compiled, Ok(stmts) if stmts.is_empty())
    }

    pub fn parse_error(&self) -> Option<&ScriptFault> {
        self.compiled.as_ref().err()
    }
}

// ── ScriptController ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HoldState {
    Evaluating,
    Holding { start_ms: f64, duration_ms: f64 },
}

/// Runs a [`Script`] once per tick, honouring hold times.
///
/// On any fault the robot gets [`Action::zero`] for that tick and the
/// controller's remembered action, variables, and hold state are left as
/// they were.
pub struct ScriptController {
    script:    Arc<Script>,
    limits:    SpeedLimits,
    budget:    u32,
    state:     HoldState,
    action:    Action,
    variables: [Value; 3],
    status:    ControllerStatus,
}

impl ScriptController {
    pub fn new(script: Arc<Script>, limits: SpeedLimits) -> Self {
        Self {
            script,
            limits,
            budget:    DEFAULT_STEP_BUDGET,
            state:     HoldState::Evaluating,
            action:    Action::zero(),
            variables: Default::default(),
            status:    ControllerStatus::Ready,
        }
    }

    pub fn with_step_budget(mut self, budget: u32) -> Self {
        self.budget = budget.max(1);
        self
    }

    /// Swap in a new program; hold state and variables carry over.
    pub fn set_script(&mut self, script: Arc<Script>) {
        self.script = script;
    }

    pub fn hold_state(&self) -> HoldState {
        self.state
    }

    /// Current value of `variableA`/`B`/`C` (index 0..3).
    pub fn variable(&self, k: usize) -> Option<&Value> {
        self.variables.get(k)
    }

    fn evaluate(&self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Result<Outputs, ScriptFault> {
        let program = match &self.script.compiled {
            Ok(stmts) => stmts,
            Err(fault) => return Err(fault.clone()),
        };
        let initial = Outputs {
            gripper_on: self.action.gripper_on,
            flash_on: self.action.flash_on,
            text: self.action.text.clone(),
            variables: self.variables.clone(),
            ..Outputs::default()
        };
        let mut evaluator = Evaluator::new(input, &self.limits, rng, initial, self.budget);
        evaluator.run(program)?;
        let out = evaluator.outputs;

        if !out.executed {
            return Err(ScriptFault::MissingCompletion);
        }
        check_speed("linearSpeed", out.linear_speed, self.limits.max_forward)?;
        check_speed("angularSpeed", out.angular_speed, self.limits.max_angular)?;
        Ok(out)
    }

    fn set_status(&mut self, status: ControllerStatus) {
        if status != self.status {
            if let ControllerStatus::Fault(fault) = &status {
                warn!(%fault, "controller script failed");
            }
            self.status = status;
        }
    }
}

/// Speeds are compared at the precision the physics layer receives them.
fn check_speed(name: &'static str, value: f64, max: f32) -> Result<(), ScriptFault> {
    if (value as f32).abs() <= max {
        Ok(())
    } else {
        Err(ScriptFault::SpeedOutOfRange { name, value, max })
    }
}

impl Controller for ScriptController {
    fn get_action(&mut self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Action {
        if let HoldState::Holding { start_ms, duration_ms } = self.state {
            if input.timestamp_ms - start_ms < duration_ms {
                return self.action.clone();
            }
            self.state = HoldState::Evaluating;
        }

        if self.script.is_empty() {
            self.set_status(ControllerStatus::Ready);
            return Action::zero();
        }

        match self.evaluate(input, rng) {
            Ok(out) => {
                self.action = Action {
                    linear_speed:   out.linear_speed as f32,
                    angular_speed:  out.angular_speed as f32,
                    gripper_on:     out.gripper_on,
                    flash_on:       out.flash_on,
                    emit_pheromone: out.emit_pheromone as f32,
                    text:           out.text,
                    text_colour:    SCRIPT_TEXT_COLOUR.to_string(),
                };
                self.variables = out.variables;
                if out.hold_time > 0.0 {
                    self.state = HoldState::Holding {
                        start_ms:    input.timestamp_ms,
                        duration_ms: out.hold_time,
                    };
                }
                self.set_status(ControllerStatus::Good);
                self.action.clone()
            }
            Err(fault) => {
                self.set_status(ControllerStatus::Fault(fault));
                Action::zero()
            }
        }
    }

    fn status(&self) -> ControllerStatus {
        self.status.clone()
    }

    fn name(&self) -> &'static str {
        "script"
    }
}
