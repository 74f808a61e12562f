//! Tree-walking evaluator with a step budget.
//!
//! A program sees a fixed set of names: read-only inputs (`timestamp`,
//! `redPuckHeld`, `greenPuckHeld`, the speed limits, `sensorReadings.*`),
//! writable outputs (`linearSpeed`, `holdTime`, …), and any locals it
//! creates by assignment.  Nothing else is reachable.

use std::collections::HashMap;
use std::fmt;

use swarm_core::{RobotRng, SpeedLimits};

use crate::script::parser::{BinOp, Expr, MAX_NESTING, ProbeField, Stmt, UnOp};
use crate::{ControlInput, ScriptFault};

/// Statements plus loop iterations one evaluation may execute.
pub const DEFAULT_STEP_BUDGET: u32 = 10_000;

/// Longest string, in bytes, a program may build.
pub const MAX_STRING_LEN: usize = 64 * 1024;

/// Statement nesting plus expression height of any parsed program.
const MAX_DEPTH: usize = 2 * MAX_NESTING;

// ── Value ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Num(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
        }
    }

    fn num(&self, context: &str) -> Result<f64, ScriptFault> {
        match self {
            Value::Num(n) => Ok(*n),
            other => Err(ScriptFault::Type(format!(
                "{context} needs a number, got a {}",
                other.type_name()
            ))),
        }
    }

    fn boolean(&self, context: &str) -> Result<bool, ScriptFault> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ScriptFault::Type(format!(
                "{context} needs true or false, got a {}",
                other.type_name()
            ))),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Num(0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

/// The writable variables a program leaves behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    pub linear_speed:   f64,
    pub angular_speed:  f64,
    pub gripper_on:     bool,
    pub flash_on:       bool,
    pub text:           String,
    /// `variableA`, `variableB`, `variableC`.
    pub variables:      [Value; 3],
    pub emit_pheromone: f64,
    pub hold_time:      f64,
    pub executed:       bool,
}

const VARIABLE_NAMES: [&str; 3] = ["variableA", "variableB", "variableC"];

// ── Evaluator ─────────────────────────────────────────────────────────────────

pub struct Evaluator<'a, 'r> {
    input:  &'a ControlInput<'a>,
    limits: &'a SpeedLimits,
    rng:    &'r mut RobotRng,
    locals: HashMap<String, Value>,
    steps:  u32,
    budget: u32,
    depth:  usize,
    pub outputs: Outputs,
}

impl<'a, 'r> Evaluator<'a, 'r> {
    pub fn new(
        input:   &'a ControlInput<'a>,
        limits:  &'a SpeedLimits,
        rng:     &'r mut RobotRng,
        outputs: Outputs,
        budget:  u32,
    ) -> Self {
        Self { input, limits, rng, locals: HashMap::new(), steps: 0, budget, depth: 0, outputs }
    }

    pub fn run(&mut self, program: &[Stmt]) -> Result<(), ScriptFault> {
        self.block(program)
    }

    fn tick(&mut self) -> Result<(), ScriptFault> {
        self.steps += 1;
        if self.steps > self.budget {
            Err(ScriptFault::StepBudget(self.budget))
        } else {
            Ok(())
        }
    }

    /// Run `f` one level deeper in the tree.
    fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ScriptFault>,
    ) -> Result<T, ScriptFault> {
        if self.depth >= MAX_DEPTH {
            return Err(ScriptFault::Runtime(format!("program nested deeper than {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn block(&mut self, stmts: &[Stmt]) -> Result<(), ScriptFault> {
        stmts.iter().try_for_each(|s| self.statement(s))
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<(), ScriptFault> {
        self.descend(|ev| ev.execute(stmt))
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), ScriptFault> {
        self.tick()?;
        match stmt {
            Stmt::Assign { name, value, .. } => {
                let v = self.expr(value)?;
                self.assign(name, v)
            }
            Stmt::Expr(e) => self.expr(e).map(|_| ()),
            Stmt::If { cond, then, otherwise } => {
                if self.expr(cond)?.truthy() {
                    self.block(then)
                } else {
                    self.block(otherwise)
                }
            }
            Stmt::While { cond, body } => {
                while self.expr(cond)?.truthy() {
                    self.tick()?;
                    self.block(body)?;
                }
                Ok(())
            }
        }
    }

    // ── Names ─────────────────────────────────────────────────────────────

    fn assign(&mut self, name: &str, v: Value) -> Result<(), ScriptFault> {
        let out = &mut self.outputs;
        match name {
            "linearSpeed" => out.linear_speed = v.num(name)?,
            "angularSpeed" => out.angular_speed = v.num(name)?,
            "emitPheromone" => out.emit_pheromone = v.num(name)?,
            "holdTime" => out.hold_time = v.num(name)?,
            "gripperOn" => out.gripper_on = v.boolean(name)?,
            "flashOn" => out.flash_on = v.boolean(name)?,
            "executed" => out.executed = v.boolean(name)?,
            "textMessage" => out.text = v.to_string(),
            _ => {
                if let Some(k) = VARIABLE_NAMES.iter().position(|&n| n == name) {
                    out.variables[k] = v;
                } else if self.is_input(name) {
                    return Err(ScriptFault::Runtime(format!("`{name}` is read-only")));
                } else {
                    self.locals.insert(name.to_string(), v);
                }
            }
        }
        Ok(())
    }

    fn is_input(&self, name: &str) -> bool {
        matches!(
            name,
            "timestamp" | "redPuckHeld" | "greenPuckHeld" | "MAX_FORWARD_SPEED" | "MAX_ANGULAR_SPEED"
        )
    }

    fn lookup(&self, name: &str) -> Result<Value, ScriptFault> {
        let out = &self.outputs;
        let v = match name {
            "timestamp" => Value::Num(self.input.timestamp_ms),
            "redPuckHeld" => Value::Bool(self.input.red_puck_held),
            "greenPuckHeld" => Value::Bool(self.input.green_puck_held),
            "MAX_FORWARD_SPEED" => Value::Num(self.limits.max_forward as f64),
            "MAX_ANGULAR_SPEED" => Value::Num(self.limits.max_angular as f64),
            "linearSpeed" => Value::Num(out.linear_speed),
            "angularSpeed" => Value::Num(out.angular_speed),
            "emitPheromone" => Value::Num(out.emit_pheromone),
            "holdTime" => Value::Num(out.hold_time),
            "gripperOn" => Value::Bool(out.gripper_on),
            "flashOn" => Value::Bool(out.flash_on),
            "executed" => Value::Bool(out.executed),
            "textMessage" => Value::Str(out.text.clone()),
            _ => {
                if let Some(k) = VARIABLE_NAMES.iter().position(|&n| n == name) {
                    out.variables[k].clone()
                } else {
                    self.locals
                        .get(name)
                        .cloned()
                        .ok_or_else(|| ScriptFault::UnknownName(name.to_string()))?
                }
            }
        };
        Ok(v)
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn expr(&mut self, e: &Expr) -> Result<Value, ScriptFault> {
        self.descend(|ev| ev.value_of(e))
    }

    fn value_of(&mut self, e: &Expr) -> Result<Value, ScriptFault> {
        match e {
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => self.lookup(name),
            Expr::Count(role) => self
                .input
                .reading
                .count(*role)
                .map(|c| Value::Num(c as f64))
                .ok_or(ScriptFault::MissingSensor(role.name())),
            Expr::Probe(probe, field) => {
                let sample = self
                    .input
                    .reading
                    .probe(*probe)
                    .ok_or(ScriptFault::MissingSensor(probe.name()))?;
                Ok(Value::Num(match field {
                    ProbeField::Nest => sample.nest_value as f64,
                    ProbeField::Pheromone => sample.pheromone_value as f64,
                }))
            }
            Expr::Unary(UnOp::Not, inner) => Ok(Value::Bool(!self.expr(inner)?.truthy())),
            Expr::Unary(UnOp::Neg, inner) => Ok(Value::Num(-self.expr(inner)?.num("`-`")?)),
            Expr::Binary(BinOp::Or, a, b) => {
                let v = self.expr(a)?.truthy() || self.expr(b)?.truthy();
                Ok(Value::Bool(v))
            }
            Expr::Binary(BinOp::And, a, b) => {
                let v = self.expr(a)?.truthy() && self.expr(b)?.truthy();
                Ok(Value::Bool(v))
            }
            Expr::Binary(op, a, b) => {
                let lhs = self.expr(a)?;
                let rhs = self.expr(b)?;
                binary(*op, lhs, rhs)
            }
            Expr::Call(name, args) => self.call(name, args),
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<Value, ScriptFault> {
        let values = args.iter().map(|a| self.expr(a)).collect::<Result<Vec<_>, _>>()?;
        let arity = |n: usize| {
            if values.len() == n {
                Ok(())
            } else {
                Err(ScriptFault::Runtime(format!(
                    "{name}() takes {n} argument(s), got {}",
                    values.len()
                )))
            }
        };
        match name {
            "execute" => {
                arity(0)?;
                self.outputs.executed = true;
                Ok(Value::Bool(true))
            }
            "random" => {
                arity(0)?;
                Ok(Value::Num(self.rng.random::<f64>()))
            }
            "abs" => {
                arity(1)?;
                Ok(Value::Num(values[0].num("abs()")?.abs()))
            }
            "floor" => {
                arity(1)?;
                Ok(Value::Num(values[0].num("floor()")?.floor()))
            }
            "min" => {
                arity(2)?;
                Ok(Value::Num(values[0].num("min()")?.min(values[1].num("min()")?)))
            }
            "max" => {
                arity(2)?;
                Ok(Value::Num(values[0].num("max()")?.max(values[1].num("max()")?)))
            }
            _ => Err(ScriptFault::UnknownName(format!("{name}()"))),
        }
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ScriptFault> {
    use Value::{Bool, Num, Str};

    let symbol = match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Or => "||",
        BinOp::And => "&&",
    };
    let mismatch = |l: &Value, r: &Value| {
        ScriptFault::Type(format!("cannot apply `{symbol}` to {} and {}", l.type_name(), r.type_name()))
    };

    Ok(match (op, &lhs, &rhs) {
        (BinOp::Eq, _, _) => Bool(lhs == rhs),
        (BinOp::Ne, _, _) => Bool(lhs != rhs),

        (BinOp::Add, Num(a), Num(b)) => Num(a + b),
        (BinOp::Add, Str(_), _) | (BinOp::Add, _, Str(_)) => Str(concat(&lhs, &rhs)?),
        (BinOp::Sub, Num(a), Num(b)) => Num(a - b),
        (BinOp::Mul, Num(a), Num(b)) => Num(a * b),
        (BinOp::Div, Num(a), Num(b)) => Num(a / b),
        (BinOp::Rem, Num(a), Num(b)) => Num(a % b),

        (BinOp::Lt, Num(a), Num(b)) => Bool(a < b),
        (BinOp::Le, Num(a), Num(b)) => Bool(a <= b),
        (BinOp::Gt, Num(a), Num(b)) => Bool(a > b),
        (BinOp::Ge, Num(a), Num(b)) => Bool(a >= b),
        (BinOp::Lt, Str(a), Str(b)) => Bool(a < b),
        (BinOp::Le, Str(a), Str(b)) => Bool(a <= b),
        (BinOp::Gt, Str(a), Str(b)) => Bool(a > b),
        (BinOp::Ge, Str(a), Str(b)) => Bool(a >= b),

        _ => return Err(mismatch(&lhs, &rhs)),
    })
}

/// `lhs + rhs` as text, refusing results longer than [`MAX_STRING_LEN`].
fn concat(lhs: &Value, rhs: &Value) -> Result<String, ScriptFault> {
    let (l, r) = (lhs.to_string(), rhs.to_string());
    let len = l.len() + r.len();
    if len > MAX_STRING_LEN {
        return Err(ScriptFault::Runtime(format!(
            "string of {len} bytes exceeds the {MAX_STRING_LEN}-byte limit"
        )));
    }
    Ok(l + &r)
}
