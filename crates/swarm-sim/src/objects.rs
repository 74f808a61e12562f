//! Handle tables: which simulation object each physics body stands for, and
//! the pucks themselves.
//!
//! Bodies never point back at their owners.  A contact event names two
//! `BodyHandle`s; the [`ObjectTable`] turns each into an [`ObjectRef`], and
//! the ids inside index the robot list or the [`PuckStore`].

use std::collections::HashMap;

use swarm_core::{BodyHandle, ObjectKind, PuckId, RobotId};

// ── ObjectRef ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    /// A robot's main body.
    Robot(RobotId),
    /// A solid part rigidly fixed to a robot (the OC2 plough).
    RobotPart(RobotId),
    /// Sensor zone `slot` of a robot.
    Sensor { robot: RobotId, slot: usize },
    Puck(PuckId),
    /// Boundary walls and static obstacles.
    Wall,
    Nest,
    GoalZone,
}

impl ObjectRef {
    /// Robot owning this body, if any.
    pub fn robot(self) -> Option<RobotId> {
        match self {
            ObjectRef::Robot(r) | ObjectRef::RobotPart(r) => Some(r),
            ObjectRef::Sensor { robot, .. } => Some(robot),
            _ => None,
        }
    }
}

/// `BodyHandle → ObjectRef` for every body the simulation created.
#[derive(Default, Debug)]
pub struct ObjectTable {
    map: HashMap<BodyHandle, ObjectRef>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: BodyHandle, object: ObjectRef) {
        self.map.insert(body, object);
    }

    pub fn get(&self, body: BodyHandle) -> Option<ObjectRef> {
        self.map.get(&body).copied()
    }

    pub fn remove(&mut self, body: BodyHandle) -> Option<ObjectRef> {
        self.map.remove(&body)
    }

    /// Forget every body belonging to `robot`.
    pub fn remove_robot(&mut self, robot: RobotId) {
        self.map.retain(|_, o| o.robot() != Some(robot));
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ── Pucks ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Puck {
    pub id:     PuckId,
    pub kind:   ObjectKind,
    pub body:   BodyHandle,
    /// Robot currently holding this puck.
    pub holder: Option<RobotId>,
}

impl Puck {
    #[inline]
    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }
}

/// Every live puck, plus per-colour lists in creation order.
///
/// A removed puck's slot is handed to the next insert, so regrowth keeps
/// the store at the size of the largest live population.
#[derive(Default, Debug)]
pub struct PuckStore {
    slots: Vec<Option<Puck>>,
    free:  Vec<PuckId>,
    red:   Vec<PuckId>,
    green: Vec<PuckId>,
}

impl PuckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ObjectKind, body: BodyHandle) -> PuckId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                PuckId((self.slots.len() - 1) as u32)
            }
        };
        self.slots[id.index()] = Some(Puck { id, kind, body, holder: None });
        match kind {
            ObjectKind::GreenPuck => self.green.push(id),
            _ => self.red.push(id),
        }
        id
    }

    pub fn get(&self, id: PuckId) -> Option<&Puck> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: PuckId) -> Option<&mut Puck> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Remove a puck from the store and from its colour list.
    pub fn remove(&mut self, id: PuckId) -> Option<Puck> {
        let puck = self.slots.get_mut(id.index())?.take()?;
        let list = match puck.kind {
            ObjectKind::GreenPuck => &mut self.green,
            _ => &mut self.red,
        };
        list.retain(|&p| p != id);
        self.free.push(id);
        Some(puck)
    }

    /// Ids of the pucks of one colour, in creation order.
    pub fn ids(&self, kind: ObjectKind) -> &[PuckId] {
        match kind {
            ObjectKind::RedPuck => &self.red,
            ObjectKind::GreenPuck => &self.green,
            _ => &[],
        }
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.ids(kind).len()
    }

    /// Live pucks, reds then greens, each colour in creation order.
    pub fn in_creation_order(&self) -> impl Iterator<Item = &Puck> + '_ {
        self.red.iter().chain(&self.green).filter_map(|&id| self.get(id))
    }

    /// All live pucks in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Puck> + '_ {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.red.len() + self.green.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.red.clear();
        self.green.clear();
    }
}
