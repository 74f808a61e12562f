//! Unit tests for swarm-physics.

use swarm_core::{BodyHandle, Pose, Vec2};

use crate::{ArenaWorld, BodyDesc, ContactEvent, ContactPhase, PhysicsError, PhysicsWorld, Shape};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(x: f32, y: f32) -> Pose {
    Pose::new(Vec2::new(x, y), 0.0)
}

fn step(world: &mut ArenaWorld) -> Vec<ContactEvent> {
    let mut events = Vec::new();
    world.step(1000.0 / 60.0, &mut events);
    events
}

fn begins(events: &[ContactEvent], zone: BodyHandle) -> Vec<BodyHandle> {
    events
        .iter()
        .filter(|e| e.zone == zone && e.phase == ContactPhase::Begin)
        .map(|e| e.other)
        .collect()
}

#[cfg(test)]
mod shapes {
    use super::*;

    #[test]
    fn circles_overlap_and_separate() {
        let a = Shape::circle(5.0).to_world(&at(0.0, 0.0));
        let b = Shape::circle(5.0).to_world(&at(8.0, 0.0));
        let c = Shape::circle(5.0).to_world(&at(11.0, 0.0));
        let pen = a.penetration(&b).unwrap();
        assert!((pen.depth - 2.0).abs() < 1e-4);
        assert!(pen.normal.x > 0.99);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn touching_is_not_overlap() {
        let a = Shape::circle(5.0).to_world(&at(0.0, 0.0));
        let b = Shape::circle(5.0).to_world(&at(10.0, 0.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn rect_and_circle() {
        let r = Shape::rect(10.0, 4.0).to_world(&at(0.0, 0.0));
        let hit = Shape::circle(1.0).to_world(&at(5.5, 0.0));
        let miss = Shape::circle(1.0).to_world(&at(0.0, 3.5));
        assert!(r.overlaps(&hit));
        assert!(!r.overlaps(&miss));
    }

    #[test]
    fn offset_rect_follows_rotation() {
        let shape = Shape::rect_at(Vec2::new(10.0, 0.0), 4.0, 4.0);
        let pose = Pose::new(Vec2::ZERO, std::f32::consts::FRAC_PI_2);
        let world = shape.to_world(&pose);
        assert!((world.centre() - Vec2::new(0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn area_of_rect() {
        assert!((Shape::rect(3.0, 4.0).area() - 12.0).abs() < 1e-5);
    }
}

#[cfg(test)]
mod bodies {
    use super::*;

    #[test]
    fn remove_root_removes_attached_and_constraints() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(100.0, 100.0))).unwrap();
        let zone = w
            .add_body(BodyDesc::attached(robot, Shape::circle(5.0), at(20.0, 0.0)).zone())
            .unwrap();
        let puck = w.add_body(BodyDesc::dynamic(Shape::circle(5.0), at(120.0, 100.0)).mass(0.1)).unwrap();
        w.attach(robot, Vec2::new(20.0, 0.0), puck, 0.5).unwrap();
        assert_eq!(w.body_count(), 3);
        assert_eq!(w.constraint_count(), 1);

        w.remove_body(robot).unwrap();
        assert!(!w.contains(robot));
        assert!(!w.contains(zone));
        assert!(w.contains(puck));
        assert_eq!(w.body_count(), 1);
        assert_eq!(w.constraint_count(), 0);
    }

    #[test]
    fn attached_body_cannot_be_moved_directly() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(0.0, 0.0))).unwrap();
        let zone = w
            .add_body(BodyDesc::attached(robot, Shape::circle(5.0), at(20.0, 0.0)).zone())
            .unwrap();
        assert_eq!(w.set_position(zone, Vec2::ZERO), Err(PhysicsError::NotRoot(zone)));
        assert_eq!(w.apply_force(zone, Vec2::ZERO), Err(PhysicsError::NotRoot(zone)));
    }

    #[test]
    fn attached_follows_root_pose() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(0.0, 0.0))).unwrap();
        let zone = w
            .add_body(BodyDesc::attached(robot, Shape::circle(5.0), at(20.0, 0.0)).zone())
            .unwrap();
        w.set_position(robot, Vec2::new(50.0, 50.0)).unwrap();
        let p = w.pose(zone).unwrap().position;
        assert!((p - Vec2::new(70.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn unknown_handles_error() {
        let mut w = ArenaWorld::new();
        assert!(matches!(w.remove_body(BodyHandle(3)), Err(PhysicsError::UnknownBody(_))));
        assert!(w.pose(BodyHandle(0)).is_none());
    }
}

#[cfg(test)]
mod motion {
    use super::*;

    #[test]
    fn force_moves_along_heading_and_clears() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(100.0, 100.0))).unwrap();
        w.apply_force(robot, Vec2::new(0.015, 0.0)).unwrap();
        step(&mut w);
        let moved = w.pose(robot).unwrap().position.x - 100.0;
        assert!(moved > 0.0);
        w.clear_forces();
        let before = w.pose(robot).unwrap().position;
        step(&mut w);
        // friction_air 1.0 removes all momentum.
        assert!((w.pose(robot).unwrap().position - before).length() < 1e-5);
    }

    #[test]
    fn torque_rotates() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(0.0, 0.0))).unwrap();
        w.set_torque(robot, 0.2).unwrap();
        step(&mut w);
        assert!(w.pose(robot).unwrap().angle > 0.0);
    }

    #[test]
    fn overlapping_solids_are_pushed_apart() {
        let mut w = ArenaWorld::new();
        let a = w.add_body(BodyDesc::dynamic(Shape::circle(10.0), at(0.0, 0.0))).unwrap();
        let b = w.add_body(BodyDesc::dynamic(Shape::circle(10.0), at(5.0, 0.0))).unwrap();
        for _ in 0..10 {
            step(&mut w);
        }
        let d = w.pose(a).unwrap().position.distance(w.pose(b).unwrap().position);
        assert!(d > 19.0, "still overlapping: {d}");
    }

    #[test]
    fn static_bodies_do_not_move() {
        let mut w = ArenaWorld::new();
        let wall = w.add_body(BodyDesc::fixed(Shape::rect(100.0, 10.0), at(0.0, 0.0))).unwrap();
        let ball = w.add_body(BodyDesc::dynamic(Shape::circle(10.0), at(0.0, 12.0))).unwrap();
        for _ in 0..5 {
            step(&mut w);
        }
        assert_eq!(w.pose(wall).unwrap().position, Vec2::ZERO);
        assert!(w.pose(ball).unwrap().position.y >= 14.9);
    }

    #[test]
    fn constraint_drags_held_body_to_anchor() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(100.0, 100.0))).unwrap();
        let puck = w
            .add_body(BodyDesc::dynamic(Shape::circle(5.0), at(130.0, 110.0)).mass(0.1))
            .unwrap();
        w.attach(robot, Vec2::new(20.0, 0.0), puck, 0.5).unwrap();
        for _ in 0..30 {
            step(&mut w);
        }
        let anchor = w.pose(robot).unwrap().transform(Vec2::new(20.0, 0.0));
        assert!(anchor.distance(w.pose(puck).unwrap().position) < 1.0);
    }
}

#[cfg(test)]
mod contacts {
    use super::*;

    #[test]
    fn begin_every_step_then_end_once() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(100.0, 100.0))).unwrap();
        let zone = w
            .add_body(BodyDesc::attached(robot, Shape::circle(8.0), at(20.0, 0.0)).zone())
            .unwrap();
        let puck = w.add_body(BodyDesc::dynamic(Shape::circle(5.0), at(125.0, 100.0))).unwrap();

        assert_eq!(begins(&step(&mut w), zone), vec![puck]);
        assert_eq!(begins(&step(&mut w), zone), vec![puck]);

        w.set_position(puck, Vec2::new(300.0, 300.0)).unwrap();
        let events = step(&mut w);
        assert!(begins(&events, zone).is_empty());
        assert!(events.contains(&ContactEvent { zone, other: puck, phase: ContactPhase::End }));

        let events = step(&mut w);
        assert!(events.is_empty());
    }

    #[test]
    fn zone_ignores_own_root() {
        let mut w = ArenaWorld::new();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(100.0, 100.0))).unwrap();
        let zone = w
            .add_body(BodyDesc::attached(robot, Shape::circle(20.0), at(0.0, 0.0)).zone())
            .unwrap();
        assert!(begins(&step(&mut w), zone).is_empty());
    }

    #[test]
    fn zone_pairs_report_both_sides() {
        let mut w = ArenaWorld::new();
        let goal = w.add_body(BodyDesc::fixed(Shape::circle(60.0), at(250.0, 250.0)).zone()).unwrap();
        let robot = w.add_body(BodyDesc::dynamic(Shape::circle(15.0), at(250.0, 250.0))).unwrap();
        let probe = w
            .add_body(BodyDesc::attached(robot, Shape::circle(2.0), at(0.0, 0.0)).zone())
            .unwrap();
        let events = step(&mut w);
        assert!(begins(&events, probe).contains(&goal));
        assert!(begins(&events, goal).contains(&probe));
        // The robot's solid body is also inside the goal zone.
        assert!(begins(&events, goal).contains(&robot));
    }

    #[test]
    fn removed_bodies_leave_no_end_events() {
        let mut w = ArenaWorld::new();
        let nest = w.add_body(BodyDesc::fixed(Shape::circle(30.0), at(0.0, 0.0)).zone()).unwrap();
        let puck = w.add_body(BodyDesc::dynamic(Shape::circle(5.0), at(5.0, 0.0))).unwrap();
        assert_eq!(begins(&step(&mut w), nest), vec![puck]);
        w.remove_body(puck).unwrap();
        assert!(step(&mut w).is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut w = ArenaWorld::new();
        w.add_body(BodyDesc::dynamic(Shape::circle(5.0), at(0.0, 0.0))).unwrap();
        w.clear();
        assert_eq!(w.body_count(), 0);
        let h = w.add_body(BodyDesc::dynamic(Shape::circle(5.0), at(0.0, 0.0))).unwrap();
        assert_eq!(h, BodyHandle(0));
    }
}
