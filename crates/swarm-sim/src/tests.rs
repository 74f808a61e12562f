//! Integration tests for swarm-sim.

use swarm_control::{ControllerKind, SensorRole};
use swarm_core::{BodyHandle, ObjectKind, Preset, PuckId, RobotId, ScenarioConfig, Tick, Vec2};
use swarm_physics::{ArenaWorld, PhysicsWorld};
use swarm_robot::ContactInfo;

use crate::{
    FieldChoice, NoopObserver, PuckStore, Sim, SimBuilder, SimError, SimObserver, WorldView,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(preset: Preset) -> ScenarioConfig {
    let mut c = ScenarioConfig::for_preset(preset);
    c.seed = 7;
    c
}

fn idle_sim(config: ScenarioConfig, robots: usize) -> Sim<ArenaWorld> {
    SimBuilder::headless(config)
        .controller(ControllerKind::Idle)
        .population_target(robots)
        .build()
        .unwrap()
}

/// Idle sim whose first robot exists (one tick run).
fn with_one_robot(config: ScenarioConfig) -> Sim<ArenaWorld> {
    let mut sim = idle_sim(config, 1);
    sim.tick(&mut NoopObserver).unwrap();
    assert_eq!(sim.robots().len(), 1);
    sim
}

/// World position `ahead` units beyond robot 0's gripper point.
fn past_gripper(sim: &Sim<ArenaWorld>, ahead: f32) -> Vec2 {
    let pose = sim.physics.pose(sim.robots[0].body()).unwrap();
    pose.transform(Vec2::new(
        sim.config.robot_radius + sim.config.puck_radius + ahead,
        0.0,
    ))
}

fn place(sim: &mut Sim<ArenaWorld>, puck: PuckId, at: Vec2) {
    let body = sim.pucks.get(puck).unwrap().body;
    sim.physics.set_position(body, at).unwrap();
}

/// Make robot 0's inner sensor for `kind` count one contact.
fn sense_inner(sim: &mut Sim<ArenaWorld>, kind: ObjectKind) {
    let role = match kind {
        ObjectKind::GreenPuck => SensorRole::InnerGreenPuck,
        _ => SensorRole::InnerRedPuck,
    };
    let sensor = sim.robots[0].sensor_mut(role).unwrap();
    sensor.on_contact_begin(&ContactInfo::puck(kind, false));
}

/// Put `puck` on the gripper point of robot 0 and make its inner sensor see it.
fn offer_puck(sim: &mut Sim<ArenaWorld>, puck: PuckId) {
    let anchor = past_gripper(sim, 0.0);
    place(sim, puck, anchor);
    let kind = sim.pucks.get(puck).unwrap().kind;
    sense_inner(sim, kind);
}

#[derive(Default)]
struct Recording {
    samples:  Vec<(u32, Tick)>,
    resets:   Vec<u32>,
    statuses: Vec<String>,
    ends:     Vec<Tick>,
    ticks:    u64,
}

impl SimObserver for Recording {
    fn on_tick_end(&mut self, _step: Tick) {
        self.ticks += 1;
    }

    fn on_sample(&mut self, view: &WorldView<'_>) {
        self.samples.push((view.trial, view.step));
    }

    fn on_reset(&mut self, trial: u32) {
        self.resets.push(trial);
    }

    fn on_status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn on_sim_end(&mut self, final_step: Tick) {
        self.ends.push(final_step);
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_world_without_robots() {
        let sim = idle_sim(config(Preset::SimpleCluster), 5);
        assert!(sim.robots().is_empty());
        assert_eq!(sim.puck_count(ObjectKind::RedPuck), 30);
        assert_eq!(sim.population_target(), 5);
        assert_eq!(sim.step(), Tick::ZERO);
    }

    #[test]
    fn degenerate_grid_is_refused() {
        let mut c = config(Preset::Sort);
        c.field_width = 0;
        let err = SimBuilder::headless(c).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn every_body_is_registered() {
        let mut sim = idle_sim(config(Preset::Oc2), 3);
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.objects.len(), sim.physics.body_count());
    }

    #[test]
    fn fields_follow_the_preset() {
        let sim = idle_sim(config(Preset::Pheromone), 1);
        assert!(sim.nest_field().is_some());
        assert!(sim.pheromone_field().is_some());

        let sim = idle_sim(config(Preset::Sort), 1);
        assert!(sim.nest_field().is_none());
        assert!(sim.pheromone_field().is_none());
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;

    #[test]
    fn one_spawn_per_tick_up_to_target() {
        let mut sim = idle_sim(config(Preset::SimpleCluster), 5);
        for t in 1..=5 {
            sim.tick(&mut NoopObserver).unwrap();
            assert_eq!(sim.robots().len(), t);
        }
        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert_eq!(sim.robots().len(), 5);
    }

    #[test]
    fn lowering_target_removes_one_per_tick() {
        let mut sim = idle_sim(config(Preset::SimpleCluster), 5);
        sim.run_ticks(5, &mut NoopObserver).unwrap();
        sim.set_population_target(2);
        sim.tick(&mut NoopObserver).unwrap();
        assert_eq!(sim.robots().len(), 4);
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        assert_eq!(sim.robots().len(), 2);
        assert_eq!(sim.objects.len(), sim.physics.body_count());
    }

    #[test]
    fn staggered_presets_spawn_on_update_steps_only() {
        let mut c = config(Preset::Firefly);
        c.steps_between_controller_updates = 5;
        let mut sim = idle_sim(c, 3);
        sim.run_ticks(6, &mut NoopObserver).unwrap();
        assert_eq!(sim.robots().len(), 2);
    }

    #[test]
    fn despawn_releases_held_puck() {
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());

        sim.set_population_target(0);
        sim.tick(&mut NoopObserver).unwrap();
        assert!(sim.robots().is_empty());
        assert!(!sim.puck(puck).unwrap().is_held());
        assert_eq!(sim.physics.constraint_count(), 0);
    }
}

// ── Grab / release ────────────────────────────────────────────────────────────

#[cfg(test)]
mod grab {
    use super::*;

    #[test]
    fn grab_needs_an_inner_sensor_count() {
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        assert!(!sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert!(!sim.robots()[0].is_holding());
    }

    #[test]
    fn grab_then_release() {
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[3];
        offer_puck(&mut sim, puck);

        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        let robot = &sim.robots()[0];
        assert_eq!(robot.held_kind(), Some(ObjectKind::RedPuck));
        assert_eq!(robot.hold().unwrap().puck, puck);
        assert_eq!(sim.puck(puck).unwrap().holder, Some(RobotId(0)));
        assert_eq!(sim.physics.constraint_count(), 1);
        assert!(!robot.sensor(SensorRole::InnerRedPuck).unwrap().is_active());

        assert!(sim.release_puck(RobotId(0)).unwrap());
        assert!(!sim.robots()[0].is_holding());
        assert!(!sim.puck(puck).unwrap().is_held());
        assert_eq!(sim.physics.constraint_count(), 0);
    }

    #[test]
    fn second_grab_and_second_release_are_no_ops() {
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert!(!sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert_eq!(sim.physics.constraint_count(), 1);

        assert!(sim.release_puck(RobotId(0)).unwrap());
        assert!(!sim.release_puck(RobotId(0)).unwrap());
    }

    #[test]
    fn held_pucks_are_never_grabbed_twice() {
        let mut c = config(Preset::SimpleCluster);
        c.n_red_pucks = 1;
        let mut sim = idle_sim(c, 2);
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());

        let sensor = sim.robots[1].sensor_mut(SensorRole::InnerRedPuck).unwrap();
        sensor.on_contact_begin(&ContactInfo::puck(ObjectKind::RedPuck, false));
        assert!(!sim.grab_nearest_puck(RobotId(1)).unwrap());
        assert_eq!(sim.puck(puck).unwrap().holder, Some(RobotId(0)));
    }

    fn three_red_pucks() -> (Sim<ArenaWorld>, Vec<PuckId>) {
        let mut c = config(Preset::SimpleCluster);
        c.n_red_pucks = 3;
        let sim = with_one_robot(c);
        let ids = sim.puck_store_ids(ObjectKind::RedPuck);
        assert_eq!(ids.len(), 3);
        (sim, ids)
    }

    #[test]
    fn nearest_to_the_gripper_is_grabbed() {
        let (mut sim, ids) = three_red_pucks();
        let spots = [8.0, 2.0, 40.0].map(|ahead| past_gripper(&sim, ahead));
        for (&id, at) in ids.iter().zip(spots) {
            place(&mut sim, id, at);
        }
        sense_inner(&mut sim, ObjectKind::RedPuck);

        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert_eq!(sim.robots()[0].hold().unwrap().puck, ids[1]);
        assert_eq!(sim.puck(ids[1]).unwrap().holder, Some(RobotId(0)));
        assert!(!sim.puck(ids[0]).unwrap().is_held());
    }

    #[test]
    fn held_puck_closer_than_the_rest_is_skipped() {
        let (mut sim, ids) = three_red_pucks();
        let spots = [1.0, 40.0, 5.0].map(|ahead| past_gripper(&sim, ahead));
        for (&id, at) in ids.iter().zip(spots) {
            place(&mut sim, id, at);
        }
        sim.pucks.get_mut(ids[0]).unwrap().holder = Some(RobotId(9));
        sense_inner(&mut sim, ObjectKind::RedPuck);

        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert_eq!(sim.robots()[0].hold().unwrap().puck, ids[2]);
    }

    #[test]
    fn equal_distances_go_to_the_first_created() {
        let (mut sim, ids) = three_red_pucks();
        let (spot, far) = (past_gripper(&sim, 2.0), past_gripper(&sim, 40.0));
        place(&mut sim, ids[2], spot);
        place(&mut sim, ids[1], spot);
        place(&mut sim, ids[0], far);
        sense_inner(&mut sim, ObjectKind::RedPuck);

        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert_eq!(sim.robots()[0].hold().unwrap().puck, ids[1]);
    }
}

// ── Nest ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod nest {
    use super::*;

    #[test]
    fn green_pucks_regrow_at_growth_points() {
        let mut sim = idle_sim(config(Preset::Pheromone), 0);
        assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 0);
        sim.tick(&mut NoopObserver).unwrap();
        assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 10);
        for p in sim.pucks(ObjectKind::GreenPuck) {
            assert!(p.position.distance(Vec2::new(75.0, 425.0)) < 30.0);
        }
    }

    #[test]
    fn absorbing_a_held_puck_clears_everything_at_once() {
        let mut sim = with_one_robot(config(Preset::Pheromone));
        let puck = sim.puck_store_ids(ObjectKind::GreenPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        let body = sim.puck(puck).unwrap().body;
        let before = sim.puck_count(ObjectKind::GreenPuck);

        assert!(sim.absorb_puck(puck).unwrap());
        assert!(sim.puck(puck).is_none());
        assert_eq!(sim.puck_count(ObjectKind::GreenPuck), before - 1);
        assert!(!sim.robots()[0].is_holding());
        assert!(!sim.physics.contains(body));
        assert_eq!(sim.physics.constraint_count(), 0);
        assert!(sim.objects.get(body).is_none());
    }

    #[test]
    fn red_pucks_are_not_absorbed() {
        let mut c = config(Preset::Pheromone);
        c.n_red_pucks = 1;
        let mut sim = idle_sim(c, 0);
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[0];
        assert!(!sim.absorb_puck(puck).unwrap());
        assert!(sim.puck(puck).is_some());
    }

    #[test]
    fn nest_contact_absorbs_a_loose_puck() {
        let mut sim = idle_sim(config(Preset::Pheromone), 0);
        sim.tick(&mut NoopObserver).unwrap();
        let puck = sim.puck_store_ids(ObjectKind::GreenPuck)[0];
        let body = sim.puck(puck).unwrap().body;
        let nest = sim.config.nest.unwrap().centre;
        sim.physics.set_position(body, nest).unwrap();

        sim.tick(&mut NoopObserver).unwrap();
        assert!(sim.puck(puck).is_none());
        assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 9);
    }

    #[test]
    fn held_puck_carried_into_the_nest_is_absorbed_on_tick() {
        let mut sim = with_one_robot(config(Preset::Pheromone));
        let puck = sim.puck_store_ids(ObjectKind::GreenPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());
        assert_eq!(sim.physics.constraint_count(), 1);
        let body = sim.puck(puck).unwrap().body;

        // Move robot and puck together so the puck sits on the nest centre.
        let nest = sim.config.nest.unwrap().centre;
        let robot_body = sim.robots[0].body();
        let robot_at = sim.physics.pose(robot_body).unwrap().position;
        let puck_at = sim.physics.pose(body).unwrap().position;
        sim.physics.set_position(robot_body, robot_at + (nest - puck_at)).unwrap();
        sim.physics.set_position(body, nest).unwrap();

        sim.tick(&mut NoopObserver).unwrap();
        assert!(sim.puck(puck).is_none());
        assert!(!sim.physics.contains(body));
        assert!(sim.objects.get(body).is_none());
        assert_eq!(sim.physics.constraint_count(), 0);
        assert!(!sim.robots()[0].is_holding());
        assert!(!sim.puck_store_ids(ObjectKind::GreenPuck).contains(&puck));
    }

    #[test]
    fn regrowth_reuses_puck_slots() {
        let mut sim = idle_sim(config(Preset::Pheromone), 0);
        sim.tick(&mut NoopObserver).unwrap();
        let capacity = sim.pucks.capacity();

        for _ in 0..5 {
            for id in sim.puck_store_ids(ObjectKind::GreenPuck) {
                assert!(sim.absorb_puck(id).unwrap());
            }
            assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 0);
            sim.tick(&mut NoopObserver).unwrap();
            assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 10);
        }
        assert_eq!(sim.pucks.capacity(), capacity);
    }
}

// ── Puck store ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod puck_store {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut store = PuckStore::new();
        let a = store.insert(ObjectKind::RedPuck, BodyHandle(0));
        let b = store.insert(ObjectKind::GreenPuck, BodyHandle(1));
        assert_eq!(store.remove(a).map(|p| p.body), Some(BodyHandle(0)));

        let c = store.insert(ObjectKind::GreenPuck, BodyHandle(2));
        assert_eq!(c, a);
        assert_eq!(store.capacity(), 2);
        assert_eq!(store.get(c).unwrap().body, BodyHandle(2));
        assert_eq!(store.ids(ObjectKind::GreenPuck), &[b, c]);
        assert!(store.ids(ObjectKind::RedPuck).is_empty());
    }

    #[test]
    fn creation_order_puts_reds_first() {
        let mut store = PuckStore::new();
        let g = store.insert(ObjectKind::GreenPuck, BodyHandle(0));
        let r = store.insert(ObjectKind::RedPuck, BodyHandle(1));
        let order: Vec<_> = store.in_creation_order().map(|p| p.id).collect();
        assert_eq!(order, vec![r, g]);

        store.clear();
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.insert(ObjectKind::RedPuck, BodyHandle(2)), PuckId(0));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_loop {
    use super::*;

    #[test]
    fn samples_at_the_analysis_cadence() {
        let mut c = config(Preset::SimpleCluster);
        c.max_step = 250;
        let mut sim = idle_sim(c, 1);
        let mut rec = Recording::default();
        sim.run(&mut rec).unwrap();

        let steps: Vec<u64> = rec.samples.iter().map(|(_, s)| s.0).collect();
        assert_eq!(steps, vec![0, 100, 200]);
        assert_eq!(rec.ticks, 251);
        assert_eq!(rec.ends, vec![Tick(250)]);
        assert!(sim.is_finished());
    }

    #[test]
    fn no_samples_when_analysis_is_off() {
        let mut c = config(Preset::Tutorial);
        c.max_step = 50;
        let mut sim = idle_sim(c, 1);
        let mut rec = Recording::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.samples.is_empty());
    }

    #[test]
    fn trials_repeat_after_max_step() {
        let mut c = config(Preset::SimpleCluster);
        c.max_step = 10;
        c.sample_interval = 5;
        c.reset_after_max_step = true;
        c.max_trials = 2;
        let mut sim = idle_sim(c, 2);
        let mut rec = Recording::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.resets, vec![1, 2]);
        assert_eq!(rec.samples.len(), 9);
        assert_eq!(rec.samples[3], (1, Tick(0)));
        assert_eq!(sim.trial(), 2);
    }

    #[test]
    fn reset_rebuilds_the_world() {
        let mut sim = idle_sim(config(Preset::Sort), 4);
        sim.run_ticks(4, &mut NoopObserver).unwrap();
        let puck = sim.puck_store_ids(ObjectKind::GreenPuck)[0];
        offer_puck(&mut sim, puck);
        assert!(sim.grab_nearest_puck(RobotId(0)).unwrap());

        sim.reset(99, &mut NoopObserver).unwrap();
        assert!(sim.robots().is_empty());
        assert_eq!(sim.step(), Tick::ZERO);
        assert_eq!(sim.physics.constraint_count(), 0);
        assert_eq!(sim.puck_count(ObjectKind::RedPuck), 30);
        assert_eq!(sim.puck_count(ObjectKind::GreenPuck), 30);
        assert!(sim.pucks.iter().all(|p| !p.is_held()));
        assert_eq!(sim.objects.len(), sim.physics.body_count());
    }

    #[test]
    fn same_seed_same_world() {
        let a = idle_sim(config(Preset::Sort), 1);
        let b = idle_sim(config(Preset::Sort), 1);
        assert_eq!(a.pucks(ObjectKind::RedPuck), b.pucks(ObjectKind::RedPuck));
    }

    #[test]
    fn bodies_stay_inside_the_walls() {
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        let body = sim.robots[0].body();
        sim.physics.set_position(body, Vec2::new(-50.0, 900.0)).unwrap();
        sim.tick(&mut NoopObserver).unwrap();

        let (min, max) = sim.config.bounds_for(sim.config.robot_radius);
        let p = sim.robot_pose(RobotId(0)).unwrap().position;
        assert!(p.x >= min.x && p.y <= max.y);
    }

    fn all_sensors_silent(sim: &Sim<ArenaWorld>) -> bool {
        sim.robots().iter().flat_map(|r| r.sensors()).all(|s| s.count() == 0)
    }

    #[test]
    fn sensor_counts_read_zero_after_each_tick() {
        // A puck on the gripper point overlaps the inner sensor during physics.
        let mut sim = with_one_robot(config(Preset::SimpleCluster));
        let puck = sim.puck_store_ids(ObjectKind::RedPuck)[0];
        let anchor = past_gripper(&sim, 0.0);
        place(&mut sim, puck, anchor);
        sim.tick(&mut NoopObserver).unwrap();
        assert!(all_sensors_silent(&sim));

        let mut busy = SimBuilder::headless(config(Preset::SimpleCluster))
            .controller(ControllerKind::Cluster)
            .population_target(10)
            .build()
            .unwrap();
        for _ in 0..60 {
            busy.tick(&mut NoopObserver).unwrap();
            assert!(all_sensors_silent(&busy));
        }
    }
}

// ── Status and snapshots ──────────────────────────────────────────────────────

#[cfg(test)]
mod status {
    use super::*;

    #[test]
    fn faulty_script_reports_once_and_keeps_ticking() {
        let c = config(Preset::SimpleCluster);
        let mut sim = SimBuilder::headless(c)
            .controller(ControllerKind::script("linearSpeed = ;"))
            .population_target(3)
            .build()
            .unwrap();
        let mut rec = Recording::default();
        sim.run_ticks(5, &mut rec).unwrap();

        assert_eq!(sim.robots().len(), 3);
        assert!(sim.status_message().starts_with("Status: Problem with controller!"));
        assert_eq!(rec.statuses.len(), 1);
        assert!(sim.robots().iter().all(|r| r.controller_status().is_fault()));
    }

    #[test]
    fn good_script_reports_good() {
        let mut sim = SimBuilder::headless(config(Preset::SimpleCluster))
            .controller(ControllerKind::script("linearSpeed = 0; execute();"))
            .population_target(1)
            .build()
            .unwrap();
        sim.tick(&mut NoopObserver).unwrap();
        assert_eq!(sim.status_message(), "Status: Good");
    }

    #[test]
    fn snapshot_lists_everything() {
        let mut sim = idle_sim(config(Preset::Pheromone), 2);
        sim.set_overlay(FieldChoice::Nest);
        sim.run_ticks(2, &mut NoopObserver).unwrap();

        let snap = sim.render_snapshot();
        assert_eq!(snap.robots.len(), 2);
        assert_eq!(snap.pucks.len(), 10);
        // Four walls, the nest, and two obstacles.
        assert_eq!(snap.fixtures.len(), 7);
        let overlay = snap.overlay.unwrap();
        assert_eq!((overlay.width, overlay.height), (50, 80));
    }

    #[test]
    fn controller_swap_reaches_existing_robots() {
        let mut sim = idle_sim(config(Preset::SimpleCluster), 2);
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        sim.set_controller(ControllerKind::Cluster);
        assert!(sim.robots().iter().all(|r| r.controller_name() == ControllerKind::Cluster.name()));
    }
}

impl Sim<ArenaWorld> {
    fn puck_store_ids(&self, kind: ObjectKind) -> Vec<PuckId> {
        self.pucks.ids(kind).to_vec()
    }
}
