//! Unit tests for swarm-field.

use crate::{world_to_cell, FieldError, ScalarField};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn uniform(width: usize, height: usize, value: f32) -> ScalarField {
    let mut f = ScalarField::zero(width, height).unwrap();
    for i in 0..width {
        for j in 0..height {
            f.set(i, j, value);
        }
    }
    f
}

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn zero_field_is_all_zero() {
        let f = ScalarField::zero(4, 3).unwrap();
        assert_eq!(f.dimensions(), (4, 3));
        assert!(f.as_slice().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn empty_grid_rejected() {
        assert_eq!(
            ScalarField::zero(0, 5).unwrap_err(),
            FieldError::EmptyGrid { width: 0, height: 5 }
        );
        assert!(ScalarField::distance_field(0, 0, 3, 0).is_err());
    }

    #[test]
    fn source_outside_grid_rejected() {
        assert!(matches!(
            ScalarField::distance_field(5, 0, 3, 3),
            Err(FieldError::SourceOutOfRange { .. })
        ));
    }
}

#[cfg(test)]
mod distance {
    use super::*;

    #[test]
    fn source_is_one_and_values_in_unit_interval() {
        let f = ScalarField::distance_field(7, 3, 20, 12).unwrap();
        assert_eq!(f.get(7, 3), Some(1.0));
        assert!(f.as_slice().iter().all(|&c| (0.0..=1.0).contains(&c)));
    }

    #[test]
    fn farthest_cell_is_zero() {
        let f = ScalarField::distance_field(0, 0, 10, 10).unwrap();
        assert!(f.get(9, 9).unwrap().abs() < 1e-6);
    }

    #[test]
    fn non_increasing_with_distance() {
        let (si, sj) = (4usize, 9usize);
        let f = ScalarField::distance_field(si, sj, 15, 15).unwrap();
        let mut cells: Vec<(f32, f32)> = Vec::new();
        for i in 0..15 {
            for j in 0..15 {
                let dx = i as f32 - si as f32;
                let dy = j as f32 - sj as f32;
                cells.push(((dx * dx + dy * dy).sqrt(), f.get(i, j).unwrap()));
            }
        }
        cells.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in cells.windows(2) {
            assert!(w[1].1 <= w[0].1 + 1e-6, "{:?} then {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn single_cell_grid_is_source() {
        let f = ScalarField::distance_field(0, 0, 1, 1).unwrap();
        assert_eq!(f.get(0, 0), Some(1.0));
    }
}

#[cfg(test)]
mod step {
    use super::*;

    #[test]
    fn mass_non_increasing_with_decay() {
        let mut f = ScalarField::zero(10, 10).unwrap();
        f.deposit(5, 5, 1.0);
        f.deposit(1, 1, 0.8);
        f.deposit(8, 2, 0.3);
        let mut before = f.total_mass();
        for _ in 0..50 {
            f.step(0.1, 0.01);
            let after = f.total_mass();
            assert!(after <= before + 1e-9, "{after} > {before}");
            before = after;
        }
    }

    #[test]
    fn pure_decay_keeps_shape() {
        let mut f = uniform(6, 6, 0.5);
        f.step(0.0, 0.1);
        for i in 1..5 {
            for j in 1..5 {
                assert!((f.get(i, j).unwrap() - 0.45).abs() < 1e-6);
            }
        }
        // Border untouched.
        assert_eq!(f.get(0, 3), Some(0.5));
        assert_eq!(f.get(5, 5), Some(0.5));
    }

    #[test]
    fn diffusion_is_order_independent() {
        // A single spike spreads symmetrically to all 8 neighbours.
        let mut f = ScalarField::zero(7, 7).unwrap();
        f.set(3, 3, 1.0);
        f.step(0.8, 0.0);
        let centre = f.get(3, 3).unwrap();
        assert!((centre - 0.2).abs() < 1e-6);
        let n = f.get(2, 2).unwrap();
        for (i, j) in [(2, 3), (2, 4), (3, 2), (3, 4), (4, 2), (4, 3), (4, 4)] {
            assert!((f.get(i, j).unwrap() - n).abs() < 1e-7);
        }
        assert!((n - 0.1).abs() < 1e-6);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut f = ScalarField::zero(12, 12).unwrap();
        for i in 1..11 {
            f.deposit(i, i, 1.0);
        }
        for _ in 0..100 {
            f.step(1.0, 0.001);
        }
        assert!(f.as_slice().iter().all(|&c| (0.0..=1.0).contains(&c)));
    }
}

#[cfg(test)]
mod mapping {
    use swarm_core::Vec2;

    use super::*;

    #[test]
    fn scales_and_floors() {
        assert_eq!(world_to_cell(0.0, 0.0, 50, 80, 500.0, 800.0), (0, 0));
        assert_eq!(world_to_cell(19.9, 10.0, 50, 80, 500.0, 800.0), (1, 1));
        assert_eq!(world_to_cell(450.0, 450.0, 50, 50, 500.0, 500.0), (45, 45));
    }

    #[test]
    fn clamps_outside_points() {
        assert_eq!(world_to_cell(-5.0, 900.0, 50, 80, 500.0, 800.0), (0, 79));
        assert_eq!(world_to_cell(500.0, 800.0, 50, 80, 500.0, 800.0), (49, 79));
    }

    #[test]
    fn deposit_skips_border_and_clamps() {
        let mut f = ScalarField::zero(5, 5).unwrap();
        assert!(!f.deposit(0, 2, 1.0));
        assert!(!f.deposit(2, 4, 1.0));
        assert!(f.deposit(2, 2, 3.0));
        assert_eq!(f.get(2, 2), Some(1.0));
        assert_eq!(f.total_mass(), 1.0);
    }

    #[test]
    fn sample_world_reads_containing_cell() {
        let mut f = ScalarField::zero(10, 10).unwrap();
        f.set(3, 7, 0.25);
        assert_eq!(f.sample_world(Vec2::new(35.0, 71.0), 100.0, 100.0), 0.25);
    }
}
