//! Unit tests for cs-mobility.

use std::sync::Arc;

use cs_core::{CyclistId, NodeId, Point2, ProfileId, SimTime};
use cs_spatial::{EdgeAttributes, RoadNetwork, RoadNetworkBuilder};

use crate::{CyclistPool, CyclistState, MovementInterpolator};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Band [3, 8] m/s, 200-step cap.
fn interpolator() -> MovementInterpolator {
    MovementInterpolator::new(3.0, 8.0, 200)
}

/// Two nodes 100 m apart joined by one road with `attrs`.
fn two_node_network(attrs: EdgeAttributes) -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let a = b.add_node_at("a", Point2::new(0.0, 0.0));
    let c = b.add_node_at("c", Point2::new(100.0, 0.0));
    b.add_road(a, c, attrs);
    b.build()
}

fn route(nodes: &[u32]) -> Arc<[NodeId]> {
    nodes.iter().map(|&n| NodeId(n)).collect()
}

// ── Speed model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use super::*;

    #[test]
    fn flat_is_neutral() {
        assert_eq!(interpolator().adjusted_velocity(5.0, 0.0), 5.0);
    }

    #[test]
    fn uphill_penalty_and_cap() {
        let i = interpolator();
        assert!((i.adjusted_velocity(5.0, 4.0) - 4.0).abs() < 1e-12);
        // 50 % cap gives 2.5, clamped up to the band floor.
        assert_eq!(i.adjusted_velocity(5.0, 10.0), 3.0);
        assert_eq!(i.adjusted_velocity(5.0, 60.0), 3.0);
    }

    #[test]
    fn downhill_bonus_and_cap() {
        let i = interpolator();
        assert!((i.adjusted_velocity(5.0, -5.0) - 5.75).abs() < 1e-12);
        assert!((i.adjusted_velocity(5.0, -20.0) - 6.5).abs() < 1e-12);
        assert!((i.adjusted_velocity(5.0, -80.0) - 6.5).abs() < 1e-12);
        assert_eq!(i.adjusted_velocity(7.5, -20.0), 8.0);
    }

    #[test]
    fn velocity_always_within_band() {
        let i = interpolator();
        for base in [0.5, 3.0, 4.2, 6.0, 8.0, 15.0] {
            for s in -200..=200 {
                let v = i.adjusted_velocity(base, s as f64 * 0.5);
                assert!((3.0..=8.0).contains(&v), "base {base} slope {s}: {v}");
            }
        }
        let v = i.adjusted_velocity(5.0, f64::NAN);
        assert_eq!(v, 5.0);
    }

    #[test]
    fn time_factor_from_safety_and_light() {
        let i = interpolator();
        assert_eq!(i.time_factor(5.0, 5.0), 1.0);
        assert!((i.time_factor(0.0, 0.0) - 1.5).abs() < 1e-12);
        assert!((i.time_factor(10.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(i.time_factor(-20.0, -20.0), 2.0);
        assert_eq!(i.time_factor(40.0, 40.0), 0.5);
    }
}

// ── Hop planning ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod hop {
    use super::*;
    use crate::MobilityError;

    #[test]
    fn uphill_hop_takes_longer() {
        let i = interpolator();
        let flat = EdgeAttributes::with_distance(100.0);
        let uphill = EdgeAttributes { slope_pct: 10.0, ..flat };
        let p_flat = i.plan(&flat, Point2::ORIGIN, Point2::new(100.0, 0.0), 5.0);
        let p_up = i.plan(&uphill, Point2::ORIGIN, Point2::new(100.0, 0.0), 5.0);
        assert!((p_flat.travel_secs - 20.0).abs() < 1e-9);
        assert!(p_up.travel_secs > p_flat.travel_secs);
    }

    #[test]
    fn dark_unsafe_hop_takes_longer_at_same_speed() {
        let i = interpolator();
        let lit = EdgeAttributes::with_distance(100.0);
        let dark = EdgeAttributes { safety: 1.0, luminosity: 0.0, ..lit };
        let a = i.plan(&lit, Point2::ORIGIN, Point2::new(100.0, 0.0), 5.0);
        let b = i.plan(&dark, Point2::ORIGIN, Point2::new(100.0, 0.0), 5.0);
        assert_eq!(a.velocity_mps, b.velocity_mps);
        assert!(b.travel_secs > a.travel_secs);
    }

    #[test]
    fn step_count_is_bounded() {
        let i = interpolator();
        let from = Point2::ORIGIN;
        let to = Point2::new(1.0, 0.0);
        assert_eq!(i.plan(&EdgeAttributes::with_distance(100.0), from, to, 5.0).steps, 20);
        assert_eq!(i.plan(&EdgeAttributes::with_distance(10_000.0), from, to, 5.0).steps, 200);
        assert_eq!(i.plan(&EdgeAttributes::with_distance(0.1), from, to, 5.0).steps, 1);
    }

    #[test]
    fn advance_ends_at_next_node() {
        let net = two_node_network(EdgeAttributes::with_distance(100.0));
        let start = SimTime::from_secs(10.0);
        let samples = interpolator().advance(&net, NodeId(0), NodeId(1), 5.0, start).unwrap();

        assert_eq!(samples.len(), 20);
        assert!(samples.windows(2).all(|w| w[0].0 < w[1].0));
        let (t_end, p_end) = *samples.last().unwrap();
        assert!((t_end.as_secs() - 30.0).abs() < 1e-9);
        assert_eq!(p_end, Point2::new(100.0, 0.0));
        assert!((samples[9].1.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_direction_sees_downhill() {
        let net = two_node_network(EdgeAttributes { slope_pct: 10.0, ..EdgeAttributes::with_distance(100.0) });
        let i = interpolator();
        let up = i.plan_hop(&net, NodeId(0), NodeId(1), 5.0).unwrap();
        let down = i.plan_hop(&net, NodeId(1), NodeId(0), 5.0).unwrap();
        assert!(down.travel_secs < up.travel_secs);
    }

    #[test]
    fn missing_road_is_an_error() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_at("a", Point2::ORIGIN);
        b.add_node_at("b", Point2::new(1.0, 0.0));
        let net = b.build();
        let err = interpolator().plan_hop(&net, NodeId(0), NodeId(1), 5.0).unwrap_err();
        assert!(matches!(err, MobilityError::NoEdge { .. }));
    }
}

// ── Trajectory ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trajectory {
    use super::*;
    use crate::Trajectory;

    #[test]
    fn stride_and_capacity() {
        let mut t = Trajectory::new(3, 5);
        for i in 0..20 {
            t.record(SimTime::from_secs(i as f64), Point2::new(i as f64, 0.0));
        }
        let times: Vec<f64> = t.iter().map(|p| p.time.as_secs()).collect();
        assert_eq!(times, vec![5.0, 10.0, 15.0]);
        assert_eq!(t.len(), t.capacity());
    }

    #[test]
    fn push_ignores_stride() {
        let mut t = Trajectory::new(10, 5);
        t.push(SimTime::ZERO, Point2::ORIGIN);
        t.push(SimTime::from_secs(1.0), Point2::new(1.0, 0.0));
        assert_eq!(t.len(), 2);
        assert_eq!(t.last().map(|p| p.position), Some(Point2::new(1.0, 0.0)));
    }

    #[test]
    fn release_memory_frees_buffer() {
        let mut t = Trajectory::new(10, 1);
        t.push(SimTime::ZERO, Point2::ORIGIN);
        t.release_memory();
        assert!(t.is_empty());
        assert_eq!(t.allocated(), 0);
    }
}

// ── Cyclist record ────────────────────────────────────────────────────────────

#[cfg(test)]
mod cyclist {
    use super::*;

    #[test]
    fn begin_trip_resets_record() {
        let mut pool = CyclistPool::new(1, 10, 10, 1);
        let acq = pool.acquire(SimTime::ZERO);
        let c = pool.get_mut(acq.id).unwrap();
        c.distance_m = 99.0;
        c.begin_trip(ProfileId(1), route(&[0, 1, 2]), 5.0, Point2::ORIGIN, SimTime::from_secs(3.0));

        assert_eq!(c.state, CyclistState::Waiting { until: SimTime::from_secs(3.0) });
        assert_eq!(c.distance_m, 0.0);
        assert_eq!(c.trajectory.len(), 1);
        assert_eq!(c.hop_count(), 2);
        assert_eq!(c.hop(1), Some((NodeId(1), NodeId(2))));
        assert_eq!(c.hop(2), None);
        assert_eq!(c.origin(), Some(NodeId(0)));
        assert_eq!(c.destination(), Some(NodeId(2)));
    }

    #[test]
    fn hop_progress_only_while_moving() {
        let moving = CyclistState::Moving { edge_index: 0, step: 5, steps: 20 };
        assert_eq!(moving.hop_progress(), 0.25);
        assert_eq!(CyclistState::Completed.hop_progress(), 0.0);
        assert!(moving.is_active());
        assert!(!CyclistState::Reclaimed.is_active());
    }
}

// ── Pool ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use super::*;
    use crate::MobilityError;

    #[test]
    fn prewarm_fills_free_list() {
        let mut pool = CyclistPool::new(4, 10, 10, 1);
        pool.prewarm();
        assert_eq!(pool.total_records(), 4);
        assert_eq!(pool.free_count(), 4);

        let acq = pool.acquire(SimTime::ZERO);
        assert_eq!(acq.id, CyclistId(0));
        assert!(!acq.recycled);
        assert_eq!(pool.total_records(), 4);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn active_count_never_exceeds_cap() {
        let mut pool = CyclistPool::new(0, 3, 10, 1);
        let mut ids = Vec::new();
        for i in 0..10 {
            let acq = pool.acquire(SimTime::from_secs(i as f64));
            assert!(pool.active_count() <= 3);
            assert_eq!(acq.recycled, i >= 3);
            ids.push(acq.id);
        }
        // Oldest-first recycling: the 4th acquisition reuses the 1st record.
        assert_eq!(ids[3], ids[0]);
        assert_eq!(pool.total_records(), 3);
        assert_eq!(pool.stats().forced_recycles, 7);
    }

    #[test]
    fn recycling_invalidates_old_generation() {
        let mut pool = CyclistPool::new(0, 1, 10, 1);
        let first = pool.acquire(SimTime::ZERO);
        assert!(pool.is_current(first.id, first.generation));

        let second = pool.acquire(SimTime::from_secs(1.0));
        assert_eq!(second.id, first.id);
        assert!(!pool.is_current(first.id, first.generation));
        assert!(pool.is_current(second.id, second.generation));
    }

    #[test]
    fn release_returns_record_to_free_list() {
        let mut pool = CyclistPool::new(0, 10, 10, 1);
        let acq = pool.acquire(SimTime::ZERO);
        pool.release(acq.id).unwrap();

        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.get(acq.id).map(|c| c.state), Some(CyclistState::Reclaimed));
        assert!(!pool.is_current(acq.id, acq.generation));
        assert!(matches!(pool.release(acq.id), Err(MobilityError::NotActive(_))));

        let again = pool.acquire(SimTime::ZERO);
        assert_eq!(again.id, acq.id);
        assert_eq!(pool.total_records(), 1);
    }

    #[test]
    fn sweep_reclaims_only_idle_records() {
        let mut pool = CyclistPool::new(0, 10, 10, 1);
        let idle = pool.acquire(SimTime::ZERO);
        let busy = pool.acquire(SimTime::ZERO);
        pool.get_mut(busy.id).unwrap().last_active = SimTime::from_secs(100.0);

        let report = pool.sweep_idle(SimTime::from_secs(350.0), 300.0);
        assert_eq!(report.reclaimed, vec![idle.id]);
        assert!(pool.is_current(busy.id, busy.generation));
        assert_eq!(pool.stats().idle_reclaimed, 1);
    }

    #[test]
    fn sweep_trims_free_records_beyond_prewarm() {
        let mut pool = CyclistPool::new(1, 10, 10, 1);
        pool.prewarm();
        let ids: Vec<CyclistId> = (0..3).map(|_| pool.acquire(SimTime::ZERO).id).collect();
        for &id in &ids {
            pool.get_mut(id)
                .unwrap()
                .begin_trip(ProfileId(0), route(&[0, 1]), 5.0, Point2::ORIGIN, SimTime::ZERO);
        }
        for &id in &ids {
            pool.release(id).unwrap();
        }

        let report = pool.sweep_idle(SimTime::ZERO, 300.0);
        assert!(report.reclaimed.is_empty());
        assert_eq!(report.trimmed, 2);
        assert_eq!(pool.sweep_idle(SimTime::ZERO, 300.0).trimmed, 0);
        assert_eq!(pool.free_count(), 3);
    }

    #[test]
    fn release_all_empties_active_set() {
        let mut pool = CyclistPool::new(0, 10, 10, 1);
        for _ in 0..4 {
            pool.acquire(SimTime::ZERO);
        }
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 4);
        assert_eq!(pool.iter_active().count(), 0);
    }
}
