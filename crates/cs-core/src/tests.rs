//! Unit tests for cs-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CyclistId, EdgeId, NodeId, ProfileId};

    #[test]
    fn index_roundtrip() {
        let id = CyclistId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(CyclistId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(ProfileId::INVALID.0, u16::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn profile_id_overflow_rejected() {
        assert!(ProfileId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, Point2};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(4.6097, -74.0817);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(4.0, -74.0);
        let b = GeoPoint::new(5.0, -74.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn projection_signs_follow_compass() {
        let origin = GeoPoint::new(4.60, -74.08);
        let ne = GeoPoint::new(4.61, -74.07).project_from(origin);
        assert!(ne.x > 0.0 && ne.y > 0.0);
        let sw = GeoPoint::new(4.59, -74.09).project_from(origin);
        assert!(sw.x < 0.0 && sw.y < 0.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, -4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point2::new(5.0, -2.0));
        assert!((a.distance(b) - 116f64.sqrt()).abs() < 1e-9);
    }
}

#[cfg(test)]
mod time {
    use std::collections::BTreeMap;

    use crate::SimTime;

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(SimTime::from_secs(-3.0), SimTime::ZERO);
        assert_eq!(SimTime::from_secs(f64::NAN), SimTime::ZERO);
    }

    #[test]
    fn after_never_goes_backwards() {
        let t = SimTime::from_secs(10.0);
        assert_eq!(t.after(-5.0), t);
        assert_eq!(t.after(f64::NAN), t);
        assert_eq!(t.after(2.5).as_secs(), 12.5);
    }

    #[test]
    fn orders_numerically_as_map_key() {
        let mut m = BTreeMap::new();
        m.insert(SimTime::from_secs(3.0), "c");
        m.insert(SimTime::from_secs(0.5), "a");
        m.insert(SimTime::from_secs(1.0), "b");
        let order: Vec<_> = m.values().copied().collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn since_saturates() {
        let a = SimTime::from_secs(2.0);
        let b = SimTime::from_secs(5.0);
        assert_eq!(b.since(a), 3.0);
        assert_eq!(a.since(b), 0.0);
    }
}

#[cfg(test)]
mod config {
    use crate::SimConfig;

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_velocity_band_rejected() {
        let cfg = SimConfig { velocity_min_mps: 9.0, velocity_max_mps: 4.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_horizon_rejected() {
        let cfg = SimConfig { horizon_secs: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_step_cap_rejected() {
        let cfg = SimConfig { max_steps_per_edge: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(1);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.random();
        let b: u64 = c1.random();
        assert_ne!(a, b);
    }

    #[test]
    fn uniform_in_respects_band() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform_in(3.0, 8.0);
            assert!((3.0..=8.0).contains(&v));
        }
        assert_eq!(rng.uniform_in(5.0, 5.0), 5.0);
        assert_eq!(rng.uniform_in(6.0, 2.0), 6.0);
    }
}
