//! Unit tests for cs-spatial.
//!
//! All tests use hand-crafted networks with explicit positions so the spring
//! layout only runs where it is under test.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use cs_core::{NodeId, Point2, ProfileId};
    use crate::{
        EdgeAttribute, EdgeAttributes, Profile, ProfileSet, ProfileWeights, RoadNetwork,
        RoadNetworkBuilder,
    };

    /// Five nodes, five roads:
    ///
    /// ```text
    ///   n0 ─100─ n1 ─100─ n2
    ///   │                 │
    ///  500               100
    ///   │                 │
    ///   n3 ──────100───── n4
    /// ```
    ///
    /// Shortest by distance n0→n4 is n0→n1→n2→n4 (300 m vs 600 m).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node_at("n0", Point2::new(0.0, 100.0));
        let n1 = b.add_node_at("n1", Point2::new(100.0, 100.0));
        let n2 = b.add_node_at("n2", Point2::new(200.0, 100.0));
        let n3 = b.add_node_at("n3", Point2::new(0.0, 0.0));
        let n4 = b.add_node_at("n4", Point2::new(200.0, 0.0));

        b.add_road(n0, n1, EdgeAttributes::with_distance(100.0));
        b.add_road(n1, n2, EdgeAttributes::with_distance(100.0));
        b.add_road(n2, n4, EdgeAttributes::with_distance(100.0));
        b.add_road(n0, n3, EdgeAttributes::with_distance(500.0));
        b.add_road(n3, n4, EdgeAttributes::with_distance(100.0));

        (b.build(), [n0, n1, n2, n3, n4])
    }

    pub fn single_profile(attr: EdgeAttribute, weight: f64) -> Arc<ProfileSet> {
        let weights = ProfileWeights::new().with(attr, weight);
        let profile = Profile::new(ProfileId(0), "rider", 1.0, weights);
        Arc::new(ProfileSet::new(vec![profile]).unwrap())
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use cs_core::{GeoPoint, Point2};
    use crate::{EdgeAttributes, RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(matches!(net.validate(true), Err(SpatialError::InvalidGraph(_))));
    }

    #[test]
    fn roads_are_bidirectional() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.road_count(), 5);
        assert_eq!(net.edge_count(), 10);
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n4), 2);
        assert!(net.edge_between(n2, n1).is_some());
        assert!(net.edge_between(n3, n0).is_some());
        assert!(net.edge_between(n1, n3).is_none());
    }

    #[test]
    fn out_edges_start_at_their_node() {
        let (net, nodes) = super::helpers::grid_network();
        for n in nodes {
            for e in net.out_edges(n) {
                assert_eq!(net.edge_from[e.index()], n);
            }
        }
    }

    #[test]
    fn reverse_edge_negates_slope() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node_at("a", Point2::new(0.0, 0.0));
        let c = b.add_node_at("c", Point2::new(100.0, 0.0));
        b.add_road(a, c, EdgeAttributes { slope_pct: 4.0, ..EdgeAttributes::with_distance(100.0) });
        let net = b.build();

        let up = net.edge_between(a, c).unwrap();
        let down = net.edge_between(c, a).unwrap();
        assert_eq!(net.attrs(up).slope_pct, 4.0);
        assert_eq!(net.attrs(down).slope_pct, -4.0);
        assert_eq!(net.attrs(down).distance_m, 100.0);
    }

    #[test]
    fn geo_nodes_override_literal_distance() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_geo_node("a", GeoPoint::new(0.0, 0.0));
        let c = b.add_geo_node("c", GeoPoint::new(1.0, 0.0));
        b.add_road(a, c, EdgeAttributes::with_distance(5.0));
        let net = b.build();

        let e = net.edge_between(a, c).unwrap();
        assert!((net.attrs(e).distance_m - 111_195.0).abs() < 200.0);

        // Projected relative to the south-west corner.
        assert_eq!(net.position(a), Point2::ORIGIN);
        assert!((net.position(c).y - 111_195.0).abs() < 200.0);
    }

    #[test]
    fn labels_resolve() {
        let (net, [_, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.node_by_label("n1"), Some(n1));
        assert_eq!(net.label(n1), "n1");
        assert_eq!(net.node_by_label("nope"), None);
    }

    #[test]
    fn roads_to_unknown_nodes_are_dropped() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node_at("a", Point2::ORIGIN);
        b.add_road(a, cs_core::NodeId(9), EdgeAttributes::with_distance(10.0));
        let net = b.build();
        assert_eq!(net.edge_count(), 0);
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use cs_core::Point2;
    use crate::{EdgeAttributes, RoadNetworkBuilder, SpatialError};

    #[test]
    fn grid_is_valid() {
        let (net, _) = super::helpers::grid_network();
        assert!(net.validate(true).is_ok());
        assert!(net.is_connected());
    }

    #[test]
    fn single_node_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_at("a", Point2::ORIGIN);
        assert!(matches!(b.build().validate(false), Err(SpatialError::InvalidGraph(_))));
    }

    #[test]
    fn non_positive_distance_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node_at("a", Point2::ORIGIN);
        let c = b.add_node_at("c", Point2::new(1.0, 0.0));
        b.add_road(a, c, EdgeAttributes::with_distance(0.0));
        assert!(matches!(b.build().validate(false), Err(SpatialError::InvalidGraph(_))));
    }

    #[test]
    fn disconnected_rejected_only_when_required() {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<_> = (0..4)
            .map(|i| b.add_node_at(format!("n{i}"), Point2::new(i as f64, 0.0)))
            .collect();
        b.add_road(n[0], n[1], EdgeAttributes::with_distance(10.0));
        b.add_road(n[2], n[3], EdgeAttributes::with_distance(10.0));
        let net = b.build();

        assert_eq!(net.component_count(), 2);
        assert!(matches!(net.validate(true), Err(SpatialError::Disconnected { components: 2 })));
        assert!(net.validate(false).is_ok());
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod layout {
    use crate::{EdgeAttributes, RoadNetworkBuilder};

    fn ring(seed: u64) -> Vec<cs_core::Point2> {
        let mut b = RoadNetworkBuilder::new().layout_seed(seed);
        let n: Vec<_> = (0..4).map(|i| b.add_node(format!("n{i}"))).collect();
        for i in 0..4 {
            b.add_road(n[i], n[(i + 1) % 4], EdgeAttributes::with_distance(100.0));
        }
        b.build().node_pos
    }

    #[test]
    fn spring_layout_is_deterministic() {
        assert_eq!(ring(7), ring(7));
    }

    #[test]
    fn spring_layout_positions_are_finite_and_distinct() {
        let pos = ring(3);
        assert!(pos.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                assert!(pos[i].distance(pos[j]) > 1e-6);
            }
        }
    }
}

// ── Attribute normalization & profiles ────────────────────────────────────────

#[cfg(test)]
mod normalization {
    use cs_core::ProfileId;
    use crate::{AttributeRange, EdgeAttribute, Profile, ProfileSet, ProfileWeights, SpatialError};

    #[test]
    fn higher_is_worse_is_inverted() {
        let r = AttributeRange { min: 100.0, max: 500.0 };
        assert_eq!(r.normalize(EdgeAttribute::Distance, 100.0), 1.0);
        assert_eq!(r.normalize(EdgeAttribute::Distance, 500.0), 0.0);
        assert_eq!(r.normalize(EdgeAttribute::Safety, 500.0), 1.0);
        assert_eq!(r.normalize(EdgeAttribute::Luminosity, 100.0), 0.0);
    }

    #[test]
    fn degenerate_range_is_zero() {
        let r = AttributeRange { min: 5.0, max: 5.0 };
        assert_eq!(r.normalize(EdgeAttribute::Safety, 5.0), 0.0);
        assert_eq!(AttributeRange::EMPTY.normalize(EdgeAttribute::Slope, 1.0), 0.0);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let r = AttributeRange { min: 0.0, max: 10.0 };
        assert_eq!(r.normalize(EdgeAttribute::Safety, 42.0), 1.0);
        assert_eq!(r.normalize(EdgeAttribute::Safety, -3.0), 0.0);
        assert_eq!(r.normalize(EdgeAttribute::Safety, f64::NAN), 0.0);
    }

    #[test]
    fn contribution_within_weight() {
        let (net, _) = super::helpers::grid_network();
        let weights = ProfileWeights::new()
            .with(EdgeAttribute::Distance, 2.5)
            .with(EdgeAttribute::Safety, 0.7)
            .with(EdgeAttribute::Slope, 4.0);
        let p = Profile::new(ProfileId(0), "mixed", 1.0, weights);
        for attrs in &net.edge_attrs {
            for attr in EdgeAttribute::ALL {
                let c = p.contribution(attr, attrs.get(attr), net.ranges());
                assert!(c >= 0.0 && c <= weights.get(attr), "{attr}: {c}");
            }
            assert!(p.edge_cost(attrs, net.ranges()) > 0.0);
        }
    }

    #[test]
    fn negative_and_nan_weights_clamp_to_zero() {
        let w = ProfileWeights::new()
            .with(EdgeAttribute::Distance, -2.0)
            .with(EdgeAttribute::Safety, f64::NAN)
            .with(EdgeAttribute::Slope, 1.5);
        assert_eq!(w.get(EdgeAttribute::Distance), 0.0);
        assert_eq!(w.get(EdgeAttribute::Safety), 0.0);
        assert_eq!(w.total(), 1.5);
        assert_eq!(w.iter().count(), 1);
    }

    #[test]
    fn profile_set_reassigns_ids() {
        let set = ProfileSet::new(vec![
            Profile::new(ProfileId(9), "fast", 0.7, ProfileWeights::new()),
            Profile::new(ProfileId(9), "safe", 0.3, ProfileWeights::new()),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.by_name("safe").map(|p| p.id), Some(ProfileId(1)));
        assert_eq!(set.probabilities(), vec![0.7, 0.3]);
    }

    #[test]
    fn empty_profile_set_rejected() {
        assert!(matches!(ProfileSet::new(Vec::new()), Err(SpatialError::EmptyProfiles)));
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use cs_core::{Point2, ProfileId};
    use crate::{
        fewest_hops, DijkstraRouter, EdgeAttribute, EdgeAttributes, RoadNetworkBuilder,
        RouteResolver, Router, SpatialError,
    };

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let costs = vec![1.0; net.edge_count()];
        let r = DijkstraRouter.route(&net, &costs, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.total_cost, 0.0);
    }

    #[test]
    fn distance_profile_takes_shortest() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let mut resolver = RouteResolver::new(net.into(), super::helpers::single_profile(EdgeAttribute::Distance, 1.0));
        let r = resolver.resolve(ProfileId(0), n0, n4).unwrap();
        assert_eq!(&*r.path, &[n0, n1, n2, n4]);
        assert!(!r.fallback);
    }

    #[test]
    fn safety_profile_prefers_safe_detour() {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<_> = (0..5).map(|i| b.add_node_at(format!("n{i}"), Point2::new(i as f64, 0.0))).collect();
        let unsafe_road = EdgeAttributes { safety: 2.0, ..EdgeAttributes::with_distance(100.0) };
        let safe_road = EdgeAttributes { safety: 9.0, ..EdgeAttributes::with_distance(500.0) };
        b.add_road(n[0], n[1], unsafe_road);
        b.add_road(n[1], n[2], unsafe_road);
        b.add_road(n[2], n[4], unsafe_road);
        b.add_road(n[0], n[3], safe_road);
        b.add_road(n[3], n[4], unsafe_road);

        let mut resolver = RouteResolver::new(b.build().into(), super::helpers::single_profile(EdgeAttribute::Safety, 1.0));
        let r = resolver.resolve(ProfileId(0), n[0], n[4]).unwrap();
        assert_eq!(&*r.path, &[n[0], n[3], n[4]]);
    }

    #[test]
    fn slope_profile_avoids_climb_but_takes_descent() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node_at("a", Point2::new(0.0, 0.0));
        let m = b.add_node_at("m", Point2::new(50.0, 50.0));
        let c = b.add_node_at("c", Point2::new(100.0, 0.0));
        b.add_road(a, c, EdgeAttributes { slope_pct: 10.0, ..EdgeAttributes::with_distance(100.0) });
        b.add_road(a, m, EdgeAttributes::with_distance(100.0));
        b.add_road(m, c, EdgeAttributes { slope_pct: -5.0, ..EdgeAttributes::with_distance(100.0) });

        let mut resolver = RouteResolver::new(b.build().into(), super::helpers::single_profile(EdgeAttribute::Slope, 1.0));
        let up = resolver.resolve(ProfileId(0), a, c).unwrap();
        assert_eq!(&*up.path, &[a, m, c]);
        let down = resolver.resolve(ProfileId(0), c, a).unwrap();
        assert_eq!(&*down.path, &[c, a]);
    }

    #[test]
    fn no_route_across_components() {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<_> = (0..4).map(|i| b.add_node_at(format!("n{i}"), Point2::new(i as f64, 0.0))).collect();
        b.add_road(n[0], n[1], EdgeAttributes::with_distance(10.0));
        b.add_road(n[2], n[3], EdgeAttributes::with_distance(10.0));
        let net = b.build();
        let costs = vec![1.0; net.edge_count()];

        assert!(matches!(DijkstraRouter.route(&net, &costs, n[0], n[3]), Err(SpatialError::NoRoute { .. })));
        assert!(matches!(fewest_hops(&net, n[0], n[3]), Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn infinite_cost_edges_are_impassable() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        let mut costs = vec![1.0; net.edge_count()];
        // Close n0→n3; the only way left is the long way round.
        let closed = net.edge_between(n0, n3).unwrap();
        costs[closed.index()] = f64::INFINITY;
        let r = DijkstraRouter.route(&net, &costs, n0, n3).unwrap();
        assert_eq!(r.hop_count(), 4);
        assert_eq!(r.nodes.last(), Some(&n3));
        let _ = n4;
    }

    #[test]
    fn fewest_hops_ignores_costs() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        let r = fewest_hops(&net, n0, n4).unwrap();
        assert_eq!(r.nodes, vec![n0, n3, n4]);
        assert_eq!(r.total_cost, 2.0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let costs = vec![1.0; net.edge_count()];
        let r = DijkstraRouter.route(&net, &costs, n0, cs_core::NodeId(99));
        assert!(matches!(r, Err(SpatialError::NodeNotFound(_))));
    }
}

// ── Route cache & resolver ────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use std::sync::Arc;

    use cs_core::{NodeId, ProfileId};
    use crate::{
        CacheBudget, EdgeAttribute, RoadNetwork, Route, RouteCache, RouteKey, RouteResolver,
        Router, SpatialError, SpatialResult,
    };

    fn key(profile: u16, o: u32, d: u32) -> RouteKey {
        RouteKey::new(ProfileId(profile), NodeId(o), NodeId(d))
    }

    fn path(o: u32, d: u32) -> Arc<[NodeId]> {
        vec![NodeId(o), NodeId(d)].into()
    }

    #[test]
    fn repeated_resolve_hits_cache_and_matches_fresh_search() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let mut resolver = RouteResolver::new(net.into(), super::helpers::single_profile(EdgeAttribute::Distance, 1.0));

        let first = resolver.resolve(ProfileId(0), n0, n4).unwrap();
        let second = resolver.resolve(ProfileId(0), n0, n4).unwrap();
        let fresh = resolver.resolve_uncached(ProfileId(0), n0, n4).unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.path, second.path);
        assert_eq!(&*second.path, fresh.nodes.as_slice());

        let stats = resolver.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn per_profile_overflow_drops_oldest_half() {
        let mut cache = RouteCache::new(CacheBudget { per_profile: 4, global: 100 });
        for d in 1..=5 {
            cache.insert(key(0, 0, d), path(0, d));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 2);
        assert!(!cache.contains(&key(0, 0, 1)));
        assert!(!cache.contains(&key(0, 0, 2)));
        assert!(cache.contains(&key(0, 0, 5)));
    }

    #[test]
    fn global_overflow_trims_profiles_above_fair_share() {
        let mut cache = RouteCache::new(CacheBudget { per_profile: 100, global: 4 });
        for d in 1..=3 {
            cache.insert(key(0, 0, d), path(0, d));
        }
        cache.insert(key(1, 0, 1), path(0, 1));
        cache.insert(key(1, 0, 2), path(0, 2));

        assert_eq!(cache.len(), 4);
        assert_eq!(cache.profile_len(ProfileId(0)), 2);
        assert_eq!(cache.profile_len(ProfileId(1)), 2);
        assert!(!cache.contains(&key(0, 0, 1)));
    }

    #[test]
    fn reinsert_does_not_duplicate_bucket_entry() {
        let mut cache = RouteCache::new(CacheBudget { per_profile: 10, global: 10 });
        cache.insert(key(0, 0, 1), path(0, 1));
        cache.insert(key(0, 0, 1), path(0, 1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.profile_len(ProfileId(0)), 1);
    }

    #[test]
    fn invalidate_clears_everything() {
        let mut cache = RouteCache::new(CacheBudget::for_graph(5));
        cache.insert(key(0, 0, 1), path(0, 1));
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.profile_len(ProfileId(0)), 0);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn budget_grows_with_graph() {
        let small = CacheBudget::for_graph(5);
        let large = CacheBudget::for_graph(10_000);
        assert!(small.per_profile < large.per_profile);
        assert!(small.global < large.global);
    }

    #[test]
    fn replacing_network_invalidates_resolver() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let mut resolver = RouteResolver::new(net.into(), super::helpers::single_profile(EdgeAttribute::Distance, 1.0));
        resolver.resolve(ProfileId(0), n0, n4).unwrap();
        assert_eq!(resolver.cache().len(), 1);

        let (fresh, _) = super::helpers::grid_network();
        resolver.set_network(fresh.into());
        assert!(resolver.cache().is_empty());
        assert!(!resolver.resolve(ProfileId(0), n0, n4).unwrap().from_cache);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let mut resolver = RouteResolver::new(net.into(), super::helpers::single_profile(EdgeAttribute::Distance, 1.0));
        assert!(matches!(
            resolver.resolve(ProfileId(3), n0, n4),
            Err(SpatialError::UnknownProfile(ProfileId(3)))
        ));
    }

    /// Router that never finds anything, forcing the fallback.
    struct Unreachable;

    impl Router for Unreachable {
        fn route(&self, _: &RoadNetwork, _: &[f64], from: NodeId, to: NodeId) -> SpatialResult<Route> {
            Err(SpatialError::NoRoute { from, to })
        }
    }

    #[test]
    fn weighted_failure_falls_back_to_fewest_hops() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        let mut resolver = RouteResolver::with_router(
            net.into(),
            super::helpers::single_profile(EdgeAttribute::Distance, 1.0),
            Unreachable,
        );
        let r = resolver.resolve(ProfileId(0), n0, n4).unwrap();
        assert!(r.fallback);
        assert_eq!(&*r.path, &[n0, n3, n4]);
        assert_eq!(resolver.fallback_count(), 1);
        assert!(resolver.cache().is_empty());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{load_network_csv, load_network_reader, SpatialError};

    const NODES: &str = "node,x,y\nA,0,0\nB,100,0\nC,100,100\n";
    const ROADS: &str = "origin,destination,distance,safety,luminosity,slope\n\
                         A,B,100,7,6,2.5\n\
                         B,C,120,3,4,\n";

    #[test]
    fn loads_labels_and_attributes() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(ROADS), 0).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.road_count(), 2);

        let a = net.node_by_label("A").unwrap();
        let b = net.node_by_label("B").unwrap();
        let c = net.node_by_label("C").unwrap();
        let ab = net.attrs(net.edge_between(a, b).unwrap());
        assert_eq!(ab.distance_m, 100.0);
        assert_eq!(ab.safety, 7.0);
        assert_eq!(ab.luminosity, 6.0);
        assert_eq!(ab.slope_pct, 2.5);
        assert_eq!(net.attrs(net.edge_between(c, b).unwrap()).slope_pct, 0.0);
        assert_eq!(net.position(c).y, 100.0);
        assert!(net.validate(true).is_ok());
    }

    #[test]
    fn missing_attribute_columns_use_defaults() {
        let roads = "origin,destination,distance\nA,B,100\n";
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(roads), 0).unwrap();
        let attrs = net.attrs(cs_core::EdgeId(0));
        assert_eq!(attrs.safety, 5.0);
        assert_eq!(attrs.luminosity, 5.0);
        assert_eq!(attrs.slope_pct, 0.0);
    }

    #[test]
    fn geo_nodes_derive_distance() {
        let nodes = "node,lat,lon\nA,0.0,0.0\nB,0.01,0.0\n";
        let roads = "origin,destination,distance\nA,B,\n";
        let net = load_network_reader(Cursor::new(nodes), Cursor::new(roads), 0).unwrap();
        let d = net.attrs(cs_core::EdgeId(0)).distance_m;
        assert!((d - 1_112.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn unknown_label_rejected() {
        let roads = "origin,destination,distance\nA,Z,100\n";
        let err = load_network_reader(Cursor::new(NODES), Cursor::new(roads), 0).unwrap_err();
        assert!(matches!(err, SpatialError::UnknownNode(ref l) if l == "Z"));
    }

    #[test]
    fn duplicate_label_rejected() {
        let nodes = "node,x,y\nA,0,0\nA,1,1\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new("origin,destination\n"), 0).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn out_of_scale_safety_rejected() {
        let roads = "origin,destination,distance,safety\nA,B,100,11\n";
        let err = load_network_reader(Cursor::new(NODES), Cursor::new(roads), 0).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn missing_distance_without_coordinates_rejected() {
        let roads = "origin,destination,distance\nA,B,\n";
        let err = load_network_reader(Cursor::new(NODES), Cursor::new(roads), 0).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        let roads = dir.path().join("roads.csv");
        std::fs::write(&nodes, NODES).unwrap();
        std::fs::write(&roads, ROADS).unwrap();

        let net = load_network_csv(&nodes, &roads, 0).unwrap();
        assert_eq!(net.road_count(), 2);
        assert!(matches!(
            load_network_csv(&dir.path().join("missing.csv"), &roads, 0),
            Err(SpatialError::Io(_))
        ));
    }
}
