//! Node placement, performed once when a network is built.
//!
//! Priority: geographic coordinates (projected to metres) when every node
//! has them, then explicit positions, then a seeded Fruchterman–Reingold
//! spring layout.  Explicit positions always win over the spring layout for
//! the nodes that carry one.

use cs_core::{GeoPoint, Point2, SimRng};

/// Side of the square the spring layout starts in, metres.
const SPRING_EXTENT_M: f64 = 1_000.0;

const SPRING_ITERATIONS: usize = 100;

pub(crate) fn resolve_positions(
    explicit: &[Option<Point2>],
    geo:      &[Option<GeoPoint>],
    pairs:    &[(usize, usize)],
    seed:     u64,
) -> Vec<Point2> {
    let n = explicit.len();
    if n == 0 {
        return Vec::new();
    }

    let all_geo: Option<Vec<GeoPoint>> = geo.iter().copied().collect();
    if let Some(points) = all_geo {
        return project_geo(&points);
    }

    let all_explicit: Option<Vec<Point2>> = explicit.iter().copied().collect();
    if let Some(points) = all_explicit {
        return points;
    }

    let mut positions = spring_layout(n, pairs, seed, SPRING_ITERATIONS);
    for (pos, fixed) in positions.iter_mut().zip(explicit) {
        if let Some(p) = fixed {
            *pos = *p;
        }
    }
    positions
}

/// Project coordinates onto a metric plane anchored at the south-west
/// corner of their bounding box.
pub fn project_geo(points: &[GeoPoint]) -> Vec<Point2> {
    let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
    let min_lon = points.iter().map(|p| p.lon).fold(f64::INFINITY, f64::min);
    if !min_lat.is_finite() || !min_lon.is_finite() {
        return vec![Point2::ORIGIN; points.len()];
    }
    let origin = GeoPoint::new(min_lat, min_lon);
    points.iter().map(|p| p.project_from(origin)).collect()
}

/// Force-directed layout (Fruchterman–Reingold) over `n` nodes.
///
/// Deterministic for a given `seed`.  Disconnected nodes drift apart under
/// repulsion but stay inside the cooling schedule's bounded displacement.
pub fn spring_layout(n: usize, pairs: &[(usize, usize)], seed: u64, iterations: usize) -> Vec<Point2> {
    let mut rng = SimRng::new(seed);
    let mut pos: Vec<Point2> = (0..n)
        .map(|_| Point2::new(rng.uniform_in(0.0, SPRING_EXTENT_M), rng.uniform_in(0.0, SPRING_EXTENT_M)))
        .collect();
    if n < 2 {
        return pos;
    }

    let k = (SPRING_EXTENT_M * SPRING_EXTENT_M / n as f64).sqrt();
    let mut temperature = SPRING_EXTENT_M / 10.0;
    let cooling = temperature / (iterations.max(1) as f64 + 1.0);
    let mut disp = vec![(0.0f64, 0.0f64); n];

    for _ in 0..iterations {
        disp.iter_mut().for_each(|d| *d = (0.0, 0.0));

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = dx.hypot(dy).max(1e-3);
                let force = k * k / dist;
                let (ux, uy) = (dx / dist, dy / dist);
                disp[i].0 += ux * force;
                disp[i].1 += uy * force;
                disp[j].0 -= ux * force;
                disp[j].1 -= uy * force;
            }
        }

        // Attraction along roads.
        for &(a, b) in pairs {
            if a == b {
                continue;
            }
            let dx = pos[a].x - pos[b].x;
            let dy = pos[a].y - pos[b].y;
            let dist = dx.hypot(dy).max(1e-3);
            let force = dist * dist / k;
            let (ux, uy) = (dx / dist, dy / dist);
            disp[a].0 -= ux * force;
            disp[a].1 -= uy * force;
            disp[b].0 += ux * force;
            disp[b].1 += uy * force;
        }

        for (p, &(dx, dy)) in pos.iter_mut().zip(&disp) {
            let len = dx.hypot(dy);
            if len > 0.0 {
                let step = len.min(temperature);
                p.x += dx / len * step;
                p.y += dy / len * step;
            }
        }
        temperature = (temperature - cooling).max(1e-3);
    }
    pos
}
