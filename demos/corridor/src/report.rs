//! Console summary of a finished run.

use cs_sim::SimStatistics;

pub fn summarize(stats: &SimStatistics) -> String {
    format!(
        "spawned {} | completed {} | active {} | no-path {} | recycled {} | mean trip {:.1}s | {:.1} km ridden",
        stats.spawned,
        stats.completed,
        stats.active,
        stats.no_path,
        stats.forced_recycles,
        stats.mean_trip_secs(),
        stats.total_distance_m / 1_000.0,
    )
}
