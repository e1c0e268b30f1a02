use serde::Deserialize;

/// World extents and procedural field generation.

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,

    /// Asteroids in the first sector.
    pub base_asteroid_count: usize,

    /// Extra asteroids per sector after the first.
    pub asteroids_per_sector: usize,

    /// Asteroids never spawn closer than this to the black hole.
    pub min_spawn_distance: f32,

    pub asteroid_min_radius: f32,
    pub asteroid_max_radius: f32,

    /// Polygon vertex count range for asteroid outlines (inclusive).
    pub asteroid_min_vertices: usize,
    pub asteroid_max_vertices: usize,

    /// Initial drift speed bound for spawned asteroids.
    pub asteroid_drift: f32,

    pub station_radius: f32,

    /// Station display rotation per tick (radians).
    pub station_spin: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 3000.0,
            base_asteroid_count: 30,
            asteroids_per_sector: 10,
            min_spawn_distance: 300.0,
            asteroid_min_radius: 10.0,
            asteroid_max_radius: 30.0,
            asteroid_min_vertices: 7,
            asteroid_max_vertices: 12,
            asteroid_drift: 0.5,
            station_radius: 40.0,
            station_spin: 0.01,
        }
    }
}
