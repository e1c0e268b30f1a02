// Per-tick simulation systems, one per step of the world update.

pub mod asteroids;
pub mod particles;
pub mod ship_movement;
pub mod spawn;
pub mod stations;

use crate::domain::entities::Player;
use crate::domain::vector::Vec2;

/// Entering the event horizon destroys the ship regardless of remaining hull.
pub fn check_event_horizon(player: &mut Player, black_hole: Vec2, event_horizon: f32) -> bool {
    if player.body.pos.distance(black_hole) < event_horizon {
        player.integrity = 0.0;
        return true;
    }
    false
}
