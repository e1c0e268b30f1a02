use crate::domain::entities::{Player, Station};
use crate::domain::tuning::{EconomyTuning, WorldTuning};

/// Spins stations, drains their inventory and returns the nearest station in
/// docking range of the player, if any.
pub fn tick_stations(
    stations: &mut [Station],
    player: &Player,
    economy: &EconomyTuning,
    world: &WorldTuning,
) -> Option<u64> {
    let mut dockable: Option<(u64, f32)> = None;

    for station in stations.iter_mut() {
        station.body.angle += world.station_spin;
        station.inventory = (station.inventory - economy.consumption_per_tick).max(0.0);

        let distance = station.body.pos.distance(player.body.pos);
        if distance < station.body.radius + economy.docking_margin {
            match dockable {
                Some((_, best)) if best <= distance => {}
                _ => dockable = Some((station.body.id, distance)),
            }
        }
    }

    dockable.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Body;
    use crate::domain::tuning::PlayerTuning;
    use crate::domain::vector::Vec2;

    fn station(id: u64, pos: Vec2, inventory: f32) -> Station {
        Station {
            body: Body::new(id, pos, 40.0, 1000.0),
            name: format!("Station {id}"),
            color: "#ffffff".to_string(),
            price_multiplier: 1.0,
            inventory,
            max_inventory: 500.0,
        }
    }

    #[test]
    fn when_player_is_within_margin_then_nearest_station_is_dockable() {
        let economy = EconomyTuning::default();
        let world = WorldTuning::default();
        let player = Player::new(1, Vec2::new(0.0, 0.0), &PlayerTuning::default());
        let mut stations = vec![
            station(10, Vec2::new(80.0, 0.0), 100.0),
            station(11, Vec2::new(50.0, 0.0), 100.0),
            station(12, Vec2::new(500.0, 0.0), 100.0),
        ];

        let dockable = tick_stations(&mut stations, &player, &economy, &world);

        assert_eq!(dockable, Some(11));
    }

    #[test]
    fn when_player_is_far_away_then_nothing_is_dockable() {
        let economy = EconomyTuning::default();
        let world = WorldTuning::default();
        let player = Player::new(1, Vec2::new(0.0, 0.0), &PlayerTuning::default());
        let mut stations = vec![station(10, Vec2::new(90.0, 0.0), 100.0)];

        assert_eq!(tick_stations(&mut stations, &player, &economy, &world), None);
    }

    #[test]
    fn inventory_drains_each_tick_and_stops_at_zero() {
        let economy = EconomyTuning::default();
        let world = WorldTuning::default();
        let player = Player::new(1, Vec2::new(0.0, 0.0), &PlayerTuning::default());
        let mut stations = vec![station(10, Vec2::new(1000.0, 0.0), 0.06)];

        tick_stations(&mut stations, &player, &economy, &world);
        assert!((stations[0].inventory - 0.01).abs() < 1e-5);
        assert!((stations[0].body.angle - world.station_spin).abs() < 1e-6);

        tick_stations(&mut stations, &player, &economy, &world);
        assert_eq!(stations[0].inventory, 0.0);
    }
}
