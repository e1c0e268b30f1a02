// Station pricing and player transactions.
//
// Every transaction checks all preconditions before touching state, so a
// rejected transaction leaves player, station and upgrades untouched.

use crate::domain::entities::{Player, Station};
use crate::domain::tuning::{EconomyTuning, PlayerTuning};
use crate::domain::upgrades::{UpgradeId, UpgradeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionError {
    NothingToSell,
    AlreadyFull,
    MaxLevel,
    InsufficientCredits { cost: u64, credits: u64 },
}

/// Demand tier derived from station saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    High,
    Normal,
    Low,
}

pub fn demand(station: &Station, tuning: &EconomyTuning) -> Demand {
    let saturation = station.saturation();
    if saturation < tuning.high_demand_threshold {
        Demand::High
    } else if saturation > tuning.low_demand_threshold {
        Demand::Low
    } else {
        Demand::Normal
    }
}

/// Price per particle: floor(base × station multiplier × demand multiplier).
pub fn unit_price(station: &Station, tuning: &EconomyTuning) -> u64 {
    let demand_multiplier = match demand(station, tuning) {
        Demand::High => tuning.high_demand_multiplier,
        Demand::Normal => 1.0,
        Demand::Low => tuning.low_demand_multiplier,
    };
    floor_whole(
        tuning.base_price as f64 * station.price_multiplier as f64 * demand_multiplier as f64,
    )
}

/// Floors a credit or score amount after snapping away f32 representation error,
/// so 10 × 0.9 yields 9 and not 8. Negative amounts floor to zero.
pub fn floor_whole(value: f64) -> u64 {
    ((value * 1e4).round() / 1e4).max(0.0).floor() as u64
}

/// Sells the whole hold. Returns the credits earned.
pub fn sell_cargo(
    player: &mut Player,
    station: &mut Station,
    tuning: &EconomyTuning,
) -> Result<u64, TransactionError> {
    if player.cargo == 0 {
        return Err(TransactionError::NothingToSell);
    }

    let sold = player.cargo;
    let value = sold as u64 * unit_price(station, tuning);
    player.credits += value;
    station.inventory = (station.inventory + sold as f32).min(station.max_inventory);
    player.cargo = 0;
    Ok(value)
}

pub fn repair_cost(player: &Player, tuning: &EconomyTuning) -> u64 {
    let missing = (player.max_integrity - player.integrity).max(0.0);
    floor_whole(missing as f64 * tuning.repair_cost_per_unit as f64)
}

/// Restores the hull to full. Returns the credits spent.
pub fn repair(player: &mut Player, tuning: &EconomyTuning) -> Result<u64, TransactionError> {
    if player.integrity >= player.max_integrity {
        return Err(TransactionError::AlreadyFull);
    }
    let cost = repair_cost(player, tuning);
    if player.credits < cost {
        return Err(TransactionError::InsufficientCredits {
            cost,
            credits: player.credits,
        });
    }

    player.credits -= cost;
    player.integrity = player.max_integrity;
    Ok(cost)
}

pub fn refuel_cost(player: &Player, tuning: &EconomyTuning) -> u64 {
    let missing = (player.max_fuel - player.fuel).max(0.0);
    floor_whole(missing as f64 * tuning.refuel_cost_per_unit as f64)
}

/// Fills the fuel tank. Returns the credits spent.
pub fn refuel(player: &mut Player, tuning: &EconomyTuning) -> Result<u64, TransactionError> {
    if player.fuel >= player.max_fuel {
        return Err(TransactionError::AlreadyFull);
    }
    let cost = refuel_cost(player, tuning);
    if player.credits < cost {
        return Err(TransactionError::InsufficientCredits {
            cost,
            credits: player.credits,
        });
    }

    player.credits -= cost;
    player.fuel = player.max_fuel;
    Ok(cost)
}

/// Buys one level of `id` and reapplies upgrade effects. Returns the credits spent.
pub fn purchase_upgrade(
    player: &mut Player,
    upgrades: &mut UpgradeSet,
    id: UpgradeId,
    tuning: &EconomyTuning,
    player_tuning: &PlayerTuning,
) -> Result<u64, TransactionError> {
    let upgrade = upgrades.get(id);
    if upgrade.is_maxed() {
        return Err(TransactionError::MaxLevel);
    }
    let cost = upgrade.price(tuning.upgrade_cost_growth);
    if player.credits < cost {
        return Err(TransactionError::InsufficientCredits {
            cost,
            credits: player.credits,
        });
    }

    player.credits -= cost;
    upgrades.get_mut(id).level += 1;
    upgrades.apply_effects(player, player_tuning);
    Ok(cost)
}
