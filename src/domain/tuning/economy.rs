use serde::Deserialize;

/// Station pricing and service costs.

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Credits per particle before station and demand multipliers.
    pub base_price: f32,

    /// Saturation below which a station pays the high-demand premium.
    pub high_demand_threshold: f32,
    pub high_demand_multiplier: f32,

    /// Saturation above which a station pays the low-demand discount.
    pub low_demand_threshold: f32,
    pub low_demand_multiplier: f32,

    /// Credits per missing point of hull integrity.
    pub repair_cost_per_unit: f32,

    /// Credits per missing unit of fuel.
    pub refuel_cost_per_unit: f32,

    /// Growth factor applied to upgrade prices per level.
    pub upgrade_cost_growth: f32,

    /// Inventory units each station consumes per tick.
    pub consumption_per_tick: f32,

    pub station_max_inventory: f32,

    /// Distance past the station radius within which docking is offered.
    pub docking_margin: f32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            base_price: 10.0,
            high_demand_threshold: 0.25,
            high_demand_multiplier: 1.5,
            low_demand_threshold: 0.75,
            low_demand_multiplier: 0.6,
            repair_cost_per_unit: 2.0,
            refuel_cost_per_unit: 1.0,
            upgrade_cost_growth: 1.5,
            consumption_per_tick: 0.05,
            station_max_inventory: 500.0,
            docking_margin: 50.0,
        }
    }
}
