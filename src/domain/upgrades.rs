// Upgrade catalog and derived player attributes.

use crate::domain::entities::Player;
use crate::domain::tuning::PlayerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeId {
    SingularityStrength,
    Range,
    Hull,
    Cargo,
    Thrusters,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 5] = [
        UpgradeId::SingularityStrength,
        UpgradeId::Range,
        UpgradeId::Hull,
        UpgradeId::Cargo,
        UpgradeId::Thrusters,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeId::SingularityStrength => "singularity_strength",
            UpgradeId::Range => "range",
            UpgradeId::Hull => "hull",
            UpgradeId::Cargo => "cargo",
            UpgradeId::Thrusters => "thrusters",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }
}

#[derive(Debug, Clone)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    /// Price of the first purchase.
    pub cost: u64,
    /// Current level, always within `1..=max_level`.
    pub level: u32,
    pub max_level: u32,
}

impl Upgrade {
    fn catalog_entry(id: UpgradeId) -> Self {
        let (name, description, cost, max_level) = match id {
            UpgradeId::SingularityStrength => (
                "Graviton Amplifier",
                "Strengthens the singularity pull.",
                100,
                5,
            ),
            UpgradeId::Range => (
                "Field Projector",
                "Extends the reach of the singularity.",
                150,
                5,
            ),
            UpgradeId::Hull => ("Hull Plating", "Raises maximum hull integrity.", 120, 5),
            UpgradeId::Cargo => ("Containment Bay", "Holds more exotic matter.", 200, 5),
            UpgradeId::Thrusters => ("Ion Thrusters", "Improves ship acceleration.", 100, 5),
        };
        Self {
            id,
            name,
            description,
            cost,
            level: 1,
            max_level,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Current purchase price: floor(cost × growth^(level−1)).
    pub fn price(&self, growth: f32) -> u64 {
        let exponent = self.level.saturating_sub(1) as i32;
        (self.cost as f64 * (growth as f64).powi(exponent)).floor() as u64
    }
}

/// The full set of upgrades owned by one player.
#[derive(Debug, Clone)]
pub struct UpgradeSet {
    // Indexed by `UpgradeId` discriminant, in `UpgradeId::ALL` order.
    upgrades: [Upgrade; 5],
}

impl Default for UpgradeSet {
    fn default() -> Self {
        Self {
            upgrades: UpgradeId::ALL.map(Upgrade::catalog_entry),
        }
    }
}

impl UpgradeSet {
    pub fn get(&self, id: UpgradeId) -> &Upgrade {
        &self.upgrades[id as usize]
    }

    pub(crate) fn get_mut(&mut self, id: UpgradeId) -> &mut Upgrade {
        &mut self.upgrades[id as usize]
    }

    pub fn level(&self, id: UpgradeId) -> u32 {
        self.get(id).level
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    /// Recomputes every upgrade-driven attribute from current levels.
    ///
    /// Pure recomputation: applying the same set twice leaves the player unchanged.
    /// Integrity is clamped to the new maximum but never raised.
    pub fn apply_effects(&self, player: &mut Player, tuning: &PlayerTuning) {
        let step = |id: UpgradeId| self.level(id).saturating_sub(1) as f32;

        player.singularity_strength = 1.0 + step(UpgradeId::SingularityStrength) * 0.5;
        player.singularity_radius = 200.0 + step(UpgradeId::Range) * 50.0;
        player.max_integrity = tuning.base_integrity + step(UpgradeId::Hull) * 25.0;
        player.max_cargo = 50 + self.level(UpgradeId::Cargo).saturating_sub(1) * 50;
        player.thrust_multiplier = 1.0 + self.level(UpgradeId::Thrusters) as f32 * 0.2;

        player.integrity = player.integrity.min(player.max_integrity);
        player.cargo = player.cargo.min(player.max_cargo);
    }
}
