//! Player actions and their costs.
//!
//! [`ActionGateway::perform`] turns a [`PlayerAction`] into a farm call and a
//! user-facing [`ActionOutcome`]. Costs are checked before touching the farm
//! and charged only after the farm accepts the action, so a rejected action
//! leaves both the farm and the [`FarmContext`] as they were.

use crate::config::EngineConfig;
use crate::economy::FarmContext;
use furrow_common::{PlotCoord, SpeciesId};
use furrow_sim::{Farm, SATURATION_LEVEL};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Something the player wants to do to the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Plant a seed on an empty plot
    Plant {
        /// Target plot
        coord: PlotCoord,
        /// Species to plant
        species: SpeciesId,
    },
    /// Water one crop
    Water {
        /// Target plot
        coord: PlotCoord,
    },
    /// Water every crop that accepts water
    WaterAll,
    /// Harvest a mature crop
    Harvest {
        /// Target plot
        coord: PlotCoord,
    },
    /// Clear a dead crop
    RemoveDead {
        /// Target plot
        coord: PlotCoord,
    },
}

/// Whether an action went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Applied to the farm
    Success,
    /// Refused; nothing changed
    Rejected,
}

/// Result of an action, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Success or rejection
    pub kind: OutcomeKind,
    /// Human-readable description
    pub message: String,
    /// Money gained (positive) or spent (negative)
    pub money_delta: i64,
    /// Energy used
    pub energy_spent: u32,
}

impl ActionOutcome {
    fn success(message: impl Into<String>, money_delta: i64, energy_spent: u32) -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: message.into(),
            money_delta,
            energy_spent,
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Rejected,
            message: message.into(),
            money_delta: 0,
            energy_spent: 0,
        }
    }

    /// Whether the action was applied.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

/// Energy and money costs of each action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCosts {
    /// Energy to plant
    pub plant_energy: u32,
    /// Energy per crop watered
    pub water_energy: u32,
    /// Energy to harvest
    pub harvest_energy: u32,
    /// Energy to clear a dead crop
    pub clear_energy: u32,
    /// Seed price as a fraction of harvest value
    pub seed_cost_ratio: f32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ActionCosts {
    /// Read costs from engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            plant_energy: config.plant_energy,
            water_energy: config.water_energy,
            harvest_energy: config.harvest_energy,
            clear_energy: config.clear_energy,
            seed_cost_ratio: config.seed_cost_ratio,
        }
    }

    /// Seed price for a species worth `harvest_value`.
    #[must_use]
    pub fn seed_cost(&self, harvest_value: u32) -> u64 {
        (f64::from(harvest_value) * f64::from(self.seed_cost_ratio)).ceil() as u64
    }
}

/// Applies player actions to a farm, charging the player's context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionGateway {
    costs: ActionCosts,
}

impl ActionGateway {
    /// Create a gateway with the given costs.
    #[must_use]
    pub fn new(costs: ActionCosts) -> Self {
        Self { costs }
    }

    /// The configured costs.
    #[must_use]
    pub fn costs(&self) -> &ActionCosts {
        &self.costs
    }

    /// Perform `action`, returning what happened.
    pub fn perform(
        &self,
        farm: &mut Farm,
        ctx: &mut FarmContext,
        action: &PlayerAction,
    ) -> ActionOutcome {
        let outcome = match action {
            PlayerAction::Plant { coord, species } => self.plant(farm, ctx, *coord, species),
            PlayerAction::Water { coord } => self.water(farm, ctx, *coord),
            PlayerAction::WaterAll => self.water_all(farm, ctx),
            PlayerAction::Harvest { coord } => self.harvest(farm, ctx, *coord),
            PlayerAction::RemoveDead { coord } => self.remove_dead(farm, ctx, *coord),
        };

        match outcome.kind {
            OutcomeKind::Success => debug!(?action, "{}", outcome.message),
            OutcomeKind::Rejected => info!(?action, "Action rejected: {}", outcome.message),
        }
        outcome
    }

    fn plant(
        &self,
        farm: &mut Farm,
        ctx: &mut FarmContext,
        coord: PlotCoord,
        species: &SpeciesId,
    ) -> ActionOutcome {
        let crop = match farm.catalog().get(species.as_str()) {
            Ok(crop) => crop,
            Err(e) => return ActionOutcome::rejected(e.to_string()),
        };
        let cost = self.costs.seed_cost(crop.harvest_value);
        let energy = self.costs.plant_energy;

        if let Err(e) = ctx.check(cost, energy) {
            return ActionOutcome::rejected(e.to_string());
        }
        if let Err(e) = farm.plant(coord, species.as_str()) {
            return ActionOutcome::rejected(e.to_string());
        }
        settle(ctx, cost, energy);

        ActionOutcome::success(
            format!("Planted {} at {coord} for {cost} coins", crop.name),
            -(cost as i64),
            energy,
        )
    }

    fn water(&self, farm: &mut Farm, ctx: &mut FarmContext, coord: PlotCoord) -> ActionOutcome {
        let energy = self.costs.water_energy;
        if let Err(e) = ctx.check(0, energy) {
            return ActionOutcome::rejected(e.to_string());
        }

        match farm.water(coord) {
            Ok(added) => {
                settle(ctx, 0, energy);
                ActionOutcome::success(
                    format!("Watered crop at {coord} (+{added:.1}%)"),
                    0,
                    energy,
                )
            },
            Err(e) => ActionOutcome::rejected(e.to_string()),
        }
    }

    fn water_all(&self, farm: &mut Farm, ctx: &mut FarmContext) -> ActionOutcome {
        if farm.grid().occupied_count() == 0 {
            return ActionOutcome::rejected("There are no crops to water");
        }

        let thirsty = farm
            .grid()
            .iter()
            .filter_map(|slot| slot.crop())
            .filter(|crop| !crop.is_dead() && crop.water_level() < SATURATION_LEVEL)
            .count() as u32;
        if thirsty == 0 {
            return ActionOutcome::success("Nothing needed water", 0, 0);
        }

        let energy = self.costs.water_energy.saturating_mul(thirsty);
        if let Err(e) = ctx.check(0, energy) {
            return ActionOutcome::rejected(e.to_string());
        }

        let watered = farm.water_all() as u32;
        let energy = self.costs.water_energy.saturating_mul(watered);
        settle(ctx, 0, energy);

        let plural = if watered == 1 { "" } else { "s" };
        ActionOutcome::success(format!("Watered {watered} crop{plural}"), 0, energy)
    }

    fn harvest(&self, farm: &mut Farm, ctx: &mut FarmContext, coord: PlotCoord) -> ActionOutcome {
        let energy = self.costs.harvest_energy;
        if let Err(e) = ctx.check(0, energy) {
            return ActionOutcome::rejected(e.to_string());
        }

        match farm.harvest(coord) {
            Ok(result) => {
                settle(ctx, 0, energy);
                ctx.wallet.earn(u64::from(result.value));
                ActionOutcome::success(
                    format!(
                        "Harvested {} at {coord} for {} coins (quality {:.0}%)",
                        result.species, result.value, result.quality
                    ),
                    i64::from(result.value),
                    energy,
                )
            },
            Err(e) => ActionOutcome::rejected(e.to_string()),
        }
    }

    fn remove_dead(
        &self,
        farm: &mut Farm,
        ctx: &mut FarmContext,
        coord: PlotCoord,
    ) -> ActionOutcome {
        let energy = self.costs.clear_energy;
        if let Err(e) = ctx.check(0, energy) {
            return ActionOutcome::rejected(e.to_string());
        }

        match farm.remove_dead(coord) {
            Ok(()) => {
                settle(ctx, 0, energy);
                ActionOutcome::success(format!("Cleared dead crop at {coord}"), 0, energy)
            },
            Err(e) => ActionOutcome::rejected(e.to_string()),
        }
    }
}

/// Charge a cost that was already checked.
fn settle(ctx: &mut FarmContext, money: u64, energy: u32) {
    if let Err(e) = ctx.charge(money, energy) {
        warn!("Charge failed after a checked action: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furrow_sim::{PlotState, WeatherSample};

    fn at(x: u32, y: u32) -> PlotCoord {
        PlotCoord::new(x, y)
    }

    fn plant(coord: PlotCoord, species: SpeciesId) -> PlayerAction {
        PlayerAction::Plant { coord, species }
    }

    #[test]
    fn test_seed_cost_rounds_up() {
        let costs = ActionCosts::default();
        assert_eq!(costs.seed_cost(40), 10);
        assert_eq!(costs.seed_cost(30), 8);
        assert_eq!(costs.seed_cost(50), 13);
    }

    #[test]
    fn test_plant_charges_seed_and_energy() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(3, 3);
        let mut ctx = FarmContext::new(100, 50);

        let outcome = gateway.perform(&mut farm, &mut ctx, &plant(at(1, 1), SpeciesId::TOMATO));
        assert!(outcome.is_success(), "{}", outcome.message);
        assert_eq!(outcome.money_delta, -20);
        assert_eq!(outcome.energy_spent, 5);
        assert_eq!(ctx.wallet.balance(), 80);
        assert_eq!(ctx.energy.current(), 45);
        assert_eq!(farm.grid().occupied_count(), 1);
    }

    #[test]
    fn test_rejected_plant_changes_nothing() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(2, 1);
        let mut ctx = FarmContext::new(100, 50);
        gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::WHEAT));
        let before = ctx;

        // Occupied plot
        let outcome = gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::CORN));
        assert_eq!(outcome.kind, OutcomeKind::Rejected);
        assert_eq!(ctx, before);

        // Out of bounds
        let outcome = gateway.perform(&mut farm, &mut ctx, &plant(at(5, 0), SpeciesId::CORN));
        assert!(!outcome.is_success());
        assert_eq!(ctx, before);

        // Unknown species
        let outcome = gateway.perform(
            &mut farm,
            &mut ctx,
            &plant(at(1, 0), SpeciesId::new("dragonfruit")),
        );
        assert!(outcome.message.contains("dragonfruit"));
        assert_eq!(ctx, before);
        assert_eq!(farm.grid().occupied_count(), 1);
    }

    #[test]
    fn test_unaffordable_plant_leaves_plot_empty() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(1, 1);
        let mut ctx = FarmContext::new(5, 50);

        let outcome = gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::CORN));
        assert_eq!(outcome.kind, OutcomeKind::Rejected);
        assert!(outcome.message.contains("Insufficient funds"));
        assert_eq!(farm.grid().empty_count(), 1);
        assert_eq!(ctx.wallet.balance(), 5);
    }

    #[test]
    fn test_out_of_energy() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(2, 1);
        let mut ctx = FarmContext::new(100, 6);

        assert!(gateway
            .perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::CARROT))
            .is_success());
        let outcome = gateway.perform(&mut farm, &mut ctx, &plant(at(1, 0), SpeciesId::CARROT));
        assert!(outcome.message.contains("Not enough energy"));
        assert_eq!(ctx.energy.current(), 1);
    }

    #[test]
    fn test_water_reports_added_amount() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(1, 1);
        let mut ctx = FarmContext::new(100, 50);
        gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::WHEAT));

        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::Water { coord: at(0, 0) });
        assert!(outcome.is_success());
        assert!(outcome.message.contains("+30.0%"));
        assert_eq!(outcome.energy_spent, 2);

        // 80% is still below saturation, 100% is not.
        gateway.perform(&mut farm, &mut ctx, &PlayerAction::Water { coord: at(0, 0) });
        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::Water { coord: at(0, 0) });
        assert_eq!(outcome.kind, OutcomeKind::Rejected);
        assert_eq!(outcome.energy_spent, 0);
    }

    #[test]
    fn test_water_all_messages() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(3, 1);
        let mut ctx = FarmContext::new(100, 50);

        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::WaterAll);
        assert_eq!(outcome.kind, OutcomeKind::Rejected);
        assert_eq!(outcome.message, "There are no crops to water");

        gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::WHEAT));
        gateway.perform(&mut farm, &mut ctx, &plant(at(2, 0), SpeciesId::CORN));
        let energy_before = ctx.energy.current();

        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::WaterAll);
        assert_eq!(outcome.message, "Watered 2 crops");
        assert_eq!(outcome.energy_spent, 4);
        assert_eq!(ctx.energy.current(), energy_before - 4);

        // Both now at 80%, one more round saturates them.
        gateway.perform(&mut farm, &mut ctx, &PlayerAction::WaterAll);
        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::WaterAll);
        assert!(outcome.is_success());
        assert_eq!(outcome.message, "Nothing needed water");
        assert_eq!(outcome.energy_spent, 0);
    }

    #[test]
    fn test_harvest_earns_value() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(1, 1);
        let mut ctx = FarmContext::new(100, 50);
        gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::WHEAT));

        let early = gateway.perform(&mut farm, &mut ctx, &PlayerAction::Harvest { coord: at(0, 0) });
        assert_eq!(early.kind, OutcomeKind::Rejected);
        assert!(early.message.contains("not ready"));

        let weather = WeatherSample::new(18.0, 2.0, 20.0);
        while !farm.status(at(0, 0)).expect("planted").can_harvest {
            if farm.status(at(0, 0)).expect("planted").water_level < 40.0 {
                farm.water(at(0, 0)).expect("thirsty");
            }
            farm.advance_day(&weather);
            assert!(farm.day() < 30);
        }

        let balance = ctx.wallet.balance();
        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::Harvest { coord: at(0, 0) });
        assert!(outcome.is_success(), "{}", outcome.message);
        assert!(outcome.money_delta > 0);
        assert_eq!(ctx.wallet.balance(), balance + outcome.money_delta as u64);
        assert_eq!(farm.grid().state_at(at(0, 0)).expect("valid"), PlotState::Empty);
    }

    #[test]
    fn test_remove_dead_requires_dead_crop() {
        let gateway = ActionGateway::default();
        let mut farm = Farm::new(1, 1);
        let mut ctx = FarmContext::new(100, 50);
        gateway.perform(&mut farm, &mut ctx, &plant(at(0, 0), SpeciesId::TOMATO));

        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::RemoveDead { coord: at(0, 0) });
        assert_eq!(outcome.kind, OutcomeKind::Rejected);

        let scorch = WeatherSample::new(30.0, 20.0, 45.0);
        while farm.grid().state_at(at(0, 0)).expect("valid") != PlotState::Dead {
            farm.advance_day(&scorch);
            assert!(farm.day() < 200);
        }

        let outcome = gateway.perform(&mut farm, &mut ctx, &PlayerAction::RemoveDead { coord: at(0, 0) });
        assert!(outcome.is_success());
        assert_eq!(outcome.energy_spent, 4);
        assert_eq!(farm.grid().empty_count(), 1);
    }

    #[test]
    fn test_action_json_shape() {
        let action = plant(at(2, 1), SpeciesId::POTATO);
        let json = serde_json::to_value(&action).expect("serialize");
        assert_eq!(json["action"], "plant");
        assert_eq!(json["species"], "potato");
        assert_eq!(json["coord"]["x"], 2);
    }
}
