//! Headless farming session.
//!
//! A [`Session`] drives a [`Farm`] day by day from an [`EngineConfig`]:
//! scheduled plantings, the configured automation, one weather sample per
//! day, and energy restored overnight.

use crate::actions::{ActionCosts, ActionGateway, ActionOutcome, PlayerAction};
use crate::config::EngineConfig;
use crate::economy::FarmContext;
use crate::save::{SaveGame, SaveManager, SaveResult};
use crate::weather_feed::{RandomWeather, ScriptedWeather, WeatherError, WeatherFeed};
use furrow_common::{PlotCoord, SpeciesId};
use furrow_sim::{Crop, DaySummary, Farm, WarningKind, WeatherSample};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Totals for a finished (or running) session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Days simulated
    pub days_run: u32,
    /// Crops planted
    pub crops_planted: u32,
    /// Crops harvested
    pub harvests: u32,
    /// Money earned from harvests
    pub income: u64,
    /// Crops that died
    pub crops_lost: u32,
    /// Days that used fallback weather
    pub fallback_days: u32,
    /// Actions refused by the gateway
    pub rejected_actions: u32,
    /// Money at the end
    pub final_money: u64,
}

/// A farm, its player, and its weather, advanced one day at a time.
#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    farm: Farm,
    ctx: FarmContext,
    gateway: ActionGateway,
    weather: WeatherFeed,
    last_weather: Option<WeatherSample>,
    report: SessionReport,
}

impl Session {
    /// Build a session, loading the weather script if one is configured.
    pub fn from_config(config: EngineConfig) -> Result<Self, WeatherError> {
        let bounds = config.fallback_weather;
        let weather = match &config.weather_script {
            Some(path) => WeatherFeed::new(
                Box::new(ScriptedWeather::from_json_file(path)?),
                RandomWeather::new(bounds, config.weather_seed),
            ),
            None => WeatherFeed::random(bounds, config.weather_seed),
        };
        Ok(Self::with_weather(config, weather))
    }

    /// Build a session with an explicit weather feed.
    #[must_use]
    pub fn with_weather(config: EngineConfig, weather: WeatherFeed) -> Self {
        let farm = Farm::new(config.grid_width, config.grid_height);
        let ctx = FarmContext::new(config.starting_money, config.max_energy);
        let gateway = ActionGateway::new(ActionCosts::from_config(&config));
        let report = SessionReport {
            final_money: ctx.wallet.balance(),
            ..SessionReport::default()
        };

        Self {
            config,
            farm,
            ctx,
            gateway,
            weather,
            last_weather: None,
            report,
        }
    }

    /// Continue from a save instead of a fresh farm.
    pub fn resume(mut self, save: &SaveGame) -> SaveResult<Self> {
        let (farm, ctx) = save.restore(self.farm.catalog().clone())?;
        info!(
            "Resumed '{}' at day {} with {} coins",
            save.name,
            farm.day(),
            ctx.wallet.balance()
        );
        self.farm = farm;
        self.ctx = ctx;
        self.last_weather = save.last_weather;
        self.report.final_money = self.ctx.wallet.balance();
        Ok(self)
    }

    /// The farm.
    #[must_use]
    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    /// Player money and energy.
    #[must_use]
    pub fn context(&self) -> &FarmContext {
        &self.ctx
    }

    /// Totals so far.
    #[must_use]
    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Weather of the most recent day.
    #[must_use]
    pub fn last_weather(&self) -> Option<WeatherSample> {
        self.last_weather
    }

    /// Perform a player action and record it in the report.
    pub fn perform(&mut self, action: &PlayerAction) -> ActionOutcome {
        let outcome = self.gateway.perform(&mut self.farm, &mut self.ctx, action);

        if outcome.is_success() {
            match action {
                PlayerAction::Plant { .. } => self.report.crops_planted += 1,
                PlayerAction::Harvest { .. } => {
                    self.report.harvests += 1;
                    self.report.income += outcome.money_delta.unsigned_abs();
                },
                _ => {},
            }
        } else {
            self.report.rejected_actions += 1;
        }
        self.report.final_money = self.ctx.wallet.balance();
        outcome
    }

    /// Simulate one day.
    pub fn run_day(&mut self) -> DaySummary {
        let day = self.farm.day() + 1;

        let plantings: Vec<PlayerAction> = self
            .config
            .plantings
            .iter()
            .filter(|order| order.day == day)
            .map(|order| PlayerAction::Plant {
                coord: PlotCoord::new(order.x, order.y),
                species: SpeciesId::new(order.species.clone()),
            })
            .collect();
        for action in &plantings {
            let outcome = self.perform(action);
            if !outcome.is_success() {
                warn!(day, "Scheduled planting failed: {}", outcome.message);
            }
        }

        if self.config.auto_clear_dead {
            for coord in self.farm.grid().dead_coords() {
                self.perform(&PlayerAction::RemoveDead { coord });
            }
        }

        if self.config.auto_water {
            let thirsty: Vec<PlotCoord> = self
                .farm
                .grid()
                .iter()
                .filter(|slot| slot.crop().is_some_and(Crop::needs_water))
                .map(|slot| slot.coord())
                .collect();
            for coord in thirsty {
                self.perform(&PlayerAction::Water { coord });
            }
        }

        let weather = self.weather.sample_for(day);
        self.last_weather = Some(weather);

        let dead_before = self.farm.grid().dead_coords().len();
        let summary = self.farm.advance_day(&weather);
        self.report.crops_lost += summary.dead.saturating_sub(dead_before) as u32;

        for (coord, warnings) in &summary.warnings_by_plot {
            for warning in warnings {
                match warning.kind {
                    WarningKind::Critical => warn!(day, %coord, "{}", warning.message),
                    _ => debug!(day, %coord, "{}", warning.message),
                }
            }
        }

        if self.config.auto_harvest {
            for coord in self.farm.grid().harvestable_coords() {
                self.perform(&PlayerAction::Harvest { coord });
            }
        }

        self.ctx.energy.restore_full();
        self.report.days_run += 1;
        self.report.fallback_days = self.weather.substitutions();

        info!(
            day,
            sky = weather.sky().display_name(),
            money = self.ctx.wallet.balance(),
            "Day complete"
        );
        summary
    }

    /// Run the configured number of days and return the report.
    pub fn run(&mut self) -> SessionReport {
        info!(
            "Starting {}-day session on a {}x{} farm",
            self.config.days, self.config.grid_width, self.config.grid_height
        );
        for _ in 0..self.config.days {
            self.run_day();
        }

        let report = &self.report;
        info!(
            days = report.days_run,
            harvests = report.harvests,
            income = report.income,
            lost = report.crops_lost,
            fallback_days = report.fallback_days,
            money = report.final_money,
            "Session finished"
        );
        self.report.clone()
    }

    /// Capture the current state as a save.
    #[must_use]
    pub fn to_save(&self) -> SaveGame {
        SaveGame::capture(
            self.config.save_name.clone(),
            &self.farm,
            &self.ctx,
            self.last_weather,
        )
    }

    /// Write the current state under the configured save name.
    pub fn save(&self, manager: &SaveManager) -> SaveResult<()> {
        manager.save(&self.config.save_name, &self.to_save())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackWeatherBounds, PlantingOrder};
    use furrow_sim::PlotState;
    use tempfile::TempDir;

    fn order(x: u32, y: u32, species: &str, day: u32) -> PlantingOrder {
        PlantingOrder {
            x,
            y,
            species: species.to_string(),
            day,
        }
    }

    fn scripted(samples: Vec<WeatherSample>) -> WeatherFeed {
        WeatherFeed::new(
            Box::new(ScriptedWeather::new(samples)),
            RandomWeather::new(FallbackWeatherBounds::default(), Some(3)),
        )
    }

    #[test]
    fn test_wheat_session_harvests() {
        let mut config = EngineConfig::default();
        config.days = 15;
        config.plantings = vec![order(0, 0, "wheat", 1), order(4, 2, "wheat", 2)];

        let weather = scripted(vec![WeatherSample::new(18.0, 2.0, 20.0); 15]);
        let mut session = Session::with_weather(config, weather);
        let report = session.run();

        assert_eq!(report.days_run, 15);
        assert_eq!(report.crops_planted, 2);
        assert_eq!(report.harvests, 2);
        assert_eq!(report.crops_lost, 0);
        assert_eq!(report.fallback_days, 0);
        assert!(report.income >= 80);
        assert_eq!(report.final_money, 500 - 20 + report.income);
        assert_eq!(session.farm().grid().occupied_count(), 0);
        assert_eq!(session.context().energy.current(), 100);
    }

    #[test]
    fn test_scheduled_planting_waits_for_its_day() {
        let mut config = EngineConfig::default();
        config.days = 2;
        config.plantings = vec![order(1, 1, "corn", 3)];

        let mut session = Session::with_weather(config, scripted(Vec::new()));
        session.run();
        assert_eq!(session.farm().grid().occupied_count(), 0);

        session.run_day();
        assert_eq!(
            session
                .farm()
                .grid()
                .state_at(PlotCoord::new(1, 1))
                .expect("valid"),
            PlotState::Growing
        );
    }

    #[test]
    fn test_bad_planting_is_counted() {
        let mut config = EngineConfig::default();
        config.days = 1;
        config.plantings = vec![order(9, 9, "wheat", 1), order(0, 0, "kale", 1)];

        let mut session = Session::with_weather(config, scripted(Vec::new()));
        let report = session.run();
        assert_eq!(report.rejected_actions, 2);
        assert_eq!(report.crops_planted, 0);
        assert_eq!(report.final_money, 500);
    }

    #[test]
    fn test_exhausted_script_falls_back() {
        let mut config = EngineConfig::default();
        config.days = 5;

        let weather = scripted(vec![WeatherSample::new(20.0, 0.0, 18.0); 2]);
        let mut session = Session::with_weather(config, weather);
        let report = session.run();
        assert_eq!(report.fallback_days, 3);
        assert!(session.last_weather().expect("ran").is_well_formed());
    }

    #[test]
    fn test_crop_loss_and_auto_clear() {
        let mut config = EngineConfig::default();
        config.days = 40;
        config.auto_harvest = false;
        config.auto_clear_dead = false;
        config.plantings = vec![order(0, 0, "tomato", 1)];

        let scorch = vec![WeatherSample::new(30.0, 20.0, 45.0); 40];
        let mut session = Session::with_weather(config.clone(), scripted(scorch.clone()));
        let report = session.run();
        assert_eq!(report.crops_lost, 1);
        assert_eq!(session.farm().grid().dead_coords(), vec![PlotCoord::new(0, 0)]);

        config.auto_clear_dead = true;
        let mut session = Session::with_weather(config, scripted(scorch));
        let report = session.run();
        assert_eq!(report.crops_lost, 1);
        assert_eq!(session.farm().grid().occupied_count(), 0);
    }

    #[test]
    fn test_save_and_resume() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = EngineConfig::default();
        config.days = 4;
        config.save_dir = dir.path().to_path_buf();
        config.plantings = vec![order(2, 1, "potato", 1)];

        let samples = vec![WeatherSample::new(17.0, 3.0, 16.0); 8];
        let mut session = Session::with_weather(config.clone(), scripted(samples.clone()));
        session.run();

        let manager = SaveManager::new(&config.save_dir);
        session.save(&manager).expect("save");
        let save = manager.load(&config.save_name).expect("load");
        assert_eq!(save.day, 4);
        assert_eq!(save.last_weather, Some(samples[0]));

        let resumed = Session::with_weather(config, scripted(samples))
            .resume(&save)
            .expect("resume");
        assert_eq!(resumed.farm().day(), 4);
        assert_eq!(resumed.context(), session.context());
        assert_eq!(
            resumed.farm().status(PlotCoord::new(2, 1)),
            session.farm().status(PlotCoord::new(2, 1))
        );
    }

    #[test]
    fn test_missing_weather_script_is_an_error() {
        let mut config = EngineConfig::default();
        config.weather_script = Some("/nonexistent/weather.json".into());
        assert!(matches!(
            Session::from_config(config),
            Err(WeatherError::Io(_))
        ));
    }
}
