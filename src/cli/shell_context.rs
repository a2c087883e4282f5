use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use tracing::{debug, info};

use hb_config::{Config, ConfigManager};
use hb_core::{Clock, CoreError, EntryLog, EntryStorage, SampleGenerator};
use hb_domain::DateRange;
use hb_storage_json::JsonEntryStorage;

use super::{
    commands,
    formatters::CliFormatters,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
    system_clock::clock_from_env,
};
use super::core::CommandError;
use crate::errors::CliError;

const HOME_ENV: &str = "HOMEBUDGET_HOME";
const SEED_ENV: &str = "HOMEBUDGET_SAMPLE_SEED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub base_dir: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub storage: JsonEntryStorage,
    pub log: EntryLog,
    pub clock: Box<dyn Clock>,
    pub formatters: CliFormatters,
    /// Half-open window the dashboard and histogram look at.
    pub range: DateRange,
    pub selected_category: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Config::default_base_dir);
        Self::with_base_dir(mode, base_dir, clock_from_env())
    }

    pub fn with_base_dir(
        mode: CliMode,
        base_dir: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        apply_output_preferences(&config);

        let storage = open_storage(&config, &base_dir)?;
        let mut generator = SampleGenerator::new(sample_seed(clock.as_ref()));
        let entries =
            storage.load_or_seed(&mut generator, config.effective_sample_size(), clock.today())?;
        info!(count = entries.len(), "entries loaded");

        let range = DateRange::year_containing(clock.today()).map_err(CoreError::from)?;

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            formatters: CliFormatters::from_config(&config),
            base_dir,
            config_manager,
            config,
            storage,
            log: EntryLog::new(entries),
            clock,
            range,
            selected_category: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        match &self.selected_category {
            Some(category) => format!("homebudget [{category}]> "),
            None => "homebudget> ".into(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.resolve_data_dir(&self.base_dir)
    }

    /// Writes the entry list back to disk when it changed since the last save.
    pub fn persist_entries(&mut self) -> Result<(), CoreError> {
        if self.log.take_dirty() {
            self.storage.save_entries(self.log.entries())?;
        }
        Ok(())
    }

    /// Saves the config and applies it to the running session.
    pub fn apply_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.config_manager.save(&config)?;
        let storage_changed = config.data_dir != self.config.data_dir
            || config.backup_retention != self.config.backup_retention;
        self.config = config;
        self.formatters = CliFormatters::from_config(&self.config);
        apply_output_preferences(&self.config);

        if storage_changed {
            self.storage = open_storage(&self.config, &self.base_dir)?;
            let entries = self.storage.load_entries()?;
            debug!(count = entries.len(), dir = %self.data_dir().display(), "storage reopened");
            self.log = EntryLog::new(entries);
        }
        Ok(())
    }

    pub fn sample_generator(&self) -> SampleGenerator {
        SampleGenerator::new(sample_seed(self.clock.as_ref()))
    }
}

fn open_storage(config: &Config, base_dir: &Path) -> Result<JsonEntryStorage, CoreError> {
    JsonEntryStorage::with_retention(config.resolve_data_dir(base_dir), config.backup_retention)
}

fn apply_output_preferences(config: &Config) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled,
    });
}

fn sample_seed(clock: &dyn Clock) -> u64 {
    std::env::var(SEED_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or_else(|| clock.now().timestamp_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hb_core::FixedClock;
    use tempfile::tempdir;

    fn context(base: &Path, seed: bool) -> ShellContext {
        let manager = ConfigManager::with_base_dir(base.to_path_buf()).unwrap();
        let mut config = Config::default();
        config.seed_sample_data = seed;
        config.sample_size = 40;
        manager.save(&config).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        ShellContext::with_base_dir(
            CliMode::Script,
            base.to_path_buf(),
            Box::new(FixedClock::on(today)),
        )
        .unwrap()
    }

    #[test]
    fn first_start_seeds_sample_entries() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path(), true);
        assert_eq!(ctx.log.len(), 40);
        assert!(ctx.storage.entries_path().exists());
        assert_eq!(ctx.range.from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn lines_dispatch_and_persist() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path(), false);
        assert!(ctx.log.is_empty());

        ctx.process_line("add expense home 25 --date 2024-03-02").unwrap();
        assert_eq!(ctx.log.len(), 1);
        assert!(!ctx.log.is_dirty());
        assert_eq!(ctx.storage.load_entries().unwrap().len(), 1);

        ctx.process_line("select home").unwrap();
        assert_eq!(ctx.selected_category.as_deref(), Some("home"));
        assert_eq!(ctx.prompt(), "homebudget [home]> ");
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path(), false);
        let control = ctx.process_line("exit").unwrap();
        assert_eq!(control, crate::cli::core::LoopControl::Exit);
        assert!(!ctx.running);
    }

    #[test]
    fn moving_data_dir_reloads_entries() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path(), false);
        ctx.process_line("add income salary 1000 --date 2024-01-31").unwrap();

        let other = dir.path().join("elsewhere");
        let mut config = ctx.config.clone();
        config.data_dir = Some(other.clone());
        ctx.apply_config(config).unwrap();
        assert!(ctx.log.is_empty());
        assert_eq!(ctx.data_dir(), other);
    }
}
