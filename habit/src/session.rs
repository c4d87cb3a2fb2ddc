//! Per-invocation state: logging, configuration, the pinned day, and the
//! user document on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::ArgMatches;
use habitlib::{
    Clock, EngineConfig, FixedClock, ProgressSnapshot, ProgressTotals, RankLadder, SystemClock,
    UserDocument,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter
const LOG_ENV: &str = "HABIT_LOG";

/// Install the stderr log subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Everything a handler needs, loaded from the global flags.
pub struct Session {
    pub data_path: PathBuf,
    pub config: EngineConfig,
    pub ladder: RankLadder,
    pub today: NaiveDate,
    pub document: UserDocument,
}

impl Session {
    pub fn open(matches: &ArgMatches) -> anyhow::Result<Self> {
        init_logging(matches.get_flag("verbose"));

        let config = match matches.get_one::<String>("config") {
            Some(path) => EngineConfig::load(Path::new(path))?,
            None => EngineConfig::default(),
        };
        let ladder = config.rank_ladder()?;

        let today = match matches.get_one::<String>("today") {
            Some(value) => FixedClock(parse_date(value)?).today(),
            None => SystemClock.today(),
        };

        let data_path = PathBuf::from(
            matches
                .get_one::<String>("data")
                .map(|s| s.as_str())
                .unwrap_or("habits.json"),
        );
        let document = load_document(&data_path)?;

        tracing::debug!(data = %data_path.display(), %today, habits = document.habits.len(), "opened session");

        Ok(Self {
            data_path,
            config,
            ladder,
            today,
            document,
        })
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::capture(&self.document.habits, &self.config.xp)
    }

    pub fn totals(&self) -> ProgressTotals {
        ProgressTotals::from_snapshot(self.document.xp, &self.snapshot())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = self.document.to_json()?;
        fs::write(&self.data_path, json + "\n")
            .with_context(|| format!("failed to write '{}'", self.data_path.display()))?;
        tracing::debug!(data = %self.data_path.display(), xp = self.document.xp, "saved document");
        Ok(())
    }
}

/// A missing file is an empty document.
fn load_document(path: &Path) -> anyhow::Result<UserDocument> {
    if !path.exists() {
        return Ok(UserDocument::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    UserDocument::from_json(&json).with_context(|| format!("failed to load '{}'", path.display()))
}
