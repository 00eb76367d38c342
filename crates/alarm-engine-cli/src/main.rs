//! CLI for computing and maintaining repeating alarm schedules.

mod clock;
mod store;

use std::path::{Path, PathBuf};

use alarm_engine::{
    countdown, next_occurrence, AlarmId, AlarmService, DaySet, EngineConfig, MemoryStore,
    ReminderSchedule, WakeOutcome,
};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::clock::{parse_datetime, parse_time, Clock};
use crate::store::{load_store, save_store, LogWakeScheduler};

/// Compute next firings, countdowns, and stale-schedule repairs for alarms.
#[derive(Parser)]
#[command(name = "alarm", version, about)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IANA time zone the wall clock is read in.
    #[arg(long, global = true, default_value = "UTC")]
    timezone: String,

    /// Use this wall-clock time instead of the system clock
    /// (YYYY-MM-DDTHH:MM[:SS]).
    #[arg(long, global = true)]
    now: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next occurrence of a repeating time.
    Next {
        /// Time of day (HH:MM).
        #[arg(long)]
        time: String,
        /// Repeating days, e.g. "mon,wed,fri" or "weekdays".
        #[arg(long)]
        days: String,
    },

    /// Print the time remaining until a datetime.
    Countdown {
        /// Target datetime (YYYY-MM-DDTHH:MM[:SS]).
        #[arg(long)]
        to: String,
    },

    /// Create an alarm.
    Add {
        #[arg(long)]
        store: PathBuf,
        /// Time of day (HH:MM).
        #[arg(long)]
        time: String,
        /// Repeating days; omit for a one-shot alarm.
        #[arg(long, default_value = "never")]
        days: String,
    },

    /// List stored alarms.
    List {
        #[arg(long)]
        store: PathBuf,
    },

    /// Show the soonest enabled alarm and the time left.
    Status {
        #[arg(long)]
        store: PathBuf,
    },

    /// Switch an alarm on.
    Enable {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Switch an alarm off.
    Disable {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Change an alarm's time of day or repeating days.
    Edit {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
        /// New time of day (HH:MM).
        #[arg(long)]
        time: Option<String>,
        /// New repeating days; "never" makes it a one-shot alarm.
        #[arg(long)]
        days: Option<String>,
    },

    /// Snooze an alarm.
    Snooze {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Dismiss an alarm's pending snooze.
    Dismiss {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Delete an alarm.
    Delete {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Deliver a wake-up for an alarm, as the platform would.
    Wake {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        id: AlarmId,
    },

    /// Repair stale alarms and re-arm enabled ones.
    Maintain {
        #[arg(long)]
        store: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("alarm_engine=debug,alarm=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let clock = Clock::new(&cli.timezone, cli.now.as_deref())?;

    match cli.command {
        Command::Next { time, days } => {
            let time = parse_time(&time)?;
            let repeat: DaySet = days.parse()?;
            if !repeat.has_any() {
                bail!("--days must name at least one day");
            }
            let next = next_occurrence(clock.now_minute(), time, repeat);
            println!("{}", format_datetime(next));
        }
        Command::Countdown { to } => {
            let target = parse_datetime(&to)?;
            let left = countdown(clock.now(), target);
            println!("{}", left.render(&config.less_than_marker));
        }
        Command::Add { store, time, days } => {
            let time = parse_time(&time)?;
            let repeat: DaySet = days.parse()?;
            with_service(&store, config, |svc| {
                let (id, schedule) = svc.create(clock.now(), time, repeat)?;
                println!("{}", format_alarm(id, &schedule));
                Ok(())
            })?;
        }
        Command::List { store } => {
            with_service(&store, config, |svc| {
                let alarms = svc.list()?;
                if alarms.is_empty() {
                    println!("no alarms");
                }
                for (id, schedule) in alarms {
                    let mut line = format_alarm(id, &schedule);
                    if schedule.enabled {
                        let left = countdown(clock.now(), schedule.effective_firing());
                        line.push_str(&format!("  in {}", left.render(&svc.config().less_than_marker)));
                    }
                    println!("{line}");
                }
                Ok(())
            })?;
        }
        Command::Status { store } => {
            with_service(&store, config, |svc| {
                match (svc.next_firing(clock.now())?, svc.render_countdown(clock.now())?) {
                    (Some((id, snapshot)), Some(left)) => {
                        println!("next: alarm {id} at {} (in {left})", format_datetime(snapshot.firing_at));
                    }
                    _ => println!("no upcoming alarms"),
                }
                Ok(())
            })?;
        }
        Command::Enable { store, id } => {
            edit(&store, config, id, |svc| svc.set_enabled(id, true, clock.now()))?;
        }
        Command::Disable { store, id } => {
            edit(&store, config, id, |svc| svc.set_enabled(id, false, clock.now()))?;
        }
        Command::Edit { store, id, time, days } => {
            if time.is_none() && days.is_none() {
                bail!("nothing to edit: pass --time and/or --days");
            }
            let time = time.as_deref().map(parse_time).transpose()?;
            let repeat = days.as_deref().map(str::parse::<DaySet>).transpose()?;
            edit(&store, config, id, |svc| {
                let mut schedule = svc.get(id)?;
                if let Some(repeat) = repeat {
                    schedule = svc.set_repeat(id, repeat, clock.now())?;
                }
                if let Some(time) = time {
                    schedule = svc.set_time_of_day(id, time, clock.now())?;
                }
                Ok(schedule)
            })?;
        }
        Command::Snooze { store, id } => {
            edit(&store, config, id, |svc| svc.snooze(id, clock.now()))?;
        }
        Command::Dismiss { store, id } => {
            edit(&store, config, id, |svc| svc.dismiss(id, clock.now()))?;
        }
        Command::Delete { store, id } => {
            with_service(&store, config, |svc| {
                svc.delete(id)?;
                println!("deleted alarm {id}");
                Ok(())
            })?;
        }
        Command::Wake { store, id } => {
            with_service(&store, config, |svc| {
                match svc.on_wake(id, clock.now())? {
                    WakeOutcome::Fire(snapshot) => {
                        println!("alarm {id} fired for {}", format_datetime(snapshot.firing_at));
                    }
                    WakeOutcome::NotDue(snapshot) => {
                        println!("alarm {id} not due until {}", format_datetime(snapshot.firing_at));
                    }
                    WakeOutcome::Inactive => println!("alarm {id} is disabled"),
                }
                Ok(())
            })?;
        }
        Command::Maintain { store } => {
            with_service(&store, config, |svc| {
                let repaired = svc.maintain(clock.now())?;
                println!("repaired {} alarm(s)", repaired.len());
                for id in repaired {
                    println!("{}", format_alarm(id, &svc.get(id)?));
                }
                Ok(())
            })?;
        }
    }

    Ok(())
}

type Service = AlarmService<MemoryStore, LogWakeScheduler>;

/// Open the store file, run `f` against it, and write it back.
fn with_service<F>(path: &Path, config: EngineConfig, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Service) -> anyhow::Result<()>,
{
    let store = load_store(path)?;
    let mut svc = AlarmService::new(store, LogWakeScheduler, config);
    f(&mut svc)?;
    let (store, _) = svc.into_parts();
    save_store(path, &store)
}

/// Apply a single-alarm edit and print the result.
fn edit<F>(path: &Path, config: EngineConfig, id: AlarmId, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Service) -> alarm_engine::error::Result<ReminderSchedule>,
{
    with_service(path, config, |svc| {
        let schedule = f(svc)?;
        println!("{}", format_alarm(id, &schedule));
        Ok(())
    })
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = EngineConfig::from_json_str(&text)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    Ok(config)
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M %a").to_string()
}

fn format_alarm(id: AlarmId, schedule: &ReminderSchedule) -> String {
    let mut line = format!(
        "{id}  {}  {}  {}",
        if schedule.enabled { "on " } else { "off" },
        format_datetime(schedule.occurrence),
        schedule.repeat
    );
    if let Some(snooze) = schedule.snooze_occurrence {
        line.push_str(&format!("  snoozed until {}", snooze.format("%H:%M")));
    }
    line
}
