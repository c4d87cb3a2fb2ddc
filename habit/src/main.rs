//! # habit
//!
//! A CLI for tracking habit challenges: daily entries, streaks, XP and ranks.
//!
//! ## Overview
//!
//! habit is built on top of habitlib. It keeps one user's habits and XP in a
//! JSON document on disk and runs every engine operation against it.
//!
//! ## Usage
//!
//! ```bash
//! # Start a 30-day challenge and pre-create its days
//! habit add-habit "Read 10 pages" --category "Personal Growth" --duration 30 --schedule
//!
//! # Record today's entry as done, with a note
//! habit log <HABIT_ID> --done --journal "Finished chapter 3"
//!
//! # Mark an earlier day as done
//! habit update <HABIT_ID> --date 2024-10-05 --main --done
//!
//! # Progress overview (default command)
//! habit status
//!
//! # Rank ladder and completion report
//! habit ranks
//! habit report --from 2024-10-01 --to 2024-10-31 --sort rate --desc
//!
//! # Any command as JSON
//! habit status --output json
//! ```

mod render;
mod session;

use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use habitlib::{
    build_report, calculate_streak, CategoryCounts, DateRange, EntryAddress, EntryKey, EntryPatch,
    Habit, HabitStatus, HabitTable, OrderBy, OrderDirection, Ordering, ProgressSnapshot,
    ProgressTotals, RankChange, RankStanding, Streak, XpDelta,
};
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use outstanding::OutputMode;
use serde::Serialize;

use crate::render::{create_theme, table_context};
use crate::session::{parse_date, Session};

/// Include templates at compile time
const STATUS_TEMPLATE: &str = include_str!("../templates/status.jinja");
const RANKS_TEMPLATE: &str = include_str!("../templates/ranks.jinja");
const REPORT_TEMPLATE: &str = include_str!("../templates/report.jinja");
const MUTATION_TEMPLATE: &str = include_str!("../templates/mutation.jinja");

/// Result of any command that changes the document
#[derive(Debug, Serialize)]
struct MutationView {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    habit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    xp_awarded: u64,
    xp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank_change: Option<RankChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    streak: Option<Streak>,
    notices: Vec<String>,
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("habit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Habit challenges with streaks, XP and ranks")
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .global(true)
                .default_value("habits.json")
                .help("User document to read and update"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Treat this date (YYYY-MM-DD) as today"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log engine decisions to stderr"),
        )
        .subcommand(Command::new("status").about("Show habits, streaks, XP and rank (default command)"))
        .subcommand(Command::new("ranks").about("Show the rank ladder and progress toward each rank"))
        .subcommand(
            Command::new("report")
                .about("Completion report over a date range")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("First day of the range (defaults to the configured window)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Last day of the range (defaults to today)"),
                )
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .value_parser(["position", "name", "completed", "total", "rate"])
                        .help("Order habits by field"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .help("Sort descending"),
                )
                .arg(
                    Arg::new("main-only")
                        .long("main-only")
                        .action(ArgAction::SetTrue)
                        .help("Leave extra entries out of the counts"),
                ),
        )
        .subcommand(
            Command::new("add-habit")
                .about("Start a new habit challenge")
                .arg(Arg::new("name").required(true).help("Habit name"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Category (e.g. Health, Personal Growth, Wellness)"),
                )
                .arg(
                    Arg::new("duration")
                        .long("duration")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Challenge length in days"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .default_value("")
                        .help("Free-form description"),
                )
                .arg(
                    Arg::new("schedule")
                        .long("schedule")
                        .action(ArgAction::SetTrue)
                        .help("Create one entry per challenge day starting today"),
                ),
        )
        .subcommand(
            Command::new("delete-habit")
                .about("Delete a habit and all of its entries")
                .arg(Arg::new("habit").required(true).help("Habit id")),
        )
        .subcommand(
            Command::new("log")
                .about("Add an entry to a habit")
                .arg(Arg::new("habit").required(true).help("Habit id"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Entry date (defaults to today)"),
                )
                .arg(
                    Arg::new("extra")
                        .long("extra")
                        .action(ArgAction::SetTrue)
                        .help("Add an extra entry instead of the day's main entry"),
                )
                .arg(
                    Arg::new("done")
                        .long("done")
                        .action(ArgAction::SetTrue)
                        .help("Mark the entry completed"),
                )
                .arg(Arg::new("journal").long("journal").help("Journal text")),
        )
        .subcommand(
            Command::new("update")
                .about("Change an existing entry")
                .arg(Arg::new("habit").required(true).help("Habit id"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("Entry date"),
                )
                .arg(
                    Arg::new("extra")
                        .long("extra")
                        .value_parser(value_parser!(u32))
                        .conflicts_with("main")
                        .help("Address the Nth extra entry of the date"),
                )
                .arg(
                    Arg::new("main")
                        .long("main")
                        .action(ArgAction::SetTrue)
                        .help("Address the main entry of the date"),
                )
                .arg(
                    Arg::new("done")
                        .long("done")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("undone")
                        .help("Mark completed"),
                )
                .arg(
                    Arg::new("undone")
                        .long("undone")
                        .action(ArgAction::SetTrue)
                        .help("Mark not completed"),
                )
                .arg(
                    Arg::new("journal")
                        .long("journal")
                        .conflicts_with("clear-journal")
                        .help("Replace journal text"),
                )
                .arg(
                    Arg::new("clear-journal")
                        .long("clear-journal")
                        .action(ArgAction::SetTrue)
                        .help("Remove the journal"),
                ),
        )
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> anyhow::Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing required argument '{}'", id))
}

/// Build an entry patch from --done/--undone/--journal/--clear-journal
fn extract_patch(matches: &ArgMatches) -> EntryPatch {
    let mut patch = EntryPatch::new();
    if matches.get_flag("done") {
        patch = patch.completed(true);
    }
    if matches.try_get_one::<bool>("undone").ok().flatten() == Some(&true) {
        patch = patch.completed(false);
    }
    if let Some(text) = matches.get_one::<String>("journal") {
        patch = patch.journal(text.as_str());
    }
    if matches.try_get_one::<bool>("clear-journal").ok().flatten() == Some(&true) {
        patch = patch.clear_journal();
    }
    patch
}

/// Apply the XP delta of an edit, persist, and describe what changed.
fn commit(
    session: &mut Session,
    before: &ProgressSnapshot,
    message: String,
    streak: Option<Streak>,
) -> anyhow::Result<MutationView> {
    let after = session.snapshot();
    let delta = XpDelta::between(before, &after);

    let totals_before = ProgressTotals::from_snapshot(session.document.xp, before);
    session.document.xp = delta.apply(session.document.xp);
    let totals_after = ProgressTotals::from_snapshot(session.document.xp, &after);
    let rank_change = session.ladder.rank_change(&totals_before, &totals_after);

    session.save()?;

    if !delta.is_empty() {
        tracing::info!(awarded = delta.awarded, revoked = delta.revoked, xp = session.document.xp, "applied xp delta");
    }

    let mut notices = Vec::new();
    if let Some(change) = &rank_change {
        if change.promoted {
            notices.push(format!("Rank up! {} \u{2192} {}", change.from, change.to));
        } else {
            notices.push(format!("Rank changed: {} \u{2192} {}", change.from, change.to));
        }
    }
    if let Some(streak) = streak.filter(|s| s.just_increased) {
        notices.push(format!("Streak increased to {} days!", streak.count));
    }

    Ok(MutationView {
        message,
        habit_id: None,
        entry: None,
        xp_awarded: delta.awarded,
        xp: session.document.xp,
        rank_change,
        streak,
        notices,
    })
}

/// Handler for status command
fn status_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let session = Session::open(matches)?;

    #[derive(Serialize)]
    struct StatusView {
        today: String,
        xp: u64,
        by_category: CategoryCounts,
        rank: RankStanding,
        habits: Vec<HabitStatus>,
    }

    let totals = session.totals();
    let view = StatusView {
        today: session.today.to_string(),
        xp: totals.xp,
        rank: session.ladder.standing(&totals),
        by_category: totals.by_category,
        habits: session
            .document
            .habits
            .iter()
            .map(|h| HabitStatus::compute(h, session.today))
            .collect(),
    };

    // For JSON mode, return raw data
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&view)?));
    }

    let table = HabitTable::from_status(&view.habits);
    let mut value = serde_json::to_value(&view)?;
    value["table"] = serde_json::to_value(table_context(&table))?;
    Ok(Output::Render(value))
}

/// Handler for ranks command
fn ranks_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let session = Session::open(matches)?;
    let totals = session.totals();
    let progress = session.ladder.progress(&totals);

    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::json!({
            "model": session.ladder.model(),
            "current": session.ladder.standing(&totals),
            "ranks": progress,
        })));
    }

    let table = HabitTable::from_rank_progress(&progress);
    Ok(Output::Render(serde_json::json!({
        "xp": totals.xp,
        "table": table_context(&table),
    })))
}

/// Handler for report command
fn report_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let session = Session::open(matches)?;

    let to = match matches.get_one::<String>("to") {
        Some(value) => parse_date(value)?,
        None => session.today,
    };
    let range = match matches.get_one::<String>("from") {
        Some(value) => DateRange::new(parse_date(value)?, to)?,
        None => DateRange::last_days(to, session.config.report.window_days),
    };

    let by = match matches.get_one::<String>("sort") {
        Some(field) => field.parse::<OrderBy>().map_err(anyhow::Error::msg)?,
        None => OrderBy::default(),
    };
    let direction = if matches.get_flag("desc") {
        OrderDirection::Descending
    } else {
        OrderDirection::Ascending
    };

    let mut options = session
        .config
        .report_options()
        .ordering(Ordering { by, direction });
    if matches.get_flag("main-only") {
        options = options.include_extra(false);
    }

    let report = build_report(&session.document.habits, range, options);

    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&report)?));
    }

    let table = HabitTable::from_report(&report);
    Ok(Output::Render(serde_json::json!({
        "empty": report.habits_breakdown.is_empty(),
        "table": table_context(&table),
    })))
}

/// Handler for add-habit command
fn add_habit_handler(
    matches: &ArgMatches,
    _ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    let mut session = Session::open(matches)?;
    let before = session.snapshot();

    let duration = matches
        .get_one::<u32>("duration")
        .copied()
        .ok_or_else(|| anyhow::anyhow!("missing required argument 'duration'"))?;
    let id = uuid::Uuid::new_v4().to_string();
    let mut habit = Habit::new(
        id.clone(),
        required(matches, "name")?,
        required(matches, "category")?,
        required(matches, "description")?,
        duration,
    )?;
    if matches.get_flag("schedule") {
        habit = habit.schedule_from(session.today);
    }

    let message = format!("Added habit '{}' ({} days)", habit.name, habit.duration);
    session.document.habits.push(habit);

    let mut view = commit(&mut session, &before, message, None)?;
    view.habit_id = Some(id);
    Ok(Output::Render(serde_json::to_value(&view)?))
}

/// Handler for delete-habit command
fn delete_habit_handler(
    matches: &ArgMatches,
    _ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    let mut session = Session::open(matches)?;
    let before = session.snapshot();

    let removed = session.document.remove_habit(required(matches, "habit")?)?;
    let message = format!(
        "Deleted habit '{}' and {} entries",
        removed.name,
        removed.entries.len()
    );

    let mut view = commit(&mut session, &before, message, None)?;
    view.habit_id = Some(removed.id);
    Ok(Output::Render(serde_json::to_value(&view)?))
}

/// Handler for log command
fn log_handler(matches: &ArgMatches, _ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let mut session = Session::open(matches)?;
    let before = session.snapshot();
    let today = session.today;

    let date = match matches.get_one::<String>("date") {
        Some(value) => parse_date(value)?,
        None => today,
    };
    let patch = extract_patch(matches);

    let habit = session.document.habit_mut(required(matches, "habit")?)?;
    let key = habit.append_entry(date, matches.get_flag("extra"))?;
    if !patch.is_empty() {
        habit.update_entry(key, &patch)?;
    }
    let streak = calculate_streak(&habit.entries, today);
    let message = match habit.day_number(key) {
        Some(day) if key.variant.is_extra() => {
            format!("Logged extra entry {} for '{}' (day {})", key, habit.name, day)
        }
        Some(day) => format!("Logged day {} of {} for '{}'", day, habit.duration, habit.name),
        None => format!("Logged {} for '{}'", key, habit.name),
    };
    let habit_id = habit.id.clone();

    let mut view = commit(&mut session, &before, message, Some(streak))?;
    view.habit_id = Some(habit_id);
    view.entry = Some(key.to_string());
    Ok(Output::Render(serde_json::to_value(&view)?))
}

/// Handler for update command
fn update_handler(matches: &ArgMatches, _ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let mut session = Session::open(matches)?;
    let before = session.snapshot();
    let today = session.today;

    let date = parse_date(required(matches, "date")?)?;
    let address = if let Some(ordinal) = matches.get_one::<u32>("extra") {
        EntryAddress::from(EntryKey::extra(date, *ordinal))
    } else if matches.get_flag("main") {
        EntryAddress::Main(date)
    } else {
        EntryAddress::Date(date)
    };

    let patch = extract_patch(matches);
    if patch.is_empty() {
        return Err(anyhow::anyhow!(
            "nothing to update: pass --done, --undone, --journal or --clear-journal"
        ));
    }

    let habit = session.document.habit_mut(required(matches, "habit")?)?;
    let key = habit.update_entry(address, &patch)?;
    let streak = calculate_streak(&habit.entries, today);
    let message = format!("Updated {} for '{}'", key, habit.name);
    let habit_id = habit.id.clone();

    let mut view = commit(&mut session, &before, message, Some(streak))?;
    view.habit_id = Some(habit_id);
    view.entry = Some(key.to_string());
    Ok(Output::Render(serde_json::to_value(&view)?))
}

fn main() -> ExitCode {
    let cmd = build_command();
    let theme = create_theme();

    // Build the outstanding app with command handlers and run
    let result = App::builder()
        .theme(theme)
        .command("status", status_handler, STATUS_TEMPLATE)
        .command("ranks", ranks_handler, RANKS_TEMPLATE)
        .command("report", report_handler, REPORT_TEMPLATE)
        .command("add-habit", add_habit_handler, MUTATION_TEMPLATE)
        .command("delete-habit", delete_habit_handler, MUTATION_TEMPLATE)
        .command("log", log_handler, MUTATION_TEMPLATE)
        .command("update", update_handler, MUTATION_TEMPLATE)
        .run_to_string(cmd, std::env::args());

    match result {
        RunResult::Handled(output) => {
            if !output.is_empty() {
                // Check if it's an error message from handler
                if output.starts_with("Error:") {
                    eprintln!("{}", output);
                    return ExitCode::FAILURE;
                }
                print!("{}", output);
            }
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => {
            // Not used in habit
            ExitCode::SUCCESS
        }
        RunResult::NoMatch(matches) => render_status_fallback(&matches),
    }
}

/// Output mode chosen by the `--output` flag outstanding adds to the command.
fn output_mode_from(matches: &ArgMatches) -> OutputMode {
    match matches
        .try_get_one::<String>("_output_mode")
        .ok()
        .flatten()
        .map(String::as_str)
    {
        Some("json") => OutputMode::Json,
        Some("text") => OutputMode::Text,
        Some("term-debug") => OutputMode::TermDebug,
        Some("term") => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// `habit` without a subcommand shows the status view.
fn render_status_fallback(matches: &ArgMatches) -> ExitCode {
    let output_mode = output_mode_from(matches);
    let ctx = CommandContext {
        output_mode,
        command_path: vec![],
    };

    let rendered = status_handler(matches, &ctx).and_then(|output| match output {
        Output::Render(value) if output_mode.is_structured() => {
            Ok(serde_json::to_string_pretty(&value)? + "\n")
        }
        Output::Render(value) => Ok(outstanding::render(
            STATUS_TEMPLATE,
            &value,
            &create_theme(),
        )?),
        Output::Silent | Output::Binary { .. } => Ok(String::new()),
    });

    match rendered {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
