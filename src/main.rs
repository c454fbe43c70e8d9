use std::{
    fs::File,
    io::{self, stdin, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use studymate::{
    alert,
    analytics::{DateRange, HomeStats, TopicFilter, TrendReport},
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    export::{self, ExportFormat},
    logging,
    masters::{MasterKind, MasterList},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    store::StudyDb,
    target, ui, util,
};

/// terminal study-session tracker with study/break cycles, daily targets and analytics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Run timed study/break cycles in the terminal, log every session, set date-effective daily targets and review your trends. Without a command the interactive TUI starts."
)]
pub struct Cli {
    /// path of the SQLite database (default: ~/.local/state/studymate/studymate.db)
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// path of the JSON config file
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// export the session log
    Export {
        #[clap(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// write to a file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// manage daily study targets
    #[command(subcommand)]
    Target(TargetCommand),
    /// manage the topic list
    #[command(subcommand)]
    Topic(MasterCommand),
    /// manage the study mode list
    #[command(subcommand)]
    Mode(MasterCommand),
    /// print today's progress and trends for a date range
    Stats {
        /// first day (YYYY-MM-DD); defaults to the configured window ending today
        #[clap(long, requires = "to")]
        from: Option<String>,
        /// last day (YYYY-MM-DD)
        #[clap(long, requires = "from")]
        to: Option<String>,
        /// only count sessions with this topic
        #[clap(long)]
        topic: Option<String>,
    },
    /// show or clear the session log
    Log(LogArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum TargetCommand {
    /// set the target effective from today
    Set {
        #[clap(long, default_value_t = 0)]
        hours: u32,
        #[clap(long, default_value_t = 0)]
        minutes: u32,
    },
    /// print the effective target for a day (default today)
    Show {
        #[clap(long)]
        date: Option<String>,
    },
    /// list all target changes, newest first
    History,
    /// erase the whole target history
    Clear {
        #[clap(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MasterCommand {
    /// add a new active entry
    Add { name: String },
    /// flip an entry between active and inactive
    Toggle { name: String },
    /// list entries with their usage
    List,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    #[command(subcommand)]
    action: Option<LogAction>,
    /// show at most this many sessions
    #[clap(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LogAction {
    /// delete every logged session
    Clear {
        #[clap(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let db_path = match &cli.db {
        Some(p) => p.clone(),
        None => AppDirs::db_path().context("could not determine a data directory")?,
    };
    let log_path = db_path
        .parent()
        .map(|dir| dir.join("studymate.log"))
        .or_else(AppDirs::log_path);
    logging::init(log_path.as_deref());

    let config_store = match &cli.config {
        Some(p) => FileConfigStore::with_path(p),
        None => FileConfigStore::new(),
    };
    let db = StudyDb::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    match cli.command.clone() {
        Some(command) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_command(command, &db, &config_store, &mut out)
        }
        None => {
            if !stdin().is_tty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
            }
            run_tui(db, config_store)
        }
    }
}

fn run_tui(db: StudyDb, config_store: FileConfigStore) -> Result<()> {
    let config = config_store.load();
    let alerter = alert::from_flag(config.alerts);
    let mut app = App::new(db, Box::new(config_store), alerter)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    info!("tui started");
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::every_second());

    loop {
        terminal.draw(|f| ui::draw(app, f))?;
        let event = runner.step();
        app.handle_event(event);
        if app.should_quit {
            break;
        }
    }
    info!("tui exited");
    Ok(())
}

fn run_command(
    command: Command,
    db: &StudyDb,
    config_store: &dyn ConfigStore,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Export { format, output } => cmd_export(db, format, output.as_deref(), out),
        Command::Target(cmd) => cmd_target(db, cmd, out),
        Command::Topic(cmd) => cmd_master(db, MasterKind::Topic, cmd, out),
        Command::Mode(cmd) => cmd_master(db, MasterKind::Mode, cmd, out),
        Command::Stats { from, to, topic } => {
            let range = match (from, to) {
                (Some(from), Some(to)) => DateRange::parse(&from, &to)?,
                _ => DateRange::last_days(util::today(), config_store.load().range_days),
            };
            cmd_stats(db, range, topic, out)
        }
        Command::Log(args) => cmd_log(db, args, out),
    }
}

fn cmd_export(db: &StudyDb, format: ExportFormat, output: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let sessions = db.sessions()?;
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            export::export(format, &sessions, BufWriter::new(file))?;
            info!("exported {} sessions to {}", sessions.len(), path.display());
            writeln!(out, "Exported {} sessions to {}", sessions.len(), path.display())?;
        }
        None => export::export(format, &sessions, out)?,
    }
    Ok(())
}

fn cmd_target(db: &StudyDb, cmd: TargetCommand, out: &mut dyn Write) -> Result<()> {
    match cmd {
        TargetCommand::Set { hours, minutes } => {
            let secs = target::target_seconds_from_hm(hours, minutes);
            let mut history = db.target_history()?;
            let entry = history.set_effective_today(secs).clone();
            db.upsert_target(&entry)?;
            writeln!(
                out,
                "Target {} effective from {}",
                util::seconds_to_hm(secs as u64),
                util::format_date_key(entry.date_key)
            )?;
        }
        TargetCommand::Show { date } => {
            let date = match date {
                Some(d) => util::parse_date_key(&d).with_context(|| format!("invalid date '{d}', expected YYYY-MM-DD"))?,
                None => util::today(),
            };
            let history = db.target_history()?;
            match history.resolve(date) {
                Some(secs) => writeln!(
                    out,
                    "{}: {}",
                    util::format_date_key(date),
                    util::seconds_to_hm(secs as u64)
                )?,
                None => writeln!(out, "{}: no target", util::format_date_key(date))?,
            }
        }
        TargetCommand::History => {
            let history = db.target_history()?;
            if history.is_empty() {
                writeln!(out, "No target history yet.")?;
            }
            for e in history.newest_first() {
                writeln!(
                    out,
                    "{}  {}",
                    util::format_date_key(e.date_key),
                    util::seconds_to_hm(e.target_seconds as u64)
                )?;
            }
        }
        TargetCommand::Clear { yes } => {
            if !yes {
                bail!("refusing to clear the target history without --yes");
            }
            db.clear_target_history()?;
            writeln!(out, "Target history cleared.")?;
        }
    }
    Ok(())
}

fn cmd_master(db: &StudyDb, kind: MasterKind, cmd: MasterCommand, out: &mut dyn Write) -> Result<()> {
    let mut list: MasterList = db.master_list(kind)?;
    match cmd {
        MasterCommand::Add { name } => {
            let item = list.add(&name)?.clone();
            db.insert_master_item(kind, &item)?;
            writeln!(out, "Added {} '{}'", kind, item.name)?;
        }
        MasterCommand::Toggle { name } => {
            let item = list.toggle_by_name(&name)?.clone();
            db.set_master_active(&item.id, item.active)?;
            let state = if item.active { "active" } else { "inactive" };
            writeln!(out, "{} '{}' is now {state}", kind.label(), item.name)?;
        }
        MasterCommand::List => {
            if list.is_empty() {
                writeln!(out, "No {kind}s yet.")?;
            }
            let usage = studymate::analytics::usage_counts(&db.sessions()?);
            for item in list.sorted() {
                let uses = match kind {
                    MasterKind::Topic => usage.topic(&item.name),
                    MasterKind::Mode => usage.mode(&item.name),
                };
                let state = if item.active { "active" } else { "inactive" };
                writeln!(out, "{:<24} {:<9} {uses} sessions", item.name, state)?;
            }
        }
    }
    Ok(())
}

fn cmd_stats(db: &StudyDb, range: DateRange, topic: Option<String>, out: &mut dyn Write) -> Result<()> {
    let sessions = db.sessions()?;
    let targets = db.target_history()?;
    let filter = topic.map_or(TopicFilter::All, TopicFilter::Topic);

    let home = HomeStats::compute(&sessions, &targets, util::today());
    let pct = |p: Option<u8>| p.map_or("—%".to_string(), |p| format!("{p}%"));
    writeln!(
        out,
        "Today      {}  ({})",
        util::hhmm(home.today.study_seconds),
        pct(home.today.percent())
    )?;
    writeln!(
        out,
        "Yesterday  {}  ({})",
        util::hhmm(home.yesterday.study_seconds),
        pct(home.yesterday.percent())
    )?;
    writeln!(out, "Streak     {} day(s)", home.streak)?;
    writeln!(out)?;

    let report = TrendReport::build(&sessions, &targets, range, &filter);
    writeln!(
        out,
        "{} to {} ({} day(s), {})",
        util::format_date_key(range.start()),
        util::format_date_key(range.end()),
        range.days(),
        report.filter.label()
    )?;
    writeln!(out, "{:<8} {:>7} {:>7}", "Day", "Target", "Actual")?;
    for p in &report.daily {
        writeln!(out, "{:<8} {:>7} {:>7}", p.label, p.target_minutes, p.actual_minutes)?;
    }
    for (title, items) in [("Topics", &report.topics), ("Modes", &report.modes)] {
        writeln!(out)?;
        writeln!(out, "{title}")?;
        if items.is_empty() {
            writeln!(out, "  (no study time)")?;
        }
        for (name, secs) in items {
            writeln!(out, "  {:<22} {}", name, util::seconds_to_hm(*secs))?;
        }
    }
    Ok(())
}

fn cmd_log(db: &StudyDb, args: LogArgs, out: &mut dyn Write) -> Result<()> {
    if let Some(LogAction::Clear { yes }) = args.action {
        if !yes {
            bail!("refusing to clear the study log without --yes");
        }
        db.clear_sessions()?;
        writeln!(out, "Study log cleared.")?;
        return Ok(());
    }

    let sessions = db.sessions()?;
    if sessions.is_empty() {
        writeln!(out, "No sessions logged yet.")?;
        return Ok(());
    }
    let limit = args.limit.unwrap_or(sessions.len());
    for s in sessions.iter().take(limit) {
        writeln!(
            out,
            "{}  {:<9} {:<16} {:<14} study {}  break {}  paused {}",
            s.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            s.status.label(),
            s.topic,
            s.mode,
            util::mmss(s.active_study_seconds),
            util::mmss(s.active_break_seconds),
            util::mmss(s.paused_total_seconds)
        )?;
    }
    Ok(())
}
