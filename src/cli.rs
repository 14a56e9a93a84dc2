//! Command-line arguments

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};

use tickdo_lib::domain::{ListKind, Priority, StatusFilter};
use tickdo_lib::views::View;

#[derive(Parser)]
#[command(name = "tickdo")]
#[command(about = "Tasks, folders, tags and notes from the terminal")]
#[command(version)]
pub struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (database, sync settings, logs)
    #[arg(long, global = true, env = "TICKDO_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, edit and complete tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Task and note folders
    #[command(subcommand)]
    List(ListCommand),
    #[command(subcommand)]
    Tag(TagCommand),
    #[command(subcommand)]
    Note(NoteCommand),
    /// Saved filters
    #[command(subcommand)]
    Filter(FilterCommand),
    #[command(subcommand)]
    Trash(TrashCommand),
    /// Show the tasks of a view: all, inbox, today, tomorrow, next7,
    /// list:<id>, tag:<name> or filter:<id>
    View {
        #[arg(default_value = "inbox")]
        view: View,
        /// Higher priority first
        #[arg(short = 'p', long)]
        by_priority: bool,
    },
    /// Open tasks grouped by priority
    Matrix,
    #[command(subcommand)]
    Calendar(CalendarCommand),
    /// Search tasks, notes, folders and tags
    Search { query: Vec<String> },
    /// Hosted backend settings
    #[command(subcommand)]
    Sync(SyncCommand),
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        title: Vec<String>,
        #[arg(long, value_parser = parse_when)]
        due: Option<DateTime<Utc>>,
        #[arg(long)]
        list: Option<String>,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Add from a line like `Pay rent tomorrow #home`
    Quick {
        line: Vec<String>,
        /// View supplying defaults (list, date, tag)
        #[arg(long, default_value = "inbox")]
        view: View,
    },
    Show { id: String },
    Edit(TaskEdit),
    /// Toggle completion
    Done { id: String },
    Priority { id: String, priority: Priority },
    /// Move onto a list, a tag or a matrix quadrant
    Move {
        id: String,
        #[arg(long, group = "target")]
        list: Option<String>,
        #[arg(long, group = "target")]
        tag: Option<String>,
        #[arg(long, group = "target")]
        quadrant: Option<Priority>,
    },
    /// Move to the trash
    Delete { id: String },
    /// Add a tag name to a task
    Tag { id: String, name: String },
    Untag { id: String, name: String },
    #[command(subcommand)]
    Subtask(SubtaskCommand),
}

#[derive(Args)]
pub struct TaskEdit {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long, value_parser = parse_when, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,
    #[arg(long)]
    pub clear_due: bool,
    #[arg(long)]
    pub all_day: Option<bool>,
    #[arg(long, conflicts_with = "inbox")]
    pub list: Option<String>,
    /// Take the task out of its list
    #[arg(long)]
    pub inbox: bool,
    /// Replace all tag names
    #[arg(long = "tag")]
    pub tags: Option<Vec<String>>,
}

#[derive(Subcommand)]
pub enum SubtaskCommand {
    Add { task_id: String, title: Vec<String> },
    Toggle { task_id: String, subtask_id: String },
    Delete { task_id: String, subtask_id: String },
}

#[derive(Subcommand)]
pub enum ListCommand {
    Add {
        name: Vec<String>,
        #[arg(long, default_value = "task")]
        kind: ListKind,
    },
    Ls {
        #[arg(long)]
        kind: Option<ListKind>,
    },
    /// Delete a folder; its tasks and notes go to the trash
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TagCommand {
    Add { name: String },
    Ls,
    /// Delete by id or name
    Delete { tag: String },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    Add {
        title: Vec<String>,
        #[arg(long)]
        list: Option<String>,
    },
    /// Notes of a folder, or loose notes without `--list`
    Ls {
        #[arg(long)]
        list: Option<String>,
    },
    Show { id: String },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "loose")]
        list: Option<String>,
        /// Take the note out of its folder
        #[arg(long)]
        loose: bool,
    },
    Delete { id: String },
    /// Show a task description with linked note titles
    Links { task_id: String },
}

#[derive(Subcommand)]
pub enum FilterCommand {
    Save {
        name: Vec<String>,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        list: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    Ls,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TrashCommand {
    Ls,
    Restore { id: String },
    /// Delete one item for good
    Purge { id: String },
    Empty,
}

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// Events, optionally between two dates
    Ls {
        #[arg(long, value_parser = parse_when)]
        from: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_when)]
        to: Option<DateTime<Utc>>,
    },
    /// Reschedule a task
    Move {
        id: String,
        #[arg(value_parser = parse_when)]
        start: DateTime<Utc>,
        #[arg(long)]
        all_day: bool,
    },
}

#[derive(Subcommand)]
pub enum SyncCommand {
    Status,
    /// Copy local data to a hosted backend and switch to it
    Connect {
        #[arg(long, env = "TICKDO_SUPABASE_URL")]
        url: String,
        #[arg(long, env = "TICKDO_SUPABASE_ANON_KEY")]
        anon_key: String,
        #[arg(long, env = "TICKDO_ACCESS_TOKEN")]
        access_token: Option<String>,
    },
    /// Go back to the local database
    Disconnect,
}

/// Join words given without quotes
pub fn words(parts: &[String]) -> String {
    parts.join(" ")
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("{} does not exist in the local time zone", naive))
}

/// RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (local time)
pub fn parse_when(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(naive);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("Unrecognized date '{}', use YYYY-MM-DD or YYYY-MM-DD HH:MM", s))?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| anyhow!("Invalid date '{}'", s))?;
    local_to_utc(midnight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_when() {
        let utc = parse_when("2024-05-10T08:00:00Z").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap());

        let local = parse_when("2024-05-10").unwrap().with_timezone(&Local);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

        assert!(parse_when("next tuesday").is_err());
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["tickdo", "--yes", "task", "add", "Buy", "milk", "-t", "shop"]).unwrap();
        assert!(cli.yes);
        match cli.command {
            Command::Task(TaskCommand::Add { title, tags, .. }) => {
                assert_eq!(words(&title), "Buy milk");
                assert_eq!(tags, vec!["shop"]);
            }
            _ => panic!("expected task add"),
        }

        let cli = Cli::try_parse_from(["tickdo", "view", "tag:home", "-p", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::View { view, by_priority } => {
                assert_eq!(view, View::Tag("home".to_string()));
                assert!(by_priority);
            }
            _ => panic!("expected view"),
        }

        assert!(Cli::try_parse_from(["tickdo", "task", "move", "x", "--list", "a", "--tag", "b"]).is_err());
    }
}
