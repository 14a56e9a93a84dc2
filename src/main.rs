//! tickdo command-line entry point

mod cli;
mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use tickdo_lib::commands;
use tickdo_lib::config::{self, AppConfig, ENV_DATA_DIR};
use tickdo_lib::domain::{FilterCriteria, NotePatch, TaskPatch};
use tickdo_lib::store::{AlwaysConfirm, Confirm, DropTarget};
use tickdo_lib::{init_app, AppState};

use cli::{
    words, CalendarCommand, Cli, Command, FilterCommand, ListCommand, NoteCommand, SubtaskCommand, SyncCommand,
    TagCommand, TaskCommand, TaskEdit, TrashCommand,
};

/// Handler errors are display strings
fn cmd<T>(result: Result<T, String>) -> Result<T> {
    result.map_err(anyhow::Error::msg)
}

struct Output {
    json: bool,
}

impl Output {
    fn show<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = text(value);
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }

    /// Result of a confirmed action; a declined prompt is not an error
    fn done(&self, confirmed: bool, message: &str) -> Result<()> {
        self.show(&serde_json::json!({ "done": confirmed }), |_| {
            if confirmed { message.to_string() } else { "Cancelled".to_string() }
        })
    }
}

fn confirmer(yes: bool) -> Arc<dyn Confirm> {
    if yes {
        return Arc::new(AlwaysConfirm);
    }
    Arc::new(|prompt: &str| {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                log::warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            })
    })
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let data_dir = cli.data_dir.as_ref().map(|d| d.display().to_string());
    let config = AppConfig::resolve(|key| {
        if key == ENV_DATA_DIR {
            if let Some(dir) = &data_dir {
                return Some(dir.clone());
            }
        }
        std::env::var(key).ok()
    });
    cmd(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Err(e) = rolling_logger::init_logger(config.log_dir(), "TickDo") {
        eprintln!("warning: file logging disabled: {}", e);
    }
    log::info!("tickdo {} starting, data dir {}", env!("CARGO_PKG_VERSION"), config.data_dir.display());

    let state = cmd(init_app(config, confirmer(cli.yes)).await)?;
    let out = Output { json: cli.json };

    // Without a loaded snapshot only the sync commands are safe to run
    if !state.store.is_initialized().await && !matches!(cli.command, Command::Sync(_)) {
        anyhow::bail!(
            "could not load data from the hosted backend; check the connection or run `tickdo sync disconnect` (see {})",
            state.config.log_dir().display()
        );
    }

    let result = run(&state, &out, cli.command).await;
    if let Err(e) = &result {
        log::error!("Command failed: {}", e);
    }
    let failed = state.store.failed_writes();
    if failed > 0 {
        let log = rolling_logger::log_file_path().unwrap_or_else(|| state.config.log_dir());
        eprintln!("warning: {} change(s) could not be saved, see {}", failed, log.display());
    }
    result
}

async fn run(state: &AppState, out: &Output, command: Command) -> Result<()> {
    match command {
        Command::Task(command) => run_task(state, out, command).await,
        Command::List(command) => run_list(state, out, command).await,
        Command::Tag(command) => run_tag(state, out, command).await,
        Command::Note(command) => run_note(state, out, command).await,
        Command::Filter(command) => run_filter(state, out, command).await,
        Command::Trash(command) => run_trash(state, out, command).await,
        Command::View { view, by_priority } => {
            let listing = cmd(commands::get_view(state, view, by_priority).await)?;
            out.show(&listing, render::listing)
        }
        Command::Matrix => {
            let quadrants = cmd(commands::get_matrix(state).await)?;
            out.show(&quadrants, |q| render::matrix(q))
        }
        Command::Calendar(CalendarCommand::Ls { from, to }) => {
            let events = cmd(commands::get_calendar_events(state, from, to).await)?;
            out.show(&events, |e| render::calendar(e))
        }
        Command::Calendar(CalendarCommand::Move { id, start, all_day }) => {
            let task = cmd(commands::reschedule_task(state, id, start, all_day).await)?;
            out.show(&task, render::task_line)
        }
        Command::Search { query } => {
            let hits = cmd(commands::search(state, words(&query)).await)?;
            out.show(&hits, |h| render::search(h))
        }
        Command::Sync(command) => run_sync(state, out, command).await,
    }
}

fn task_patch(edit: &TaskEdit) -> TaskPatch {
    TaskPatch {
        title: edit.title.clone(),
        description: if edit.clear_description { Some(None) } else { edit.description.clone().map(Some) },
        priority: edit.priority,
        due_date: if edit.clear_due { Some(None) } else { edit.due.map(Some) },
        list_id: if edit.inbox { Some(None) } else { edit.list.clone().map(Some) },
        tags: edit.tags.clone(),
        is_all_day: edit.all_day.map(Some),
        ..Default::default()
    }
}

async fn run_task(state: &AppState, out: &Output, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add { title, due, list, tags } => {
            let task = cmd(commands::create_task(state, words(&title), due, list, tags).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Quick { line, view } => {
            let task = cmd(commands::quick_add_task(state, words(&line), view).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Show { id } => {
            let task = cmd(commands::get_task(state, id).await)?;
            out.show(&task, render::task_detail)
        }
        TaskCommand::Edit(edit) => {
            let patch = task_patch(&edit);
            let task = cmd(commands::update_task(state, edit.id, patch).await)?;
            out.show(&task, render::task_detail)
        }
        TaskCommand::Done { id } => {
            let task = cmd(commands::toggle_task(state, id).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Priority { id, priority } => {
            let task = cmd(commands::set_task_priority(state, id, priority).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Move { id, list, tag, quadrant } => {
            let target = match (list, tag, quadrant) {
                (Some(list), _, _) => DropTarget::List(list),
                (_, Some(tag), _) => DropTarget::Tag(tag),
                (_, _, Some(priority)) => DropTarget::Matrix(priority),
                _ => anyhow::bail!("Give one of --list, --tag or --quadrant"),
            };
            let task = cmd(commands::move_task(state, id, target).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Delete { id } => {
            let deleted = cmd(commands::delete_task(state, id).await)?;
            out.done(deleted, "Moved to trash")
        }
        TaskCommand::Tag { id, name } => {
            let task = cmd(commands::add_task_tag(state, id, name).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Untag { id, name } => {
            let task = cmd(commands::remove_task_tag(state, id, name).await)?;
            out.show(&task, render::task_line)
        }
        TaskCommand::Subtask(SubtaskCommand::Add { task_id, title }) => {
            let subtask = cmd(commands::add_subtask(state, task_id, words(&title)).await)?;
            out.show(&subtask, |s| format!("{}  {}", s.id, s.title))
        }
        TaskCommand::Subtask(SubtaskCommand::Toggle { task_id, subtask_id }) => {
            let task = cmd(commands::toggle_subtask(state, task_id, subtask_id).await)?;
            out.show(&task, render::task_detail)
        }
        TaskCommand::Subtask(SubtaskCommand::Delete { task_id, subtask_id }) => {
            let deleted = cmd(commands::delete_subtask(state, task_id, subtask_id).await)?;
            out.done(deleted, "Subtask deleted")
        }
    }
}

async fn run_list(state: &AppState, out: &Output, command: ListCommand) -> Result<()> {
    match command {
        ListCommand::Add { name, kind } => {
            let list = cmd(commands::create_list(state, words(&name), kind).await)?;
            out.show(&list, |l| render::lists(std::slice::from_ref(l)))
        }
        ListCommand::Ls { kind } => {
            let lists = cmd(commands::list_lists(state, kind).await)?;
            out.show(&lists, |l| render::lists(l))
        }
        ListCommand::Delete { id } => {
            let deleted = cmd(commands::delete_list(state, id).await)?;
            out.done(deleted, "Folder moved to trash")
        }
    }
}

async fn run_tag(state: &AppState, out: &Output, command: TagCommand) -> Result<()> {
    match command {
        TagCommand::Add { name } => {
            let tag = cmd(commands::create_tag(state, name).await)?;
            out.show(&tag, |t| t.display_name())
        }
        TagCommand::Ls => {
            let tags = cmd(commands::list_tags(state).await)?;
            out.show(&tags, |t| render::tags(t))
        }
        TagCommand::Delete { tag } => {
            let deleted = cmd(commands::delete_tag(state, tag).await)?;
            out.done(deleted, "Tag moved to trash")
        }
    }
}

async fn run_note(state: &AppState, out: &Output, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add { title, list } => {
            let note = cmd(commands::create_note(state, words(&title), list).await)?;
            out.show(&note, render::note)
        }
        NoteCommand::Ls { list } => {
            let notes = cmd(commands::list_notes(state, list).await)?;
            out.show(&notes, |n| render::notes(n))
        }
        NoteCommand::Show { id } => {
            let note = cmd(commands::get_note(state, id).await)?;
            out.show(&note, render::note)
        }
        NoteCommand::Edit { id, title, content, list, loose } => {
            let patch = NotePatch {
                title,
                content,
                list_id: if loose { Some(None) } else { list.map(Some) },
            };
            let note = cmd(commands::update_note(state, id, patch).await)?;
            out.show(&note, render::note)
        }
        NoteCommand::Delete { id } => {
            let deleted = cmd(commands::delete_note(state, id).await)?;
            out.done(deleted, "Note moved to trash")
        }
        NoteCommand::Links { task_id } => {
            let segments = cmd(commands::get_task_note_links(state, task_id).await)?;
            out.show(&segments, |s| render::links(s))
        }
    }
}

async fn run_filter(state: &AppState, out: &Output, command: FilterCommand) -> Result<()> {
    match command {
        FilterCommand::Save { name, status, priority, list, tag } => {
            let criteria = FilterCriteria { status, priority, list_id: list, tag };
            let filter = cmd(commands::save_filter(state, words(&name), criteria).await)?;
            out.show(&filter, |f| render::filters(std::slice::from_ref(f)))
        }
        FilterCommand::Ls => {
            let filters = cmd(commands::list_filters(state).await)?;
            out.show(&filters, |f| render::filters(f))
        }
        FilterCommand::Delete { id } => {
            let deleted = cmd(commands::delete_filter(state, id).await)?;
            out.done(deleted, "Filter deleted")
        }
    }
}

async fn run_trash(state: &AppState, out: &Output, command: TrashCommand) -> Result<()> {
    match command {
        TrashCommand::Ls => {
            let entries = cmd(commands::list_trash(state).await)?;
            out.show(&entries, |e| render::trash(e))
        }
        TrashCommand::Restore { id } => {
            let item = cmd(commands::restore_trash_item(state, id).await)?;
            out.show(&item, |i| format!("Restored {} '{}'", i.kind(), i.title()))
        }
        TrashCommand::Purge { id } => {
            let deleted = cmd(commands::purge_trash_item(state, id).await)?;
            out.done(deleted, "Deleted permanently")
        }
        TrashCommand::Empty => {
            let removed = cmd(commands::empty_trash(state).await)?;
            out.show(&removed, |r| match r {
                Some(n) => format!("Removed {} item(s)", n),
                None => "Cancelled".to_string(),
            })
        }
    }
}

async fn run_sync(state: &AppState, out: &Output, command: SyncCommand) -> Result<()> {
    match command {
        SyncCommand::Status => {
            let status = cmd(commands::get_sync_status(state).await)?;
            out.show(&status, render::sync_status)
        }
        SyncCommand::Connect { url, anon_key, access_token } => {
            let report = cmd(commands::configure_cloud_sync(state, url, anon_key, access_token).await)?;
            out.show(&report, |r| {
                let mut text = format!("Connected. Copied {} record(s)", r.copied);
                if r.failed > 0 {
                    text.push_str(&format!(", {} failed (see log)", r.failed));
                }
                text
            })
        }
        SyncCommand::Disconnect => {
            cmd(commands::disconnect_cloud_sync(state).await)?;
            out.done(true, "Using the local database")
        }
    }
}
