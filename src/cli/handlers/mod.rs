use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::Workspace;
use crate::io::lock::FileLock;
use crate::io::recovery;
use crate::model::task::TaskId;
use crate::ops::TaskStore;
use crate::ops::search;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ws = Workspace::resolve(
        cli.dir.as_deref().map(Path::new),
        cli.file.as_deref().map(Path::new),
    )?;

    match cli.command {
        None => crate::tui::run(&ws),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ws, args, json),
            Commands::Stats => cmd_stats(&ws, json),
            Commands::Recovery(args) => cmd_recovery(&ws, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ws, args, json),
            Commands::Edit(args) => cmd_edit(&ws, args, json),
            Commands::Rm(args) => cmd_rm(&ws, args, json),
            Commands::Done(args) => cmd_done(&ws, args),
            Commands::Undo(args) => cmd_undo(&ws, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// How a `<task>` argument resolved against the store
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Id(TaskId),
    Text(String),
}

/// An argument that parses as an id of an existing task selects that task;
/// anything else is matched as exact text.
fn resolve_selector(store: &TaskStore, arg: &str) -> Selector {
    match arg.parse::<TaskId>() {
        Ok(id) if store.get(id).is_some() => Selector::Id(id),
        _ => Selector::Text(arg.to_string()),
    }
}

fn load_store(ws: &Workspace) -> Result<TaskStore, Box<dyn std::error::Error>> {
    Ok(TaskStore::load(&ws.data_file)?)
}

/// Load the store under the write lock. The lock is held until dropped.
fn load_store_locked(ws: &Workspace) -> Result<(FileLock, TaskStore), Box<dyn std::error::Error>> {
    let dir = crate::io::store_io::data_dir(&ws.data_file);
    std::fs::create_dir_all(&dir)?;
    let lock = FileLock::acquire_default(&dir)?;
    let store = TaskStore::load(&ws.data_file)?;
    Ok((lock, store))
}

fn print_task(store: &TaskStore, id: TaskId, json: bool) -> CmdResult {
    if json {
        if let Some(task) = store.get(id) {
            println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
        }
    } else {
        println!("{}", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, args: ListArgs, json: bool) -> CmdResult {
    let store = load_store(ws)?;
    let re = match args.grep.as_deref() {
        Some(pattern) => Some(
            search::compile_pattern(pattern)
                .ok_or_else(|| format!("invalid search pattern: '{}'", pattern))?,
        ),
        None => None,
    };
    let hits: Option<Vec<TaskId>> = re.map(|re| {
        search::search_tasks(store.tasks(), &re)
            .into_iter()
            .map(|h| h.task_id)
            .collect()
    });

    let tasks = store.tasks().iter().filter(|t| {
        (!args.pending || !t.completed)
            && (!args.completed || t.completed)
            && hits.as_ref().is_none_or(|ids| ids.contains(&t.id))
    });

    if json {
        let out: Vec<TaskJson> = tasks.map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_listing(tasks) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(ws: &Workspace, json: bool) -> CmdResult {
    let store = load_store(ws)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats_to_json(store.counts()))?
        );
    } else {
        println!("{}", format_stats(store.counts()));
    }
    Ok(())
}

fn cmd_recovery(ws: &Workspace, args: RecoveryArgs, json: bool) -> CmdResult {
    let dir = crate::io::store_io::data_dir(&ws.data_file);

    if args.prune {
        let removed = recovery::prune_recovery(&dir, args.all)?;
        println!("pruned {} entries", removed);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&dir, Some(args.limit.unwrap_or(10)));
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_markdown());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ws: &Workspace, args: AddArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = load_store_locked(ws)?;
    let id = store.add(&args.text)?;
    print_task(&store, id, json)
}

fn cmd_edit(ws: &Workspace, args: EditArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = load_store_locked(ws)?;
    let new_id = match resolve_selector(&store, &args.task) {
        Selector::Id(id) => store.edit(id, &args.text)?,
        Selector::Text(text) => {
            if store.find_text(&text).is_empty() {
                return Err(format!("task not found: {}", text).into());
            }
            store.edit_text(&text, &args.text)?
        }
    };
    print_task(&store, new_id, json)
}

fn cmd_rm(ws: &Workspace, args: TaskArg, json: bool) -> CmdResult {
    let (_lock, mut store) = load_store_locked(ws)?;
    let removed: Vec<TaskId> = match resolve_selector(&store, &args.task) {
        Selector::Id(id) => store.remove(id)?.map(|t| t.id).into_iter().collect(),
        Selector::Text(text) => {
            let ids = store.find_text(&text);
            store.remove_text(&text)?;
            ids
        }
    };

    if json {
        let out = RemovedJson {
            removed: removed.iter().map(|id| id.0).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if removed.is_empty() {
        eprintln!("warning: no task matches '{}'", args.task);
    } else {
        for id in &removed {
            println!("{}", id);
        }
    }
    Ok(())
}

fn cmd_done(ws: &Workspace, args: TaskArg) -> CmdResult {
    let (_lock, mut store) = load_store_locked(ws)?;
    let target = match resolve_selector(&store, &args.task) {
        Selector::Id(id) => Some(id),
        Selector::Text(text) => store.find_text(&text).first().copied(),
    };
    let Some(id) = target else {
        eprintln!("warning: no task matches '{}'", args.task);
        return Ok(());
    };
    if !store.mark_completed(id)? {
        eprintln!("warning: {} is already completed", id);
    }
    println!("{}", id);
    Ok(())
}

fn cmd_undo(ws: &Workspace, args: TaskArg) -> CmdResult {
    let (_lock, mut store) = load_store_locked(ws)?;
    let target = match resolve_selector(&store, &args.task) {
        Selector::Id(id) => Some(id),
        Selector::Text(text) => store.find_text(&text).first().copied(),
    };
    let Some(id) = target else {
        eprintln!("warning: no task matches '{}'", args.task);
        return Ok(());
    };
    if !store.set_completed(id, false)? {
        eprintln!("warning: {} is not completed", id);
    }
    println!("{}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn selector_prefers_existing_id() {
        let tmp = TempDir::new().unwrap();
        let mut store = TaskStore::load(tmp.path().join("tasks.json")).unwrap();
        let id = store.add("Buy milk").unwrap();

        assert_eq!(resolve_selector(&store, "1"), Selector::Id(id));
        assert_eq!(resolve_selector(&store, "#1"), Selector::Id(id));
        assert_eq!(
            resolve_selector(&store, "Buy milk"),
            Selector::Text("Buy milk".into())
        );
    }

    #[test]
    fn numeric_text_without_matching_id_is_text() {
        let tmp = TempDir::new().unwrap();
        let mut store = TaskStore::load(tmp.path().join("tasks.json")).unwrap();
        store.add("42").unwrap();
        assert_eq!(resolve_selector(&store, "42"), Selector::Text("42".into()));
    }
}
