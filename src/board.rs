//! Task board loader.
//!
//! Reads the board JSON file and reshapes its tasks for the dashboard:
//! archived tasks are dropped, board columns collapse onto the three
//! dashboard columns, and each task gets an owning agent.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::assignment::assign_agent;
use crate::error::FetchError;
use crate::types::{FetchOutcome, Task, TaskColumn};
use crate::util::truncate_with_ellipsis;

const DESCRIPTION_LIMIT: usize = 100;
const DEFAULT_PRIORITY: &str = "medium";

#[derive(Debug, Deserialize)]
struct BoardFile {
    #[serde(default)]
    tasks: Vec<BoardTask>,
}

/// A task as stored in board-data.json.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub activity: Vec<BoardActivity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardActivity {
    #[serde(default)]
    pub date: Option<String>,
}

/// Load dashboard tasks from the board file, followed by `pinned` tasks.
///
/// A missing or unreadable board yields an empty list tagged as fallback.
pub fn load_tasks(path: &Path, pinned: &[Task]) -> FetchOutcome<Vec<Task>> {
    match read_board(path) {
        Ok(board_tasks) => {
            let mut tasks: Vec<Task> = board_tasks
                .iter()
                .filter(|t| !t.archived.unwrap_or(false))
                .map(to_dashboard_task)
                .collect();
            tasks.extend(pinned.iter().cloned());
            log::info!(
                "Board: {} tasks ({} on board, {} pinned)",
                tasks.len(),
                board_tasks.len(),
                pinned.len()
            );
            FetchOutcome::Live(tasks)
        }
        Err(e) => {
            log::warn!("Board: failed to load {}: {}", path.display(), e);
            FetchOutcome::fallback(Vec::new(), e.to_string())
        }
    }
}

pub fn read_board(path: &Path) -> Result<Vec<BoardTask>, FetchError> {
    let content = fs::read_to_string(path)?;
    let board: BoardFile = serde_json::from_str(&content)?;
    Ok(board.tasks)
}

/// Map a board column onto a dashboard column. Unknown columns land in backlog.
pub fn map_column(column: &str) -> TaskColumn {
    match column {
        "in-progress" => TaskColumn::InProgress,
        "done" => TaskColumn::Done,
        // "backlog", "recurring", anything else
        _ => TaskColumn::Backlog,
    }
}

pub fn to_dashboard_task(task: &BoardTask) -> Task {
    let last_update = task
        .activity
        .last()
        .and_then(|a| a.date.clone())
        .unwrap_or_else(|| task.created.clone());

    Task {
        id: task.id.clone(),
        title: task.title.clone(),
        description: truncate_with_ellipsis(&task.description, DESCRIPTION_LIMIT),
        column: map_column(&task.column),
        priority: task
            .priority
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        assignee: assign_agent(&task.title, &task.description).to_string(),
        created: task.created.clone(),
        last_update,
    }
}
