//! Path resolution: assistant task storage and frugal's own state files

use std::path::{Path, PathBuf};

/// File name of the conversation record inside each task directory
pub const CONVERSATION_FILENAME: &str = "api_conversation_history.json";

/// Extension publisher directory the assistant stores tasks under
const ASSISTANT_STORAGE_DIRS: &[&str] = &["saoudrizwan.claude-dev"];

/// A discovered task directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDir {
    pub task_id: String,
    pub dir: PathBuf,
}

impl TaskDir {
    pub fn conversation_path(&self) -> PathBuf {
        self.dir.join(CONVERSATION_FILENAME)
    }
}

/// Resolves storage roots for the observed assistant and frugal's own files
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    /// Explicit storage root (FRUGAL_STORAGE_DIR), checked before discovery
    pub storage_override: Option<PathBuf>,
}

impl Paths {
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        let storage_override = std::env::var_os("FRUGAL_STORAGE_DIR").map(PathBuf::from);

        Ok(Self {
            home,
            storage_override,
        })
    }

    /// Construct with an explicit storage root, bypassing discovery
    pub fn with_storage_override(home: PathBuf, storage_root: PathBuf) -> Self {
        Self {
            home,
            storage_override: Some(storage_root),
        }
    }

    /// frugal's own state directory
    pub fn frugal_dir(&self) -> PathBuf {
        self.home.join(".frugal")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.frugal_dir().join("settings.json")
    }

    pub fn jobs_db_path(&self) -> PathBuf {
        self.frugal_dir().join("jobs.db")
    }

    /// Candidate assistant storage roots, most specific first.
    ///
    /// Mirrors the editor's globalStorage layout on each platform; only
    /// existing directories are returned.
    pub fn storage_roots(&self) -> Vec<PathBuf> {
        if let Some(root) = &self.storage_override {
            return if root.is_dir() {
                vec![root.clone()]
            } else {
                Vec::new()
            };
        }

        let mut candidates = Vec::new();
        for publisher in ASSISTANT_STORAGE_DIRS {
            for editor in ["Code", "Code - Insiders"] {
                // Linux
                candidates.push(
                    self.home
                        .join(".config")
                        .join(editor)
                        .join("User/globalStorage")
                        .join(publisher),
                );
                // macOS
                candidates.push(
                    self.home
                        .join("Library/Application Support")
                        .join(editor)
                        .join("User/globalStorage")
                        .join(publisher),
                );
                // Windows
                candidates.push(
                    self.home
                        .join("AppData/Roaming")
                        .join(editor)
                        .join("User/globalStorage")
                        .join(publisher),
                );
            }
        }

        candidates.into_iter().filter(|p| p.is_dir()).collect()
    }

    /// Enumerate task directories containing a conversation record,
    /// most recently modified first.
    pub fn discover_tasks(&self) -> Vec<TaskDir> {
        let mut tasks = Vec::new();
        for root in self.storage_roots() {
            collect_tasks(&root.join("tasks"), &mut tasks);
            // Override roots may point directly at a tasks dir
            if self.storage_override.is_some() {
                collect_tasks(&root, &mut tasks);
            }
        }

        tasks.sort_by_key(|t| {
            std::cmp::Reverse(
                std::fs::metadata(t.conversation_path())
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
            )
        });
        tasks.dedup_by(|a, b| a.dir == b.dir);
        tasks
    }

    /// Find a task directory by id across all storage roots
    pub fn find_task(&self, task_id: &str) -> Option<TaskDir> {
        self.discover_tasks().into_iter().find(|t| t.task_id == task_id)
    }
}

fn collect_tasks(tasks_root: &Path, out: &mut Vec<TaskDir>) {
    let entries = match std::fs::read_dir(tasks_root) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        if !dir.join(CONVERSATION_FILENAME).is_file() {
            continue;
        }
        let task_id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if task_id.is_empty() {
            continue;
        }
        out.push(TaskDir { task_id, dir });
    }
}
