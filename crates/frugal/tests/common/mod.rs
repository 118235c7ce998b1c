use frugal_store::{Paths, TaskDir, CONVERSATION_FILENAME};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Seed a task directory with a single-user-message conversation.
pub fn seed_task(storage: &Path, task_id: &str, message: &str) -> TaskDir {
    let dir = storage.join(task_id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(CONVERSATION_FILENAME),
        serde_json::to_vec_pretty(&json!([
            {"role": "user", "content": "earlier question"},
            {"role": "assistant", "content": "earlier answer"},
            {"role": "user", "content": message},
        ]))
        .unwrap(),
    )
    .unwrap();
    TaskDir {
        task_id: task_id.to_string(),
        dir,
    }
}

pub fn test_paths(temp: &Path, storage: &Path) -> Paths {
    Paths::with_storage_override(temp.join("home"), storage.to_path_buf())
}

/// A TypeScript source around `functions * 190` chars, mostly condensable
/// function bodies.
pub fn typescript_source(functions: usize) -> String {
    let mut src = String::from("import { runtime } from './runtime';\n");
    for i in 0..functions {
        src.push_str(&format!(
            "export function stage{i}(input: number) {{\n  if (input > 0) {{\n    const doubled = input * 2;\n    const offset = doubled + {i};\n    runtime.record(doubled, offset);\n    runtime.flush(offset);\n  }}\n  return input;\n}}\n"
        ));
    }
    src
}

/// Wrap a source in the assistant's file-content marker.
pub fn wrap_block(path: &str, content: &str) -> String {
    format!("<file_content path=\"{path}\">\n{content}</file_content>")
}
