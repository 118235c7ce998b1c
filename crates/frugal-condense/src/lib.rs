//! Condensation strategies: structural text reduction per content category

mod code;
mod config;
mod engine;
mod generic;
mod json;
mod markdown;
mod python;
mod remote;

pub use code::JsExtractor;
pub use config::condense_config;
pub use engine::{CondenseEngine, StructuralExtractor, ACCEPT_RATIO};
pub use generic::condense_generic;
pub use json::condense_json;
pub use markdown::condense_markdown;
pub use python::PythonExtractor;
pub use remote::{optimize_remote, RemoteResult};
