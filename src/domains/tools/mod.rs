//! Tools domain module.
//!
//! Tools are the operations MCP clients can call. Each one validates its
//! arguments, calls the Canvas API where needed and returns a text summary
//! with structured content.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Tool metadata and dispatch by name
//! - `arguments.rs` - Field-by-field argument validation
//! - `results.rs` - Result builders
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct and a unit
//!    struct implementing [`ToolDefinition`]
//! 2. Export it in `definitions/mod.rs`
//! 3. Add it to `tool_names()`, `get_all_tools()` and `call()` in `registry.rs`

mod arguments;
pub mod definitions;
mod error;
mod registry;
pub mod results;

pub use arguments::{OneOrMany, ToolArguments};
pub use error::ToolError;
pub use registry::{ToolDefinition, ToolRegistry};
