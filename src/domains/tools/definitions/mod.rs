//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file.

mod api_request;
pub mod courses;
mod hello_world;

pub use api_request::{ApiRequestParams, ApiRequestTool};
pub use courses::{GetAllCoursesTool, GetCourseByIdTool, GetCourseSummariesTool};
pub use hello_world::{HelloWorldParams, HelloWorldTool};
