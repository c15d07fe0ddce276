//! Domains module containing business logic organized by bounded contexts.
//!
//! - **canvas**: the Canvas LMS API client and its models
//! - **tools**: MCP tools built on top of the Canvas client

pub mod canvas;
pub mod tools;
