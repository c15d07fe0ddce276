//! Single course lookup tool definition.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use tracing::{info, instrument};

use crate::domains::canvas::models::{Course, SingleCourseInclude};
use crate::domains::canvas::{CanvasClient, QueryParams};
use crate::domains::tools::{ToolArguments, ToolDefinition, ToolError, results::structured_result};

/// Parameters for the course lookup tool.
#[derive(Debug, Clone, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetCourseByIdParams {
    /// Canvas course ID. Required unless `course_id` is given.
    #[serde(default)]
    pub id: Option<u64>,

    /// Same as `id`; pass only one of them.
    #[serde(default)]
    pub course_id: Option<u64>,

    /// Extra data to embed, e.g. `term`, `syllabus_body`, `permissions`.
    #[serde(default)]
    pub include: Option<Vec<SingleCourseInclude>>,
}

/// Validated course lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLookup {
    pub id: u64,
    pub include: Vec<SingleCourseInclude>,
}

/// Course lookup tool - returns one course by its ID.
pub struct GetCourseByIdTool;

impl ToolDefinition for GetCourseByIdTool {
    const NAME: &'static str = "get_course_by_id";
    const DESCRIPTION: &'static str = "Returns a single Canvas course using its ID. \
        Use `include` to embed extra data such as term, teachers, syllabus_body or permissions.";
    const ARGUMENTS: &'static [&'static str] = &["id", "course_id", "include"];
    type Params = GetCourseByIdParams;
}

impl GetCourseByIdTool {
    pub fn parse(args: &ToolArguments) -> Result<CourseLookup, ToolError> {
        args.accept_only(Self::ARGUMENTS)?;
        Ok(CourseLookup {
            id: args.required_any(&["id", "course_id"])?,
            include: args.optional("include")?.unwrap_or_default(),
        })
    }

    #[instrument(skip_all)]
    pub async fn execute(
        client: &CanvasClient,
        args: &ToolArguments,
    ) -> Result<CallToolResult, ToolError> {
        let lookup = Self::parse(args)?;
        info!("Course lookup tool called for course {}", lookup.id);

        let mut query = QueryParams::new();
        query.push_list("include", lookup.include.iter().map(SingleCourseInclude::as_str));

        let course: Course = client.get(&format!("courses/{}", lookup.id), &query).await?;

        let title = match (&course.name, &course.course_code) {
            (Some(name), Some(code)) => format!("{name} ({code})"),
            (Some(name), None) => name.clone(),
            _ => format!("Course {}", course.id),
        };
        let details = serde_json::to_string_pretty(&course).unwrap_or_default();
        let summary = format!("{title} [ID: {}]\n\n{details}", course.id);

        Ok(structured_result(summary, &course))
    }
}
