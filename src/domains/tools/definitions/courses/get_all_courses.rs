//! Course listing tool definition.
//!
//! Lists the caller's courses with automatic pagination and field selection.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, instrument};

use super::display::{format_course_listing, select_fields};
use crate::domains::canvas::models::{
    CourseDisplayField, CourseInclude, DETAILED_FIELDS, EnrollmentState, EnrollmentType,
    WorkflowState,
};
use crate::domains::canvas::pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::domains::canvas::{CanvasClient, PageOptions, QueryParams};
use crate::domains::tools::{
    OneOrMany, ToolArguments, ToolDefinition, ToolError, results::structured_result,
};

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 1000;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the course listing tool.
///
/// Only used to publish the input schema; arguments are validated by
/// [`GetAllCoursesTool::parse`].
#[derive(Debug, Clone, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetAllCoursesParams {
    /// Your role in the course. Defaults to `student`.
    #[serde(default)]
    pub enrollment_type: Option<EnrollmentType>,

    /// Same as `enrollment_type`; pass only one of them.
    #[serde(default, rename = "type")]
    pub kind: Option<EnrollmentType>,

    /// Enrollment state filter. Defaults to `active`.
    #[serde(default)]
    pub enrollment_state: Option<EnrollmentState>,

    /// Course publication states to keep.
    #[serde(default)]
    pub workflow_state: Option<OneOrMany<WorkflowState>>,

    /// Same as `workflow_state`; pass only one of them.
    #[serde(default)]
    pub state: Option<OneOrMany<WorkflowState>>,

    /// Extra data Canvas should embed in each course.
    #[serde(default)]
    pub include: Option<Vec<CourseInclude>>,

    /// Leave out blueprint courses.
    #[serde(default)]
    pub exclude_blueprint_courses: Option<bool>,

    /// Course fields to show. Defaults to a detailed selection; an empty
    /// list shows every field.
    #[serde(default)]
    pub display_fields: Option<Vec<CourseDisplayField>>,

    /// Maximum number of courses to return. Omit to fetch everything
    /// (up to 20 pages).
    #[serde(default)]
    #[schemars(range(min = 1, max = 1000))]
    pub limit: Option<u32>,

    /// Courses per API request. Defaults to 50.
    #[serde(default)]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
}

/// Validated course listing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseListQuery {
    pub enrollment_type: EnrollmentType,
    pub enrollment_state: EnrollmentState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<WorkflowState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<CourseInclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_blueprint_courses: Option<bool>,
    #[serde(skip)]
    pub display_fields: Vec<CourseDisplayField>,
    #[serde(skip)]
    pub limit: Option<usize>,
    #[serde(skip)]
    pub per_page: usize,
}

impl CourseListQuery {
    /// Query string for `GET /courses`, without `per_page`.
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("enrollment_type", self.enrollment_type.as_str())
            .push("enrollment_state", self.enrollment_state.as_str())
            .push_list("state", self.state.iter().map(WorkflowState::as_str))
            .push_list("include", self.include.iter().map(CourseInclude::as_str))
            .push_opt(
                "exclude_blueprint_courses",
                self.exclude_blueprint_courses.map(|b| b.to_string()),
            );
        params
    }
}

/// Structured output of the listing.
#[derive(Debug, Clone, Serialize)]
pub struct CourseListing {
    pub courses: Vec<serde_json::Value>,
    pub count: usize,
    pub retrieval: RetrievalInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalInfo {
    pub description: String,
    pub pages_fetched: usize,
    pub has_more: bool,
    pub per_page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Course listing tool.
pub struct GetAllCoursesTool;

impl ToolDefinition for GetAllCoursesTool {
    const NAME: &'static str = "get_all_courses";
    const DESCRIPTION: &'static str = "Get Canvas courses with automatic pagination and \
        customizable field display. Filter by enrollment type/state and course state, choose \
        extra data with `include`, and pick the fields to show with `display_fields`. \
        Without `limit` all courses are returned; with `limit` at most that many.";
    const ARGUMENTS: &'static [&'static str] = &[
        "enrollment_type",
        "type",
        "enrollment_state",
        "workflow_state",
        "state",
        "include",
        "exclude_blueprint_courses",
        "display_fields",
        "limit",
        "per_page",
    ];
    type Params = GetAllCoursesParams;
}

impl GetAllCoursesTool {
    /// Validate raw arguments, applying defaults.
    pub fn parse(args: &ToolArguments) -> Result<CourseListQuery, ToolError> {
        args.accept_only(Self::ARGUMENTS)?;

        Ok(CourseListQuery {
            enrollment_type: args
                .optional_any(&["enrollment_type", "type"])?
                .unwrap_or(EnrollmentType::Student),
            enrollment_state: args
                .optional("enrollment_state")?
                .unwrap_or(EnrollmentState::Active),
            state: args
                .optional_any::<OneOrMany<WorkflowState>>(&["workflow_state", "state"])?
                .map(OneOrMany::into_vec)
                .unwrap_or_default(),
            include: args.optional("include")?.unwrap_or_default(),
            exclude_blueprint_courses: args.optional("exclude_blueprint_courses")?,
            display_fields: args
                .optional("display_fields")?
                .unwrap_or_else(|| DETAILED_FIELDS.to_vec()),
            limit: args.optional_bounded("limit", 1, MAX_LIMIT)?,
            per_page: args
                .optional_bounded("per_page", 1, MAX_PER_PAGE)?
                .unwrap_or(DEFAULT_PER_PAGE),
        })
    }

    #[instrument(skip_all)]
    pub async fn execute(
        client: &CanvasClient,
        args: &ToolArguments,
    ) -> Result<CallToolResult, ToolError> {
        let query = Self::parse(args)?;
        info!(
            enrollment_type = %query.enrollment_type,
            limit = ?query.limit,
            per_page = query.per_page,
            "Course listing tool called"
        );

        let options = PageOptions::for_limit(query.limit, query.per_page);
        let page = client
            .get_paginated("courses", &query.to_query_params(), options)
            .await?;

        let courses = select_fields(page.items, &query.display_fields);
        let description = options.describe();
        let criteria = serde_json::to_value(&query).unwrap_or_default();
        let summary = format_course_listing(
            &courses,
            &criteria,
            &query.display_fields,
            &description,
            query.per_page,
        );

        info!("Listed {} courses in {} pages", courses.len(), page.pages_fetched);

        let listing = CourseListing {
            count: courses.len(),
            courses,
            retrieval: RetrievalInfo {
                description,
                pages_fetched: page.pages_fetched,
                has_more: page.has_more,
                per_page: query.per_page,
                limit: query.limit,
            },
        };
        Ok(structured_result(summary, &listing))
    }
}
