//! Canvas course models and query enumerations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declare a string-valued enum whose variants serialize as snake_case names.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value sent to Canvas.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Enrollment role used to filter the caller's courses.
    pub enum EnrollmentType {
        Teacher => "teacher",
        Student => "student",
        Ta => "ta",
        Observer => "observer",
        Designer => "designer",
    }
}

string_enum! {
    /// Enrollment state used to filter the caller's courses.
    pub enum EnrollmentState {
        Active => "active",
        InvitedOrPending => "invited_or_pending",
        Completed => "completed",
    }
}

string_enum! {
    /// Course publication state.
    pub enum WorkflowState {
        Unpublished => "unpublished",
        Available => "available",
        Completed => "completed",
        Deleted => "deleted",
    }
}

string_enum! {
    /// Page shown when a user first opens the course.
    pub enum DefaultView {
        Feed => "feed",
        Wiki => "wiki",
        Modules => "modules",
        Assignments => "assignments",
        Syllabus => "syllabus",
    }
}

string_enum! {
    /// Extra data Canvas can embed in course responses (`include[]`).
    pub enum CourseInclude {
        NeedsGradingCount => "needs_grading_count",
        SyllabusBody => "syllabus_body",
        PublicDescription => "public_description",
        TotalScores => "total_scores",
        CurrentGradingPeriodScores => "current_grading_period_scores",
        GradingPeriods => "grading_periods",
        Term => "term",
        Account => "account",
        CourseProgress => "course_progress",
        Sections => "sections",
        StorageQuotaUsedMb => "storage_quota_used_mb",
        TotalStudents => "total_students",
        PassbackStatus => "passback_status",
        Favorites => "favorites",
        Teachers => "teachers",
        ObservedUsers => "observed_users",
        Tabs => "tabs",
        CourseImage => "course_image",
        BannerImage => "banner_image",
        Concluded => "concluded",
        PostManually => "post_manually",
    }
}

string_enum! {
    /// Includes only accepted by the single-course endpoint.
    pub enum PerCourseInclude {
        AllCourses => "all_courses",
        Permissions => "permissions",
    }
}

string_enum! {
    /// Course fields that can be selected for display.
    pub enum CourseDisplayField {
        Id => "id",
        Name => "name",
        CourseCode => "course_code",
        Uuid => "uuid",
        SisCourseId => "sis_course_id",
        IntegrationId => "integration_id",
        WorkflowState => "workflow_state",
        AccountId => "account_id",
        RootAccountId => "root_account_id",
        EnrollmentTermId => "enrollment_term_id",
        CreatedAt => "created_at",
        StartAt => "start_at",
        EndAt => "end_at",
        DefaultView => "default_view",
        TimeZone => "time_zone",
        Locale => "locale",
        CourseFormat => "course_format",
        StorageQuotaMb => "storage_quota_mb",
        StorageQuotaUsedMb => "storage_quota_used_mb",
        HideFinalGrades => "hide_final_grades",
        OpenEnrollment => "open_enrollment",
        SelfEnrollment => "self_enrollment",
        TotalStudents => "total_students",
        SyllabusBody => "syllabus_body",
        NeedsGradingCount => "needs_grading_count",
        Teachers => "teachers",
        Sections => "sections",
    }
}

/// Fields shown when the caller does not choose any.
pub const DETAILED_FIELDS: &[CourseDisplayField] = &[
    CourseDisplayField::Id,
    CourseDisplayField::Name,
    CourseDisplayField::CourseCode,
    CourseDisplayField::WorkflowState,
    CourseDisplayField::StartAt,
    CourseDisplayField::EndAt,
    CourseDisplayField::EnrollmentTermId,
    CourseDisplayField::DefaultView,
];

/// Include value accepted by `GET /courses/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SingleCourseInclude {
    Course(CourseInclude),
    PerCourse(PerCourseInclude),
}

impl SingleCourseInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course(include) => include.as_str(),
            Self::PerCourse(include) => include.as_str(),
        }
    }
}

/// A typed value, or the raw JSON when Canvas sends a shape the model
/// does not know. Serializes back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose<T> {
    Known(T),
    Raw(serde_json::Value),
}

impl<T> Loose<T> {
    /// The typed value, if it decoded.
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Enrollment term embedded with `include[]=term`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

/// Module progress embedded with `include[]=course_progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    #[serde(default)]
    pub requirement_count: Option<u64>,
    #[serde(default)]
    pub requirement_completed_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_requirement_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarLink {
    /// ICS feed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ics: Option<String>,
}

/// A Canvas course as returned by `GET /courses/:id`.
///
/// Only `id` is required; Canvas omits most fields depending on the
/// caller's role and the requested includes. Fields without a typed slot
/// (e.g. `account`, `tabs`, `is_favorite`) are kept in `extra`, and typed
/// fields Canvas sends in another shape are kept raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<Loose<WorkflowState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_term_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sis_import_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_standard_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_passback_setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Loose<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Loose<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Loose<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_view: Option<Loose<DefaultView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_grading_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_students: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_quota_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_quota_used_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<Loose<Term>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_progress: Option<Loose<CourseProgress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Loose<CalendarLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_periods: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollments: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teachers: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Loose<HashMap<String, bool>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_assignment_group_weights: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public_to_auth_users: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_syllabus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_syllabus_to_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_final_grades: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_student_assignment_edits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_wiki_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_student_forum_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_enrollment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_enrollment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_enrollments_to_course_dates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_restricted_by_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint_restrictions: Option<Loose<HashMap<String, bool>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint_restrictions_by_object_type: Option<Loose<HashMap<String, HashMap<String, bool>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,

    /// Everything else Canvas returned.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Compact course record from the GraphQL `allCourses` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    #[serde(default)]
    pub course_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(EnrollmentState::InvitedOrPending.as_str(), "invited_or_pending");
        assert_eq!(CourseInclude::StorageQuotaUsedMb.to_string(), "storage_quota_used_mb");
        assert_eq!(CourseInclude::ALL.len(), 21);
        assert_eq!(CourseDisplayField::ALL.len(), 27);

        let parsed: EnrollmentType = serde_json::from_value(json!("ta")).unwrap();
        assert_eq!(parsed, EnrollmentType::Ta);
        assert!(serde_json::from_value::<EnrollmentType>(json!("dean")).is_err());
    }

    #[test]
    fn test_single_course_include_accepts_both_sets() {
        let includes: Vec<SingleCourseInclude> =
            serde_json::from_value(json!(["term", "permissions"])).unwrap();
        assert_eq!(
            includes,
            vec![
                SingleCourseInclude::Course(CourseInclude::Term),
                SingleCourseInclude::PerCourse(PerCourseInclude::Permissions),
            ]
        );
        assert_eq!(includes[1].as_str(), "permissions");
    }

    #[test]
    fn test_course_ignores_unknown_fields() {
        let course: Course = serde_json::from_value(json!({
            "id": 370663,
            "name": "InstructureCon 2012",
            "course_code": "INSTCON12",
            "workflow_state": "available",
            "start_at": "2012-06-01T00:00:00-06:00",
            "term": { "id": 1, "name": "Default Term" },
            "permissions": { "create_announcement": true },
            "some_future_field": { "nested": [1, 2, 3] }
        }))
        .unwrap();

        assert_eq!(course.id, 370663);
        assert_eq!(
            course.workflow_state.as_ref().and_then(Loose::known),
            Some(&WorkflowState::Available)
        );
        assert_eq!(
            course.start_at.as_ref().and_then(Loose::known).map(|d| d.to_rfc3339()),
            Some("2012-06-01T06:00:00+00:00".to_string())
        );
        assert_eq!(
            course.term.as_ref().and_then(Loose::known).and_then(|t| t.name.clone()),
            Some("Default Term".to_string())
        );
        assert_eq!(
            course
                .permissions
                .as_ref()
                .and_then(Loose::known)
                .and_then(|p| p.get("create_announcement").copied()),
            Some(true)
        );
        assert_eq!(course.extra["some_future_field"], json!({ "nested": [1, 2, 3] }));
    }

    #[test]
    fn test_course_tolerates_irregular_shapes() {
        let raw = json!({
            "id": 5,
            "name": "Bio",
            "workflow_state": "claimed",
            "term": { "id": 1, "name": null },
            "calendar": "not-an-object",
            "start_at": "sometime",
            "account": { "id": 1, "name": "Root" },
            "tabs": [{ "id": "home" }],
            "is_favorite": true
        });
        let course: Course = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(
            course.workflow_state,
            Some(Loose::Raw(json!("claimed")))
        );
        assert_eq!(
            course.term.as_ref().and_then(Loose::known).map(|t| t.id),
            Some(Some(1))
        );
        assert_eq!(course.extra["is_favorite"], json!(true));

        // Nothing Canvas sent is lost on the way back out.
        let mut expected = raw;
        expected["term"] = json!({ "id": 1 });
        assert_eq!(serde_json::to_value(&course).unwrap(), expected);
    }

    #[test]
    fn test_course_serialization_skips_absent_fields() {
        let course = Course {
            id: 1,
            name: Some("Biology".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&course).unwrap(),
            json!({ "id": 1, "name": "Biology" })
        );
    }

    #[test]
    fn test_course_summary_uses_camel_case() {
        let summary: CourseSummary = serde_json::from_value(json!({
            "id": "42",
            "courseCode": "BIO-101",
            "name": "Biology",
            "state": "available"
        }))
        .unwrap();
        assert_eq!(summary.course_code.as_deref(), Some("BIO-101"));
    }
}
