//! Field selection and text rendering for course listings.

use serde_json::Value;

use crate::domains::canvas::models::CourseDisplayField;

/// Listings up to this size are rendered in full.
const FULL_LISTING_MAX: usize = 10;

/// Courses rendered in detail when the listing is larger.
const DETAILED_COUNT: usize = 5;

/// Position of the last course given a one-line summary.
const SUMMARY_LAST_POSITION: usize = 25;

/// Keep only `fields` of each course record.
///
/// An empty selection keeps every field. Selected fields missing from a
/// record are reported as `null` so every row has the same shape.
pub fn select_fields(courses: Vec<Value>, fields: &[CourseDisplayField]) -> Vec<Value> {
    if fields.is_empty() {
        return courses;
    }

    courses
        .into_iter()
        .map(|course| {
            let selected: serde_json::Map<String, Value> = fields
                .iter()
                .map(|field| {
                    let value = course.get(field.as_str()).cloned().unwrap_or(Value::Null);
                    (field.as_str().to_string(), value)
                })
                .collect();
            Value::Object(selected)
        })
        .collect()
}

/// Render a course listing for the assistant.
pub fn format_course_listing(
    courses: &[Value],
    criteria: &Value,
    fields: &[CourseDisplayField],
    retrieval: &str,
    per_page: usize,
) -> String {
    let mut out = format!("Canvas Courses: {} courses found\n\n", courses.len());

    if criteria.as_object().is_some_and(|c| !c.is_empty()) {
        out.push_str(&format!("Search Criteria:\n{}\n\n", pretty(criteria)));
    }

    if fields.is_empty() {
        out.push_str("Display Fields: All available fields\n\n");
    } else {
        let names: Vec<&str> = fields.iter().map(CourseDisplayField::as_str).collect();
        out.push_str(&format!(
            "Display Fields ({}):\n  {}\n\n",
            names.len(),
            names.join(", ")
        ));
    }

    out.push_str(&format!("Retrieval Info: {retrieval}\nPer page: {per_page}\n\n"));

    if courses.is_empty() {
        out.push_str("No courses found matching the specified criteria.\n\n");
        out.push_str("Suggestions:\n");
        out.push_str("  - Try without filters to see all courses\n");
        out.push_str("  - Check if enrollment_state='active' excludes completed courses\n");
        out.push_str("  - Verify your Canvas API permissions\n");
        return out;
    }

    if courses.len() <= FULL_LISTING_MAX {
        out.push_str("Course Details:\n");
        out.push_str(&pretty(&Value::from(courses.to_vec())));
        return out;
    }

    out.push_str(&format!("Detailed View (first {DETAILED_COUNT} courses):\n"));
    out.push_str(&pretty(&Value::from(courses[..DETAILED_COUNT].to_vec())));
    out.push_str("\n\n");

    out.push_str(&format!(
        "Summary of Remaining {} Courses:\n",
        courses.len() - DETAILED_COUNT
    ));
    for (position, course) in courses
        .iter()
        .enumerate()
        .skip(DETAILED_COUNT)
        .take(SUMMARY_LAST_POSITION - DETAILED_COUNT)
        .map(|(i, c)| (i + 1, c))
    {
        out.push_str(&format!(
            "  {}. {} ({}) [ID: {}]\n",
            position,
            text_field(course, "name").unwrap_or_else(|| "Unnamed Course".into()),
            text_field(course, "course_code").unwrap_or_else(|| "No Code".into()),
            text_field(course, "id").unwrap_or_else(|| "Unknown".into()),
        ));
    }
    if courses.len() > SUMMARY_LAST_POSITION {
        out.push_str(&format!(
            "  ... and {} more courses\n",
            courses.len() - SUMMARY_LAST_POSITION
        ));
    }

    out
}

fn text_field(course: &Value, field: &str) -> Option<String> {
    match course.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
