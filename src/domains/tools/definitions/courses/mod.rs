//! Canvas course tools.

mod display;
mod get_all_courses;
mod get_course_by_id;
mod get_course_summaries;

pub use get_all_courses::{CourseListQuery, GetAllCoursesParams, GetAllCoursesTool};
pub use get_course_by_id::{CourseLookup, GetCourseByIdParams, GetCourseByIdTool};
pub use get_course_summaries::{GetCourseSummariesParams, GetCourseSummariesTool};
