pub mod content;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod users;
