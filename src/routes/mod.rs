pub mod health;

pub mod teacher;

pub mod student;

pub use health::configure_health_routes;
pub use student::configure_student_routes;
pub use teacher::configure_teacher_routes;
