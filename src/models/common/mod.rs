pub mod health;
pub mod pagination;
pub mod response;

pub use health::HealthResponse;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
