//! 数据模型定义
//!
//! 业务实体、请求与响应结构，响应结构同时导出 TypeScript 类型供前端使用。

pub mod activities;
pub mod common;
pub mod grades;
pub mod groups;
pub mod profiles;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use crate::errors::GamsError;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1999
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InternalServerError = 1006,

    // 活动相关 2000-2999
    ActivityNotFound = 2001,
    ActivityCreationFailed = 2002,
    ActivityPermissionDenied = 2003,

    // 小组相关 3000-3999
    GroupNotFound = 3001,
    GroupMemberConflict = 3002,
    GroupCreationFailed = 3003,

    // 评分相关 4000-4999
    GradesLocked = 4001,
    GraderNotAssigned = 4002,

    // 用户资料 5000-5999
    ProfileNotFound = 5001,
}

impl ErrorCode {
    /// 根据错误类型选择默认错误码
    pub fn for_error(err: &GamsError) -> Self {
        match err {
            GamsError::Validation(_) => ErrorCode::ValidationFailed,
            GamsError::Conflict(_) => ErrorCode::Conflict,
            GamsError::NotFound(_) => ErrorCode::NotFound,
            GamsError::Authentication(_) => ErrorCode::Unauthorized,
            GamsError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}
