//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态映射。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gams_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GamsError {
            $($variant(String),)*
        }

        impl GamsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GamsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GamsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GamsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GamsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GamsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gams_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    Conflict("E006", "Conflict Error"),
    NotFound("E007", "Resource Not Found"),
    Serialization("E008", "Serialization Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
}

impl GamsError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            GamsError::Validation(_) => StatusCode::BAD_REQUEST,
            GamsError::Conflict(_) => StatusCode::CONFLICT,
            GamsError::NotFound(_) => StatusCode::NOT_FOUND,
            GamsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GamsError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为服务端故障（需要记录 error 日志）
    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GamsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GamsError {
    fn from(err: sea_orm::DbErr) -> Self {
        GamsError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GamsError {
    fn from(err: serde_json::Error) -> Self {
        GamsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GamsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GamsError::cache_connection("test").code(), "E001");
        assert_eq!(GamsError::database_config("test").code(), "E002");
        assert_eq!(GamsError::validation("test").code(), "E005");
        assert_eq!(GamsError::conflict("test").code(), "E006");
        assert_eq!(GamsError::authentication("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GamsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(GamsError::validation("test").error_type(), "Validation Error");
        assert_eq!(GamsError::conflict("test").error_type(), "Conflict Error");
    }

    #[test]
    fn test_error_message() {
        let err = GamsError::conflict("Alice Smith already grouped");
        assert_eq!(err.message(), "Alice Smith already grouped");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GamsError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GamsError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(GamsError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GamsError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GamsError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GamsError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(GamsError::database_connection("x").is_server_fault());
        assert!(!GamsError::not_found("x").is_server_fault());
    }

    #[test]
    fn test_format_simple() {
        let err = GamsError::validation("members must not be empty");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("members must not be empty"));
    }

    #[test]
    fn test_from_db_err() {
        let err: GamsError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E004");
        assert!(err.message().contains("boom"));
    }
}
