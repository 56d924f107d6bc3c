//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_unisystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum UniSystemError {
            $($variant(String),)*
        }

        impl UniSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(UniSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(UniSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(UniSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl UniSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        UniSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_unisystem_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Scheduling("E014", "Scheduling Error"),
    Exhausted("E015", "Resource Exhausted"),
    InvalidState("E016", "Invalid State"),
}

impl UniSystemError {
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

    /// 是否为唯一约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, UniSystemError::Conflict(_))
    }

    /// 名额或使用次数已用尽
    pub fn is_exhausted(&self) -> bool {
        matches!(self, UniSystemError::Exhausted(_))
    }

    /// 记录已不处于操作要求的状态
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, UniSystemError::InvalidState(_))
    }

    /// 将数据库错误转换为业务错误，唯一约束冲突单独识别
    pub fn from_db(context: &str, err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                UniSystemError::Conflict(format!("{context}: {detail}"))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                UniSystemError::Validation(format!("{context}: {detail}"))
            }
            _ => UniSystemError::DatabaseOperation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for UniSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UniSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for UniSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        UniSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for UniSystemError {
    fn from(err: std::io::Error) -> Self {
        UniSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for UniSystemError {
    fn from(err: serde_json::Error) -> Self {
        UniSystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for UniSystemError {
    fn from(err: chrono::ParseError) -> Self {
        UniSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UniSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(UniSystemError::cache_connection("test").code(), "E001");
        assert_eq!(UniSystemError::database_config("test").code(), "E003");
        assert_eq!(UniSystemError::validation("test").code(), "E007");
        assert_eq!(UniSystemError::conflict("test").code(), "E010");
        assert_eq!(UniSystemError::scheduling("test").code(), "E014");
        assert_eq!(UniSystemError::exhausted("test").code(), "E015");
        assert_eq!(UniSystemError::invalid_state("test").code(), "E016");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            UniSystemError::conflict("test").error_type(),
            "Resource Conflict"
        );
        assert_eq!(
            UniSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = UniSystemError::not_found("Course 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Course 42"));
    }

    #[test]
    fn test_plain_db_error_is_not_conflict() {
        let err = UniSystemError::from_db(
            "create enrollment",
            sea_orm::DbErr::Custom("connection reset".to_string()),
        );
        assert!(!err.is_conflict());
        assert_eq!(err.code(), "E005");
        assert!(err.message().starts_with("create enrollment"));
    }
}
