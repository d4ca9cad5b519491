use std::fmt;

#[derive(Debug, Clone)]
pub enum BlogstatsError {
    CacheConnection(String),
    CacheOperation(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    DataInconsistency(String),
    Serialization(String),
}

impl BlogstatsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BlogstatsError::CacheConnection(_) => "E001",
            BlogstatsError::CacheOperation(_) => "E002",
            BlogstatsError::DatabaseOperation(_) => "E003",
            BlogstatsError::Validation(_) => "E004",
            BlogstatsError::NotFound(_) => "E005",
            BlogstatsError::DataInconsistency(_) => "E006",
            BlogstatsError::Serialization(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BlogstatsError::CacheConnection(_) => "Cache Connection Error",
            BlogstatsError::CacheOperation(_) => "Cache Operation Error",
            BlogstatsError::DatabaseOperation(_) => "Database Operation Error",
            BlogstatsError::Validation(_) => "Validation Error",
            BlogstatsError::NotFound(_) => "Resource Not Found",
            BlogstatsError::DataInconsistency(_) => "Data Inconsistency",
            BlogstatsError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BlogstatsError::CacheConnection(msg) => msg,
            BlogstatsError::CacheOperation(msg) => msg,
            BlogstatsError::DatabaseOperation(msg) => msg,
            BlogstatsError::Validation(msg) => msg,
            BlogstatsError::NotFound(msg) => msg,
            BlogstatsError::DataInconsistency(msg) => msg,
            BlogstatsError::Serialization(msg) => msg,
        }
    }

    /// 是否属于瞬态存储错误（事件路径上可吞掉并记录日志）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BlogstatsError::CacheConnection(_)
                | BlogstatsError::CacheOperation(_)
                | BlogstatsError::DatabaseOperation(_)
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BlogstatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BlogstatsError {}

// 便捷的构造函数
impl BlogstatsError {
    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::CacheConnection(msg.into())
    }

    pub fn cache_operation<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::CacheOperation(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::NotFound(msg.into())
    }

    pub fn data_inconsistency<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::DataInconsistency(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BlogstatsError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<redis::RedisError> for BlogstatsError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            BlogstatsError::CacheConnection(err.to_string())
        } else {
            BlogstatsError::CacheOperation(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BlogstatsError {
    fn from(err: serde_json::Error) -> Self {
        BlogstatsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BlogstatsError>;
