use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartSlugError {
    InvalidUrl(String),
    SlugExhausted(String),
    ExistenceCheck(String),
    Generation(String),
    Config(String),
    Serialization(String),
}

impl SmartSlugError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SmartSlugError::InvalidUrl(_) => "E001",
            SmartSlugError::SlugExhausted(_) => "E002",
            SmartSlugError::ExistenceCheck(_) => "E003",
            SmartSlugError::Generation(_) => "E004",
            SmartSlugError::Config(_) => "E005",
            SmartSlugError::Serialization(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SmartSlugError::InvalidUrl(_) => "Invalid URL",
            SmartSlugError::SlugExhausted(_) => "Slug Exhausted",
            SmartSlugError::ExistenceCheck(_) => "Existence Check Error",
            SmartSlugError::Generation(_) => "Generation Error",
            SmartSlugError::Config(_) => "Configuration Error",
            SmartSlugError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SmartSlugError::InvalidUrl(msg) => msg,
            SmartSlugError::SlugExhausted(msg) => msg,
            SmartSlugError::ExistenceCheck(msg) => msg,
            SmartSlugError::Generation(msg) => msg,
            SmartSlugError::Config(msg) => msg,
            SmartSlugError::Serialization(msg) => msg,
        }
    }

    /// Whether the caller may simply retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SmartSlugError::Generation(_) | SmartSlugError::ExistenceCheck(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SmartSlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SmartSlugError {}

// 便捷的构造函数
impl SmartSlugError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::InvalidUrl(msg.into())
    }

    pub fn slug_exhausted<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::SlugExhausted(msg.into())
    }

    pub fn existence_check<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::ExistenceCheck(msg.into())
    }

    pub fn generation<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::Generation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::Config(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SmartSlugError::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for SmartSlugError {
    fn from(err: serde_json::Error) -> Self {
        SmartSlugError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for SmartSlugError {
    fn from(err: url::ParseError) -> Self {
        SmartSlugError::InvalidUrl(err.to_string())
    }
}

impl From<config::ConfigError> for SmartSlugError {
    fn from(err: config::ConfigError) -> Self {
        SmartSlugError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SmartSlugError {
    fn from(err: toml::ser::Error) -> Self {
        SmartSlugError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SmartSlugError>;
