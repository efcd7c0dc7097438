use serde::{Deserialize, Serialize};

use crate::errors::{Result, SmartSlugError};

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "SMARTSLUG";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML + 环境变量加载）
///
/// - slug: slug 语法与长度预算
/// - ai: 模型、超时、提示词模板
/// - cache: 单飞缓存 TTL 与容量
/// - collision: 冲突重试预算
/// - pattern: 用户习惯学习采样参数
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub slug: SlugConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub collision: CollisionConfig,
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// 示例：SMARTSLUG__AI__TIMEOUT_SECS=5
    ///
    /// Errors are reported on stderr and fall back to defaults, since logging
    /// is not initialized yet at this point.
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e.format_simple());
                let mut config = Self::default();
                config.ai.apply_env_fallback();
                config
            }
        }
    }

    /// Strict variant of [`StaticConfig::load`] that surfaces errors
    pub fn try_load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: StaticConfig = settings.try_deserialize()?;
        config.ai.apply_env_fallback();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.slug.max_length < 8 {
            return Err(SmartSlugError::config(format!(
                "slug.max_length must be at least 8, got {}",
                self.slug.max_length
            )));
        }
        if self.slug.max_segments == 0 || self.slug.max_words_per_segment == 0 {
            return Err(SmartSlugError::config(
                "slug.max_segments and slug.max_words_per_segment must be positive",
            ));
        }
        if self.ai.timeout_secs == 0 {
            return Err(SmartSlugError::config("ai.timeout_secs must be positive"));
        }
        if self.ai.max_candidates == 0 {
            return Err(SmartSlugError::config("ai.max_candidates must be positive"));
        }
        if self.pattern.min_samples == 0 || self.pattern.sample_size < self.pattern.min_samples {
            return Err(SmartSlugError::config(
                "pattern.sample_size must be >= pattern.min_samples > 0",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| SmartSlugError::config(format!("Failed to create dir: {}", e)))?;
        }

        std::fs::write(path, content)
            .map_err(|e| SmartSlugError::config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Slug 语法配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlugConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
    #[serde(default = "default_max_words_per_segment")]
    pub max_words_per_segment: usize,
}

/// AI 生成配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    #[serde(default = "default_ai_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ai_api_url")]
    pub api_url: String,
    /// Falls back to `ANTHROPIC_API_KEY` when unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_ai_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_ai_max_candidates")]
    pub max_candidates: usize,
    /// Overrides the built-in prompt. Placeholders: `{url}`, `{count}`,
    /// `{max_length}`, `{signals}`, `{pattern}`, `{preferences}`, `{style}`
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub models: ModelsConfig,
}

impl AiConfig {
    fn apply_env_fallback(&mut self) {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
    }

    /// AI is usable only when enabled and a key is present
    pub fn is_available(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// 各档位对应的模型 ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsConfig {
    #[serde(default = "default_haiku_model")]
    pub haiku: String,
    #[serde(default = "default_sonnet_model")]
    pub sonnet: String,
    #[serde(default = "default_opus_model")]
    pub opus: String,
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// 0 表示不限制容量
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

/// 冲突解决配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollisionConfig {
    #[serde(default = "default_collision_attempts")]
    pub max_attempts: u32,
}

/// 用户习惯学习配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    #[serde(default = "default_pattern_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_pattern_min_samples")]
    pub min_samples: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_max_length() -> usize {
    50
}

fn default_max_segments() -> usize {
    5
}

fn default_max_words_per_segment() -> usize {
    4
}

fn default_ai_enabled() -> bool {
    true
}

fn default_ai_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    8
}

fn default_ai_max_tokens() -> u32 {
    512
}

fn default_ai_max_candidates() -> usize {
    3
}

fn default_haiku_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_sonnet_model() -> String {
    "claude-sonnet-4-0".to_string()
}

fn default_opus_model() -> String {
    "claude-opus-4-0".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_capacity() -> u64 {
    10000
}

fn default_collision_attempts() -> u32 {
    5
}

fn default_pattern_sample_size() -> usize {
    20
}

fn default_pattern_min_samples() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            max_segments: default_max_segments(),
            max_words_per_segment: default_max_words_per_segment(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_ai_enabled(),
            api_url: default_ai_api_url(),
            api_key: None,
            timeout_secs: default_ai_timeout_secs(),
            max_tokens: default_ai_max_tokens(),
            max_candidates: default_ai_max_candidates(),
            prompt_template: None,
            models: ModelsConfig::default(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            haiku: default_haiku_model(),
            sonnet: default_sonnet_model(),
            opus: default_opus_model(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_collision_attempts(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            sample_size: default_pattern_sample_size(),
            min_samples: default_pattern_min_samples(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StaticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.slug.max_length, 50);
        assert_eq!(config.collision.max_attempts, 5);
        assert_eq!(config.pattern.min_samples, 3);
    }

    #[test]
    fn test_validate_rejects_tiny_budget() {
        let mut config = StaticConfig::default();
        config.slug.max_length = 4;
        assert!(matches!(
            config.validate(),
            Err(SmartSlugError::Config(_))
        ));
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[slug]"));
        assert!(sample.contains("max_length = 50"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, StaticConfig::default());
    }

    #[test]
    fn test_ai_unavailable_without_key() {
        let mut ai = AiConfig::default();
        ai.api_key = None;
        assert!(!ai.is_available());
        ai.api_key = Some("sk-test".into());
        assert!(ai.is_available());
        ai.enabled = false;
        assert!(!ai.is_available());
    }
}
