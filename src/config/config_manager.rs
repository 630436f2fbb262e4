// ==========================================
// 生产追踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 键值文件（默认 <config_dir>/production-tracking/config.json）
// 覆写: 环境变量 PRODUCTION_TRACKING_<KEY 大写>
// ==========================================

use crate::config::endpoint_config_trait::{EndpointConfigReader, Screen};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PRODUCTION_TRACKING_";

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {message}")]
    Io { path: String, message: String },

    #[error("配置文件格式错误: {path}: {message}")]
    Parse { path: String, message: String },

    #[error("未配置数据源地址: {screen}")]
    MissingEndpoint { screen: String },

    #[error("配置值无效: {key}={value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl ConfigManager {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("production-tracking").join("config.json"))
    }

    /// 从配置文件加载并应用环境变量覆写
    ///
    /// # 参数
    /// - path: 配置文件路径（None 时使用默认路径）
    ///
    /// 文件不存在时使用默认值
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut manager = match &path {
            Some(p) if p.exists() => Self::from_file(p)?,
            Some(p) => {
                tracing::info!(path = %p.display(), "配置文件不存在，使用默认配置");
                Self {
                    values: BTreeMap::new(),
                    path: Some(p.clone()),
                }
            }
            None => Self::default(),
        };
        manager.apply_env_overrides(std::env::vars());
        Ok(manager)
    }

    /// 读取配置文件（顶层为 JSON 对象，值统一按字符串保存）
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let parsed: BTreeMap<String, Value> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let values = parsed
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect::<BTreeMap<_, _>>();

        tracing::info!(path = %path.display(), keys = values.len(), "配置文件加载完成");
        Ok(Self {
            values,
            path: Some(path.to_path_buf()),
        })
    }

    /// 由键值对构造（不读文件、不读环境变量）
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            path: None,
        }
    }

    /// 应用环境变量覆写
    ///
    /// `PRODUCTION_TRACKING_REQUEST_TIMEOUT_MS=5000` → `request_timeout_ms`
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_ascii_lowercase();
            if !config_keys::ALL.contains(&key.as_str()) {
                continue;
            }
            tracing::debug!(key = %key, "环境变量覆写配置");
            self.values.insert(key, value);
            applied += 1;
        }
        applied
    }

    /// 配置文件路径
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 读取数值配置；格式错误时告警并回落到默认值
    fn get_number_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy,
    {
        match self.get_config_value(key) {
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                default
            }),
            None => default,
        }
    }

    /// 写入配置值（仅内存）
    pub fn set_config_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 保存到配置文件
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&self.values).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, body).map_err(io_err)
    }

    /// 生效配置快照（含默认值）
    pub fn get_config_snapshot(&self) -> Value {
        let endpoint = |screen: Screen| {
            self.endpoint_for(screen)
                .map(Value::String)
                .unwrap_or(Value::Null)
        };
        let mut snapshot = Map::new();
        let mut put = |key: &str, value: Value| {
            snapshot.insert(key.to_string(), value);
        };
        put(
            config_keys::ENDPOINT,
            self.get_config_value(config_keys::ENDPOINT)
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null),
        );
        for screen in Screen::ALL {
            put(screen.config_key(), endpoint(screen));
        }
        put(config_keys::REQUEST_TIMEOUT_MS, json!(self.request_timeout().as_millis() as u64));
        put(config_keys::ESTIMATE_TIMEOUT_MS, json!(self.estimate_timeout().as_millis() as u64));
        put(config_keys::DASHBOARD_DEBOUNCE_MS, json!(self.dashboard_debounce().as_millis() as u64));
        put(config_keys::REPORT_DEBOUNCE_MS, json!(self.report_debounce().as_millis() as u64));
        put(config_keys::MAX_SELECTABLE_LINES, json!(self.max_selectable_lines()));
        put(config_keys::MAX_REPORT_RANGE_DAYS, json!(self.max_report_range_days()));
        put(config_keys::OPTIMAL_RECORDS_PER_PAGE, json!(self.optimal_records_per_page()));
        put(config_keys::AUTOCOMPLETE_LIMIT, json!(self.autocomplete_limit()));
        put(config_keys::HANDOFF_TTL_SECS, json!(self.handoff_ttl().as_secs()));
        put(config_keys::LOCALE, json!(self.locale()));
        Value::Object(snapshot)
    }

    // ===== 同步读取（供 CLI 与 trait 实现复用） =====

    /// 屏幕对应的数据源地址（未单独配置时使用通用 endpoint）
    pub fn endpoint_for(&self, screen: Screen) -> Option<String> {
        self.get_config_value(screen.config_key())
            .or_else(|| self.get_config_value(config_keys::ENDPOINT))
            .map(|s| s.trim().to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.get_number_or_default(config_keys::REQUEST_TIMEOUT_MS, 30_000u64))
    }

    pub fn estimate_timeout(&self) -> Duration {
        Duration::from_millis(self.get_number_or_default(config_keys::ESTIMATE_TIMEOUT_MS, 10_000u64))
    }

    pub fn dashboard_debounce(&self) -> Duration {
        Duration::from_millis(self.get_number_or_default(config_keys::DASHBOARD_DEBOUNCE_MS, 300u64))
    }

    pub fn report_debounce(&self) -> Duration {
        Duration::from_millis(self.get_number_or_default(config_keys::REPORT_DEBOUNCE_MS, 500u64))
    }

    pub fn max_selectable_lines(&self) -> usize {
        self.get_number_or_default(config_keys::MAX_SELECTABLE_LINES, 3usize)
    }

    pub fn max_report_range_days(&self) -> i64 {
        self.get_number_or_default(config_keys::MAX_REPORT_RANGE_DAYS, 90i64)
    }

    pub fn optimal_records_per_page(&self) -> usize {
        self.get_number_or_default(config_keys::OPTIMAL_RECORDS_PER_PAGE, 25usize)
    }

    pub fn autocomplete_limit(&self) -> usize {
        self.get_number_or_default(config_keys::AUTOCOMPLETE_LIMIT, 50usize)
    }

    pub fn handoff_ttl(&self) -> Duration {
        Duration::from_secs(self.get_number_or_default(config_keys::HANDOFF_TTL_SECS, 300u64))
    }

    pub fn locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "en")
    }
}

// ==========================================
// EndpointConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EndpointConfigReader for ConfigManager {
    async fn get_endpoint(&self, screen: Screen) -> ConfigResult<String> {
        self.endpoint_for(screen)
            .ok_or_else(|| ConfigError::MissingEndpoint {
                screen: screen.to_string(),
            })
    }

    async fn get_request_timeout(&self) -> ConfigResult<Duration> {
        Ok(self.request_timeout())
    }

    async fn get_estimate_timeout(&self) -> ConfigResult<Duration> {
        Ok(self.estimate_timeout())
    }

    async fn get_dashboard_debounce(&self) -> ConfigResult<Duration> {
        Ok(self.dashboard_debounce())
    }

    async fn get_report_debounce(&self) -> ConfigResult<Duration> {
        Ok(self.report_debounce())
    }

    async fn get_max_selectable_lines(&self) -> ConfigResult<usize> {
        let value = self.max_selectable_lines();
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::MAX_SELECTABLE_LINES.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    async fn get_max_report_range_days(&self) -> ConfigResult<i64> {
        Ok(self.max_report_range_days())
    }

    async fn get_optimal_records_per_page(&self) -> ConfigResult<usize> {
        Ok(self.optimal_records_per_page())
    }

    async fn get_autocomplete_limit(&self) -> ConfigResult<usize> {
        Ok(self.autocomplete_limit())
    }

    async fn get_handoff_ttl(&self) -> ConfigResult<Duration> {
        Ok(self.handoff_ttl())
    }

    async fn get_locale(&self) -> ConfigResult<String> {
        Ok(self.locale())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 数据源地址
    pub const ENDPOINT: &str = "endpoint";
    pub const ENDPOINT_DASHBOARD: &str = "endpoint_dashboard";
    pub const ENDPOINT_PRODUCTION_INPUT: &str = "endpoint_production_input";
    pub const ENDPOINT_DANDORI: &str = "endpoint_dandori";
    pub const ENDPOINT_BREAKDOWN: &str = "endpoint_breakdown";
    pub const ENDPOINT_REPORT_EXPORT: &str = "endpoint_report_export";

    // 超时与防抖
    pub const REQUEST_TIMEOUT_MS: &str = "request_timeout_ms";
    pub const ESTIMATE_TIMEOUT_MS: &str = "estimate_timeout_ms";
    pub const DASHBOARD_DEBOUNCE_MS: &str = "dashboard_debounce_ms";
    pub const REPORT_DEBOUNCE_MS: &str = "report_debounce_ms";

    // 报表
    pub const MAX_SELECTABLE_LINES: &str = "max_selectable_lines";
    pub const MAX_REPORT_RANGE_DAYS: &str = "max_report_range_days";
    pub const OPTIMAL_RECORDS_PER_PAGE: &str = "optimal_records_per_page";

    // 其他
    pub const AUTOCOMPLETE_LIMIT: &str = "autocomplete_limit";
    pub const HANDOFF_TTL_SECS: &str = "handoff_ttl_secs";
    pub const LOCALE: &str = "locale";

    pub const ALL: &[&str] = &[
        ENDPOINT,
        ENDPOINT_DASHBOARD,
        ENDPOINT_PRODUCTION_INPUT,
        ENDPOINT_DANDORI,
        ENDPOINT_BREAKDOWN,
        ENDPOINT_REPORT_EXPORT,
        REQUEST_TIMEOUT_MS,
        ESTIMATE_TIMEOUT_MS,
        DASHBOARD_DEBOUNCE_MS,
        REPORT_DEBOUNCE_MS,
        MAX_SELECTABLE_LINES,
        MAX_REPORT_RANGE_DAYS,
        OPTIMAL_RECORDS_PER_PAGE,
        AUTOCOMPLETE_LIMIT,
        HANDOFF_TTL_SECS,
        LOCALE,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.estimate_timeout(), Duration::from_secs(10));
        assert_eq!(config.report_debounce(), Duration::from_millis(500));
        assert_eq!(config.max_selectable_lines(), 3);
        assert_eq!(config.max_report_range_days(), 90);
        assert_eq!(config.optimal_records_per_page(), 25);
        assert_eq!(config.autocomplete_limit(), 50);
        assert_eq!(config.locale(), "en");
        assert_eq!(config.endpoint_for(Screen::Dashboard), None);
    }

    #[test]
    fn test_screen_endpoint_falls_back_to_common() {
        let config = ConfigManager::from_pairs([
            ("endpoint", "https://example.test/common"),
            ("endpoint_breakdown", "https://example.test/breakdown"),
        ]);
        assert_eq!(
            config.endpoint_for(Screen::Breakdown).as_deref(),
            Some("https://example.test/breakdown")
        );
        assert_eq!(
            config.endpoint_for(Screen::Dandori).as_deref(),
            Some("https://example.test/common")
        );
    }

    #[test]
    fn test_invalid_number_uses_default() {
        let config = ConfigManager::from_pairs([("request_timeout_ms", "abc")]);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides_only_known_keys() {
        let mut config = ConfigManager::default();
        let applied = config.apply_env_overrides(vec![
            ("PRODUCTION_TRACKING_MAX_SELECTABLE_LINES".to_string(), "2".to_string()),
            ("PRODUCTION_TRACKING_UNKNOWN".to_string(), "x".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ]);
        assert_eq!(applied, 1);
        assert_eq!(config.max_selectable_lines(), 2);
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_error() {
        let config = ConfigManager::default();
        let err = config.get_endpoint(Screen::ReportExport).await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint { .. }));
    }
}
