// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use production_tracking::config::{ConfigError, ConfigResult, EndpointConfigReader, Screen};
use std::collections::HashMap;
use std::time::Duration;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub endpoints: HashMap<Screen, String>,
    pub request_timeout: Duration,
    pub estimate_timeout: Duration,
    pub dashboard_debounce: Duration,
    pub report_debounce: Duration,
    pub max_selectable_lines: usize,
    pub max_report_range_days: i64,
    pub optimal_records_per_page: usize,
    pub autocomplete_limit: usize,
    pub handoff_ttl: Duration,
    pub locale: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            request_timeout: Duration::from_secs(5),
            estimate_timeout: Duration::from_secs(2),
            dashboard_debounce: Duration::from_millis(10),
            report_debounce: Duration::from_millis(10),
            max_selectable_lines: 3,
            max_report_range_days: 90,
            optimal_records_per_page: 25,
            autocomplete_limit: 50,
            handoff_ttl: Duration::from_secs(300),
            locale: "en".to_string(),
        }
    }
}

impl MockConfig {
    /// 所有屏幕使用同一地址
    pub fn with_endpoint(url: &str) -> Self {
        let mut config = Self::default();
        for screen in Screen::ALL {
            config.endpoints.insert(screen, url.to_string());
        }
        config
    }
}

#[async_trait]
impl EndpointConfigReader for MockConfig {
    async fn get_endpoint(&self, screen: Screen) -> ConfigResult<String> {
        self.endpoints
            .get(&screen)
            .cloned()
            .ok_or_else(|| ConfigError::MissingEndpoint {
                screen: screen.to_string(),
            })
    }

    async fn get_request_timeout(&self) -> ConfigResult<Duration> {
        Ok(self.request_timeout)
    }

    async fn get_estimate_timeout(&self) -> ConfigResult<Duration> {
        Ok(self.estimate_timeout)
    }

    async fn get_dashboard_debounce(&self) -> ConfigResult<Duration> {
        Ok(self.dashboard_debounce)
    }

    async fn get_report_debounce(&self) -> ConfigResult<Duration> {
        Ok(self.report_debounce)
    }

    async fn get_max_selectable_lines(&self) -> ConfigResult<usize> {
        Ok(self.max_selectable_lines)
    }

    async fn get_max_report_range_days(&self) -> ConfigResult<i64> {
        Ok(self.max_report_range_days)
    }

    async fn get_optimal_records_per_page(&self) -> ConfigResult<usize> {
        Ok(self.optimal_records_per_page)
    }

    async fn get_autocomplete_limit(&self) -> ConfigResult<usize> {
        Ok(self.autocomplete_limit)
    }

    async fn get_handoff_ttl(&self) -> ConfigResult<Duration> {
        Ok(self.handoff_ttl)
    }

    async fn get_locale(&self) -> ConfigResult<String> {
        Ok(self.locale.clone())
    }
}
