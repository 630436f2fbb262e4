// ==========================================
// 生产追踪系统 - 配置层
// ==========================================
// 职责: 数据源地址、超时、防抖与报表限制等配置
// 存储: JSON 键值文件 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod endpoint_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use endpoint_config_trait::{EndpointConfigReader, Screen};
