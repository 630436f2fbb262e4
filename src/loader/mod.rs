// ==========================================
// 生产追踪系统 - 数据加载层
// ==========================================
// 职责: 远程表格 API 的传输与最小形态校验
// 红线: 不做业务计算，不缓存数据
// ==========================================

pub mod error;
pub mod http_source;
pub mod record_loader;
pub mod source;

pub use error::{LoadError, LoadResult};
pub use http_source::HttpRecordSource;
pub use record_loader::{actions, RecordLoader};
pub use source::{GetRequest, RecordSource};
