// ==========================================
// 集成测试辅助模块
// ==========================================
// 每个测试文件按需使用其中一部分
// ==========================================

#![allow(dead_code, unused_imports)]

pub mod fake_source;
pub mod mock_config;
pub mod mock_server;
pub mod test_data_builder;

pub use fake_source::{FakeSource, RecordedRequest};
pub use mock_config::MockConfig;
pub use mock_server::MockSheetServer;
pub use test_data_builder::{dies_json, dropdowns_json, ProductionRecordBuilder};

use chrono::{NaiveDate, NaiveTime};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("测试日期格式错误")
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("测试时刻格式错误")
}
