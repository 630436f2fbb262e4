// ==========================================
// BreakdownApi 集成测试
// ==========================================
// 测试目标: 模具主数据与单号计数加载、模具检索与自动带出、
// 时长预览、提交校验与提交后刷新单号
// ==========================================

mod helpers;

use helpers::{date, dies_json, time, FakeSource};
use production_tracking::api::{ApiError, BreakdownApi, BreakdownTimes, ValidationRule};
use production_tracking::domain::BreakdownEntry;
use production_tracking::loader::{actions, LoadError};
use production_tracking::BreakdownSeverity;
use serde_json::json;
use std::sync::Arc;

fn entry() -> BreakdownEntry {
    BreakdownEntry {
        no_lkd_number: "005".to_string(),
        id_dies: "d-002".to_string(),
        nama_dies: "Bracket Bend".to_string(),
        id_proses: "20".to_string(),
        nama_proses: "Bend".to_string(),
        id_cust: "C1".to_string(),
        tanggal_breakdown: date("2026-03-10"),
        jam_breakdown: Some(time("07:45")),
        tanggal_mulai_perbaikan: date("2026-03-10"),
        jam_mulai_perbaikan: time("08:00"),
        tanggal_selesai_perbaikan: date("2026-03-10"),
        jam_selesai_perbaikan: time("10:30"),
        problem_dies: "Punch broken".to_string(),
        penyebab_breakdown: "Wear".to_string(),
        tindakan_perbaikan: "Replace punch".to_string(),
        pic_maintenance: "Rudi".to_string(),
    }
}

fn counter_json(last: &str, suggested: &str) -> serde_json::Value {
    json!({ "status": "success", "lastNumber": last, "suggestedNumber": suggested })
}

async fn ready_api(source: &Arc<FakeSource>, limit: usize) -> BreakdownApi {
    source.respond(actions::GET_MASTER_DIES, dies_json());
    let mut api = BreakdownApi::new(source.loader(), limit);
    api.load_master_dies().await.expect("加载模具主数据失败");
    api
}

fn rule_of(err: ApiError) -> (&'static str, ValidationRule) {
    match err {
        ApiError::Validation { field, rule } => (field, rule),
        other => panic!("期望校验错误，实际: {}", other),
    }
}

#[tokio::test]
async fn test_dies_search_and_limit() {
    let source = FakeSource::new();
    let api = ready_api(&source, 2).await;

    assert_eq!(api.search_dies("").expect("检索失败").len(), 2);
    let found = api.search_dies("cover").expect("检索失败");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id_dies, "X-100");
    assert_eq!(api.search_dies("C1").expect("检索失败").len(), 2);

    let request = source.last_get(actions::GET_MASTER_DIES).expect("未发请求");
    assert!(request.cache_bust);
}

#[tokio::test]
async fn test_exact_input_auto_fills() {
    let source = FakeSource::new();
    let mut api = ready_api(&source, 50).await;

    let selected = api.on_dies_input(" d-002 ").expect("输入处理失败").cloned();
    let selected = selected.expect("应完全匹配");
    assert_eq!(selected.nama_proses, "Bend");
    assert_eq!(api.session().selected.as_ref(), Some(&selected));

    assert!(api.on_dies_input("D-00").expect("输入处理失败").is_none());
    assert!(api.session().selected.is_none());
}

#[tokio::test]
async fn test_empty_or_failed_master_dies() {
    let source = FakeSource::new();
    source
        .respond(actions::GET_MASTER_DIES, json!({ "status": "success", "data": [] }))
        .respond(
            actions::GET_MASTER_DIES,
            json!({ "status": "error", "message": "Sheet locked" }),
        );
    let mut api = BreakdownApi::new(source.loader(), 50);

    let err = api.load_master_dies().await.unwrap_err();
    assert!(matches!(err, ApiError::Load(LoadError::EmptyCollection { .. })));
    assert!(!api.is_ready());

    let err = api.load_master_dies().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Load(LoadError::Api { ref message, .. }) if message == "Sheet locked"
    ));
    assert!(matches!(api.search_dies(""), Err(ApiError::NotReady(_))));
}

#[tokio::test]
async fn test_lkd_counter_and_preview() {
    let source = FakeSource::new();
    let mut api = ready_api(&source, 50).await;
    source
        .respond(actions::GET_LAST_NO_LKD, counter_json("004", "005"))
        .fail(
            actions::GET_LAST_NO_LKD,
            LoadError::Timeout {
                action: actions::GET_LAST_NO_LKD.to_string(),
                timeout_ms: 30_000,
            },
        );

    let counter = api.load_lkd_counter().await.expect("加载单号失败");
    assert_eq!(counter.last_number.as_deref(), Some("004"));
    assert_eq!(counter.suggested_number, "005");

    assert!(api.load_lkd_counter().await.is_err());
    assert_eq!(api.session().counter.suggested_number, "001");

    assert_eq!(
        api.lkd_preview(Some("5"), Some(date("2026-03-10"))),
        "/005/LKD/MTC/KMI/III/26"
    );
    assert_eq!(api.lkd_preview(None, None), "/___/LKD/MTC/KMI/—/—");
}

#[tokio::test]
async fn test_duration_preview_severity() {
    let source = FakeSource::new();
    let api = BreakdownApi::new(source.loader(), 50);

    let times = BreakdownTimes {
        breakdown_date: Some(date("2026-03-10")),
        breakdown_time: Some(time("07:45")),
        repair_start_date: Some(date("2026-03-10")),
        repair_start_time: Some(time("08:00")),
        repair_end_date: Some(date("2026-03-10")),
        repair_end_time: Some(time("10:30")),
    };
    let durations = api.duration_preview(&times);
    let repair = durations.repair.expect("缺少维修时长");
    let downtime = durations.downtime.expect("缺少停机时长");
    assert_eq!(repair.hours, 2.5);
    assert_eq!(repair.severity, BreakdownSeverity::Medium);
    assert_eq!(downtime.hours, 2.75);

    let short = BreakdownTimes {
        repair_end_time: Some(time("08:30")),
        breakdown_time: None,
        ..times
    };
    let durations = api.duration_preview(&short);
    assert_eq!(durations.repair.map(|d| d.severity), Some(BreakdownSeverity::Light));
    assert!(durations.downtime.is_none());

    let long = BreakdownTimes {
        repair_end_date: Some(date("2026-03-11")),
        ..times
    };
    let durations = api.duration_preview(&long);
    assert_eq!(durations.repair.map(|d| d.severity), Some(BreakdownSeverity::Heavy));
}

#[tokio::test]
async fn test_submit_before_master_loaded() {
    let source = FakeSource::new();
    let mut api = BreakdownApi::new(source.loader(), 50);
    assert!(matches!(api.submit(&entry()).await, Err(ApiError::NotReady(_))));
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_entry_never_posts() {
    let source = FakeSource::new();
    let mut api = ready_api(&source, 50).await;

    let (field, rule) = rule_of(
        api.submit(&BreakdownEntry { id_dies: "Z-999".to_string(), ..entry() })
            .await
            .unwrap_err(),
    );
    assert_eq!((field, rule), ("id_dies", ValidationRule::NotInList));

    let (field, rule) = rule_of(
        api.submit(&BreakdownEntry { id_dies: " ".to_string(), ..entry() })
            .await
            .unwrap_err(),
    );
    assert_eq!((field, rule), ("id_dies", ValidationRule::Required));

    let (field, rule) = rule_of(
        api.submit(&BreakdownEntry { no_lkd_number: String::new(), ..entry() })
            .await
            .unwrap_err(),
    );
    assert_eq!((field, rule), ("no_lkd_number", ValidationRule::Required));

    let (field, rule) = rule_of(
        api.submit(&BreakdownEntry { jam_selesai_perbaikan: time("08:00"), ..entry() })
            .await
            .unwrap_err(),
    );
    assert_eq!((field, rule), ("repair_end", ValidationRule::EndNotAfterStart));

    assert_eq!(source.count(actions::ADD_BREAKDOWN), 0);
}

#[tokio::test]
async fn test_submit_posts_form_and_refreshes_counter() {
    let source = FakeSource::new();
    let mut api = ready_api(&source, 50).await;
    source
        .respond(actions::GET_LAST_NO_LKD, counter_json("005", "006"))
        .respond(
            actions::ADD_BREAKDOWN,
            json!({
                "status": "success",
                "data": {
                    "no_lkd": "005/LKD/MTC/KMI/III/26",
                    "status_breakdown": "MEDIUM",
                    "repair_time": 2.5,
                    "total_downtime": 2.75
                }
            }),
        );
    api.on_dies_input("D-002").expect("输入处理失败");

    let receipt = api.submit(&entry()).await.expect("提交失败");
    assert_eq!(receipt.no_lkd, "005/LKD/MTC/KMI/III/26");
    assert_eq!(receipt.repair_time, 2.5);

    let fields = source.last_form(actions::ADD_BREAKDOWN).expect("未发提交请求");
    let field = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(field("action").as_deref(), Some("addBreakdown"));
    assert_eq!(field("id_dies").as_deref(), Some("D-002"));
    assert_eq!(field("jam_breakdown").as_deref(), Some("07:45"));
    assert_eq!(field("tanggal_selesai_perbaikan").as_deref(), Some("2026-03-10"));

    assert!(api.session().selected.is_none());
    assert_eq!(api.session().counter.suggested_number, "006");
    assert_eq!(source.count(actions::GET_LAST_NO_LKD), 1);
}
