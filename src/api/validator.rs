// ==========================================
// 生产追踪系统 - 表单校验器
// ==========================================
// 职责: 录入表单与报表请求的校验
// 红线: 校验失败时指明字段，且不触达网络层
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::api::error::{ApiError, ApiResult, ValidationRule};
use crate::domain::breakdown::BreakdownEntry;
use crate::domain::master::{MasterDies, PartProcess};
use crate::domain::production::ProductionEntry;
use crate::domain::types::{GroupLine, TimeInputMethod};
use crate::engine::autocomplete::find_dies_exact;
use crate::engine::formulas::shift_duration_minutes;

fn required(field: &'static str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::validation(field, ValidationRule::Required))
    } else {
        Ok(())
    }
}

// ==========================================
// 生产实绩录入
// ==========================================

/// 实绩录入表单（原始输入）
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionForm {
    pub production_date: Option<NaiveDate>,
    pub part_name: String,
    pub process: String,
    pub machine: String,
    pub qty_spk: i64,
    pub act_qty: i64,
    pub time_method: TimeInputMethod,
    pub minutes: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// 实际工时（分钟）
///
/// 起止时刻方式下跨午夜按 +24h 计算
pub fn resolve_actual_minutes(form: &ProductionForm) -> ApiResult<i64> {
    match form.time_method {
        TimeInputMethod::Minutes => match form.minutes {
            Some(m) if m >= 1 => Ok(m),
            Some(_) => Err(ApiError::validation("act_minutes", ValidationRule::MinValue(1))),
            None => Err(ApiError::validation("act_minutes", ValidationRule::Required)),
        },
        TimeInputMethod::StartEnd => {
            let start = form
                .start_time
                .ok_or_else(|| ApiError::validation("start_time", ValidationRule::Required))?;
            let end = form
                .end_time
                .ok_or_else(|| ApiError::validation("end_time", ValidationRule::Required))?;
            if start == end {
                return Err(ApiError::validation("end_time", ValidationRule::SameTime));
            }
            Ok(shift_duration_minutes(start, end))
        }
    }
}

/// 校验实绩录入表单并生成提交载荷
///
/// 零件与工序必须来自主数据
pub fn validate_production(form: &ProductionForm, parts: &[PartProcess]) -> ApiResult<ProductionEntry> {
    let production_date = form
        .production_date
        .ok_or_else(|| ApiError::validation("production_date", ValidationRule::Required))?;

    required("part_name", &form.part_name)?;
    if !parts.iter().any(|p| p.part_name == form.part_name) {
        return Err(ApiError::validation("part_name", ValidationRule::NotInList));
    }

    required("process", &form.process)?;
    if !parts
        .iter()
        .any(|p| p.part_name == form.part_name && p.process == form.process)
    {
        return Err(ApiError::validation("process", ValidationRule::NotInList));
    }

    required("machine", &form.machine)?;

    if form.qty_spk < 1 {
        return Err(ApiError::validation("qty_spk", ValidationRule::MinValue(1)));
    }
    if form.act_qty < 0 {
        return Err(ApiError::validation("act_qty", ValidationRule::MinValue(0)));
    }

    let actual_minutes = resolve_actual_minutes(form)?;

    Ok(ProductionEntry {
        production_date,
        part_name: form.part_name.clone(),
        process: form.process.clone(),
        machine: form.machine.trim().to_string(),
        quantity_planned: form.qty_spk as u64,
        quantity_produced: form.act_qty as u64,
        actual_minutes,
    })
}

// ==========================================
// 模具故障
// ==========================================

/// 校验故障记录
pub fn validate_breakdown(entry: &BreakdownEntry, dies: &[MasterDies]) -> ApiResult<()> {
    required("id_dies", &entry.id_dies)?;
    if find_dies_exact(dies, &entry.id_dies).is_none() {
        return Err(ApiError::validation("id_dies", ValidationRule::NotInList));
    }

    required("no_lkd_number", &entry.no_lkd_number)?;

    let repair_start =
        NaiveDateTime::new(entry.tanggal_mulai_perbaikan, entry.jam_mulai_perbaikan);
    let repair_end =
        NaiveDateTime::new(entry.tanggal_selesai_perbaikan, entry.jam_selesai_perbaikan);
    if repair_end <= repair_start {
        return Err(ApiError::validation(
            "repair_end",
            ValidationRule::EndNotAfterStart,
        ));
    }
    Ok(())
}

// ==========================================
// 换模
// ==========================================

/// 校验换模记录：合计分钟 > 0 且已选择零件
pub fn validate_dandori(total_minutes: u32, part_selected: bool) -> ApiResult<()> {
    if total_minutes == 0 {
        return Err(ApiError::validation("total_minutes", ValidationRule::TotalZero));
    }
    if !part_selected {
        return Err(ApiError::validation("part_no", ValidationRule::Required));
    }
    Ok(())
}

// ==========================================
// 报表请求
// ==========================================

/// 校验报表请求，返回 (开始, 结束)
pub fn validate_report_request(
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    lines: &[GroupLine],
    max_lines: usize,
    max_range_days: i64,
) -> ApiResult<(NaiveDate, NaiveDate)> {
    let from = date_from.ok_or_else(|| ApiError::validation("date_from", ValidationRule::Required))?;
    let to = date_to.ok_or_else(|| ApiError::validation("date_to", ValidationRule::Required))?;

    if lines.is_empty() {
        return Err(ApiError::validation("group_lines", ValidationRule::Required));
    }
    if lines.len() > max_lines {
        return Err(ApiError::validation(
            "group_lines",
            ValidationRule::TooManyLines(max_lines),
        ));
    }

    if from > to {
        return Err(ApiError::validation("date_from", ValidationRule::RangeInverted));
    }
    if (to - from).num_days() > max_range_days {
        return Err(ApiError::validation(
            "date_to",
            ValidationRule::RangeTooLong(max_range_days),
        ));
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn parts() -> Vec<PartProcess> {
        vec![PartProcess {
            part_name: "BRACKET".to_string(),
            process: "BLANK".to_string(),
            group_line: "A".to_string(),
        }]
    }

    fn form() -> ProductionForm {
        ProductionForm {
            production_date: Some(d("2024-03-01")),
            part_name: "BRACKET".to_string(),
            process: "BLANK".to_string(),
            machine: "P-01".to_string(),
            qty_spk: 100,
            act_qty: 90,
            time_method: TimeInputMethod::Minutes,
            minutes: Some(60),
            start_time: None,
            end_time: None,
        }
    }

    fn field_of(err: ApiError) -> (&'static str, ValidationRule) {
        match err {
            ApiError::Validation { field, rule } => (field, rule),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_production_ok() {
        let entry = validate_production(&form(), &parts()).unwrap();
        assert_eq!(entry.actual_minutes, 60);
        assert_eq!(entry.quantity_planned, 100);
    }

    #[test]
    fn test_validate_production_rejects_unknown_process() {
        let mut f = form();
        f.process = "PIERCE".to_string();
        let (field, rule) = field_of(validate_production(&f, &parts()).unwrap_err());
        assert_eq!(field, "process");
        assert_eq!(rule, ValidationRule::NotInList);
    }

    #[test]
    fn test_validate_production_quantity_bounds() {
        let mut f = form();
        f.qty_spk = 0;
        assert_eq!(
            field_of(validate_production(&f, &parts()).unwrap_err()),
            ("qty_spk", ValidationRule::MinValue(1))
        );

        let mut f = form();
        f.act_qty = 0;
        assert!(validate_production(&f, &parts()).is_ok());
    }

    #[test]
    fn test_start_end_overnight_and_same_time() {
        let mut f = form();
        f.time_method = TimeInputMethod::StartEnd;
        f.start_time = Some(t("22:00"));
        f.end_time = Some(t("06:00"));
        assert_eq!(resolve_actual_minutes(&f).unwrap(), 480);

        f.end_time = Some(t("22:00"));
        assert_eq!(
            field_of(resolve_actual_minutes(&f).unwrap_err()),
            ("end_time", ValidationRule::SameTime)
        );
    }

    #[test]
    fn test_validate_dandori() {
        assert!(validate_dandori(0, true).is_err());
        assert!(validate_dandori(10, false).is_err());
        assert!(validate_dandori(10, true).is_ok());
    }

    #[test]
    fn test_validate_report_request() {
        let a = GroupLine::parse("A").unwrap();
        let b = GroupLine::parse("B").unwrap();
        let c = GroupLine::parse("C").unwrap();
        let p = GroupLine::parse("P").unwrap();

        assert!(validate_report_request(Some(d("2024-01-01")), Some(d("2024-01-31")), &[a], 3, 90).is_ok());

        let (field, _) = field_of(
            validate_report_request(Some(d("2024-01-01")), Some(d("2024-01-31")), &[], 3, 90).unwrap_err(),
        );
        assert_eq!(field, "group_lines");

        let (_, rule) = field_of(
            validate_report_request(Some(d("2024-01-01")), Some(d("2024-01-31")), &[a, b, c, p], 3, 90)
                .unwrap_err(),
        );
        assert_eq!(rule, ValidationRule::TooManyLines(3));

        let (_, rule) = field_of(
            validate_report_request(Some(d("2024-02-01")), Some(d("2024-01-01")), &[a], 3, 90).unwrap_err(),
        );
        assert_eq!(rule, ValidationRule::RangeInverted);

        // 90 天跨度允许，91 天拒绝
        assert!(validate_report_request(Some(d("2024-01-01")), Some(d("2024-03-31")), &[a], 3, 90).is_ok());
        let (_, rule) = field_of(
            validate_report_request(Some(d("2024-01-01")), Some(d("2024-04-01")), &[a], 3, 90).unwrap_err(),
        );
        assert_eq!(rule, ValidationRule::RangeTooLong(90));
    }
}
