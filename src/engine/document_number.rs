// ==========================================
// 生产追踪系统 - 单据编号
// ==========================================
// 故障单 (LKD): /{NNN}/LKD/MTC/KMI/{罗马月份}/{两位年份}
// 达成报表:     {序号}/STP/{罗马月份}/{两位年份}
// ==========================================

use chrono::{Datelike, NaiveDate};

const ROMAN_MONTHS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// 月份 → 罗马数字（超出 1..=12 时回退 I）
pub fn to_roman_month(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| ROMAN_MONTHS.get(i as usize))
        .copied()
        .unwrap_or("I")
}

fn two_digit_year(date: NaiveDate) -> String {
    format!("{:02}", date.year().rem_euclid(100))
}

/// 故障单号预览
///
/// - 编号左补零到 3 位，缺失显示 `___`
/// - 无故障日期时月份/年份显示 `/—/—`
pub fn lkd_number_preview(number: Option<&str>, breakdown_date: Option<NaiveDate>) -> String {
    let number = match number.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("{:0>3}", n),
        None => "___".to_string(),
    };

    let mut preview = format!("/{}/LKD/MTC/KMI", number);
    match breakdown_date {
        Some(date) => {
            preview.push_str(&format!(
                "/{}/{}",
                to_roman_month(date.month()),
                two_digit_year(date)
            ));
        }
        None => preview.push_str("/—/—"),
    }
    preview
}

/// 达成报表文档编号
pub fn achievement_number(sequence: u32, date: NaiveDate) -> String {
    format!(
        "{}/STP/{}/{}",
        sequence,
        to_roman_month(date.month()),
        two_digit_year(date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_to_roman_month() {
        assert_eq!(to_roman_month(1), "I");
        assert_eq!(to_roman_month(4), "IV");
        assert_eq!(to_roman_month(9), "IX");
        assert_eq!(to_roman_month(12), "XII");
        assert_eq!(to_roman_month(0), "I");
        assert_eq!(to_roman_month(13), "I");
    }

    #[test]
    fn test_lkd_number_preview() {
        assert_eq!(
            lkd_number_preview(Some("7"), Some(d("2026-03-14"))),
            "/007/LKD/MTC/KMI/III/26"
        );
        assert_eq!(
            lkd_number_preview(Some("1234"), Some(d("2025-11-01"))),
            "/1234/LKD/MTC/KMI/XI/25"
        );
        assert_eq!(lkd_number_preview(None, None), "/___/LKD/MTC/KMI/—/—");
        assert_eq!(lkd_number_preview(Some("  "), None), "/___/LKD/MTC/KMI/—/—");
    }

    #[test]
    fn test_achievement_number() {
        assert_eq!(achievement_number(42, d("2026-10-19")), "42/STP/X/26");
    }
}
