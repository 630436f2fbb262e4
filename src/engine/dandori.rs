// ==========================================
// 生产追踪系统 - 换模活动计算
// ==========================================
// 职责: 活动明细表（至少保留一行）、实际总时长、换模状态判定
// ==========================================

use crate::domain::dandori::{DandoriActivity, DandoriStatus};

/// 换模状态
///
/// - 实际 > 标准 > 0 → 超时（超出分钟数）
/// - 实际 > 0 且 标准 > 0 → 正常
/// - 其他 → 待定
pub fn dandori_status(total_minutes: f64, standard_minutes: f64) -> DandoriStatus {
    if total_minutes > standard_minutes && standard_minutes > 0.0 {
        DandoriStatus::Over {
            excess_minutes: total_minutes - standard_minutes,
        }
    } else if total_minutes > 0.0 && standard_minutes > 0.0 {
        DandoriStatus::Ok
    } else {
        DandoriStatus::Pending
    }
}

/// 活动明细行（录入中，字段可能未填）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityRow {
    pub code: String,
    pub minutes: Option<u32>,
}

/// 活动明细表
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySheet {
    rows: Vec<ActivityRow>,
}

impl Default for ActivitySheet {
    fn default() -> Self {
        Self {
            rows: vec![ActivityRow::default()],
        }
    }
}

impl ActivitySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ActivityRow] {
        &self.rows
    }

    /// 追加空行，返回新行下标
    pub fn add_row(&mut self) -> usize {
        self.rows.push(ActivityRow::default());
        self.rows.len() - 1
    }

    /// 更新某行；下标越界返回 false
    pub fn set_row(&mut self, index: usize, code: &str, minutes: Option<u32>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.code = code.trim().to_string();
                row.minutes = minutes;
                true
            }
            None => false,
        }
    }

    /// 删除某行；仅剩一行时拒绝删除
    pub fn delete_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// 实际总分钟（未填分钟按 0 计）
    pub fn total_minutes(&self) -> u32 {
        self.rows.iter().filter_map(|r| r.minutes).sum()
    }

    /// 提交用明细：只保留代码与分钟均已填写的行
    pub fn completed(&self) -> Vec<DandoriActivity> {
        self.rows
            .iter()
            .filter_map(|r| match r.minutes {
                Some(m) if !r.code.is_empty() && m > 0 => Some(DandoriActivity {
                    code: r.code.clone(),
                    minutes: m,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
