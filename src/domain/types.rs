// ==========================================
// 生产追踪系统 - 领域类型定义
// ==========================================
// 职责: 绩效分级、故障严重度、产线代码等值类型
// 红线: 阈值为固定常量,下游颜色与状态标签依赖这些阈值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 优秀阈值（含）
pub const EXCELLENT_THRESHOLD: f64 = 90.0;

/// 良好阈值（含）
pub const GOOD_THRESHOLD: f64 = 70.0;

// ==========================================
// 绩效分级 (Performance Category)
// ==========================================
// >= 90 优秀, 70 <= s < 90 良好, < 70 待改进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceCategory {
    Excellent, // 优秀
    Good,      // 良好
    Poor,      // 待改进
}

impl PerformanceCategory {
    /// 按绩效分值分级
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            PerformanceCategory::Excellent
        } else if score >= GOOD_THRESHOLD {
            PerformanceCategory::Good
        } else {
            PerformanceCategory::Poor
        }
    }

    /// CSV 导出使用的状态标签（固定英文）
    pub fn status_label(&self) -> &'static str {
        match self {
            PerformanceCategory::Excellent => "Excellent",
            PerformanceCategory::Good => "Good",
            PerformanceCategory::Poor => "Needs Improvement",
        }
    }

    /// 前端样式类名（柱状图/表格着色）
    pub fn css_class(&self) -> &'static str {
        match self {
            PerformanceCategory::Excellent => "status-excellent",
            PerformanceCategory::Good => "status-good",
            PerformanceCategory::Poor => "status-poor",
        }
    }

    /// 图表颜色
    pub fn color(&self) -> &'static str {
        match self {
            PerformanceCategory::Excellent => "#10b981",
            PerformanceCategory::Good => "#f59e0b",
            PerformanceCategory::Poor => "#ef4444",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceCategory::Excellent => write!(f, "EXCELLENT"),
            PerformanceCategory::Good => write!(f, "GOOD"),
            PerformanceCategory::Poor => write!(f, "POOR"),
        }
    }
}

// ==========================================
// 故障严重度 (Breakdown Severity)
// ==========================================
// < 1h 轻微, 1h <= h < 3h 中等, >= 3h 严重
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakdownSeverity {
    Light,  // 轻微
    Medium, // 中等
    Heavy,  // 严重
}

impl BreakdownSeverity {
    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            BreakdownSeverity::Light => "severity.light",
            BreakdownSeverity::Medium => "severity.medium",
            BreakdownSeverity::Heavy => "severity.heavy",
        }
    }
}

impl fmt::Display for BreakdownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakdownSeverity::Light => write!(f, "Light"),
            BreakdownSeverity::Medium => write!(f, "Medium"),
            BreakdownSeverity::Heavy => write!(f, "Heavy"),
        }
    }
}

// ==========================================
// 产线代码 (Group Line)
// ==========================================
// 单个大写字母 (P, A, B, C ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupLine(char);

impl GroupLine {
    /// 解析产线代码：去空白、转大写，必须恰好一个 A-Z 字母
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().to_uppercase();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Some(GroupLine(c)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl TryFrom<String> for GroupLine {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GroupLine::parse(&value).ok_or_else(|| format!("无效的产线代码: {:?}", value))
    }
}

impl From<GroupLine> for String {
    fn from(line: GroupLine) -> Self {
        line.0.to_string()
    }
}

impl fmt::Display for GroupLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 产线展示信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDescriptor {
    pub name: String,
    pub description: &'static str,
    pub color: &'static str,
}

impl LineDescriptor {
    pub fn for_line(line: GroupLine) -> Self {
        let (description, color) = match line.as_char() {
            'P' => ("Progressive Press", "#2196f3"),
            'A' => ("Bending Operation", "#4caf50"),
            'B' => ("General Assembly", "#9c27b0"),
            'C' => ("Cutting Process", "#ff9800"),
            _ => ("Production Line", "#666"),
        };
        Self {
            name: format!("Line {}", line),
            description,
            color,
        }
    }
}

// ==========================================
// 工时录入方式 (Time Input Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInputMethod {
    Minutes,  // 直接录入分钟
    StartEnd, // 开始/结束时刻
}
