// ==========================================
// 生产追踪系统 - 主数据实体
// ==========================================
// 职责: 下拉主数据（零件/工序/机台/产线）、模具主数据、换模主数据
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::lenient;

// ==========================================
// 下拉主数据 (getDropdowns)
// ==========================================

/// 零件-工序组合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartProcess {
    #[serde(rename = "partName", deserialize_with = "lenient::string_or_empty", default)]
    pub part_name: String,
    #[serde(rename = "proses", deserialize_with = "lenient::string_or_empty", default)]
    pub process: String,
    #[serde(rename = "groupLine", deserialize_with = "lenient::string_or_empty", default)]
    pub group_line: String,
}

/// 下拉主数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownData {
    #[serde(default)]
    pub parts: Vec<PartProcess>,
    #[serde(default)]
    pub machines: Vec<String>,
    /// 产线代码（可能缺失，缺失时从 parts 中提取）
    #[serde(rename = "groupLines", default)]
    pub group_lines: Vec<Value>,
}

// ==========================================
// 模具主数据 (getMasterDies)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterDies {
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub id_dies: String,
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub nama_dies: String,
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub id_proses: String,
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub nama_proses: String,
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub id_cust: String,
}

/// 故障单号计数 (getLastNoLKD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LkdCounter {
    /// 最近一次使用的编号
    pub last_number: Option<String>,
    /// 建议编号（缺省 001）
    pub suggested_number: String,
}

impl Default for LkdCounter {
    fn default() -> Self {
        Self {
            last_number: None,
            suggested_number: "001".to_string(),
        }
    }
}

// ==========================================
// 换模主数据 (getMaster)
// ==========================================
// 原始数据为二维数组（表格行）

/// 机台（附所属产线）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DandoriMachine {
    pub name: String,
    pub line: String,
}

/// 零件-工序（附标准换模时间）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DandoriPart {
    pub part_no: String,
    pub part_name: String,
    pub id_proses: String,
    pub nama_proses: String,
    /// 标准换模时间（分钟）
    pub std_time_minutes: f64,
}

impl DandoriPart {
    /// 唯一键: 零件号-工序号
    pub fn unique_key(&self) -> String {
        format!("{}-{}", self.part_no, self.id_proses)
    }
}

/// 损失代码
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossCode {
    pub code: String,
    pub description: String,
}

/// 换模主数据
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DandoriMaster {
    pub machines: Vec<DandoriMachine>,
    pub parts: Vec<DandoriPart>,
    pub loss_codes: Vec<LossCode>,
}

fn cell(row: &[Value], idx: usize) -> String {
    row.get(idx).map(lenient::value_to_string).unwrap_or_default()
}

impl DandoriMaster {
    /// 从表格行构建
    ///
    /// # 参数
    /// - mesin: `[_, 机台名, 产线]`
    /// - dies: `[零件号, 零件名, 工序号, 工序名, 标准时间]`
    /// - losstime: `[代码, 描述]`
    pub fn from_rows(mesin: &[Vec<Value>], dies: &[Vec<Value>], losstime: &[Vec<Value>]) -> Self {
        let machines = mesin
            .iter()
            .map(|row| DandoriMachine {
                name: cell(row, 1),
                line: cell(row, 2),
            })
            .filter(|m| !m.name.is_empty())
            .collect();

        let parts = dies
            .iter()
            .map(|row| DandoriPart {
                part_no: cell(row, 0),
                part_name: cell(row, 1),
                id_proses: cell(row, 2),
                nama_proses: cell(row, 3),
                std_time_minutes: row.get(4).map(lenient::value_to_f64).unwrap_or(0.0),
            })
            .collect();

        let loss_codes = losstime
            .iter()
            .map(|row| LossCode {
                code: cell(row, 0).trim().to_string(),
                description: cell(row, 1),
            })
            .filter(|c| !c.code.is_empty())
            .collect();

        Self {
            machines,
            parts,
            loss_codes,
        }
    }

    /// 查询机台所属产线
    pub fn line_of(&self, machine: &str) -> Option<&str> {
        self.machines
            .iter()
            .find(|m| m.name == machine)
            .map(|m| m.line.as_str())
    }

    /// 查询损失代码描述
    pub fn loss_description(&self, code: &str) -> Option<&str> {
        let code = code.trim();
        self.loss_codes
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.description.as_str())
    }

    /// 按唯一键查找零件
    pub fn part_by_key(&self, key: &str) -> Option<&DandoriPart> {
        self.parts.iter().find(|p| p.unique_key() == key)
    }
}
