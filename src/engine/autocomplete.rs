// ==========================================
// 生产追踪系统 - 自动补全检索
// ==========================================
// 职责: 模具检索、零件/工序检索、换模零件检索
// 规则: 均为不区分大小写的子串匹配，结果保持主数据顺序
// ==========================================

use std::collections::HashSet;

use crate::domain::master::{DandoriPart, MasterDies, PartProcess};

/// 模具检索默认上限
pub const DEFAULT_DIES_LIMIT: usize = 50;

/// 换模零件检索最少字符数
pub const MIN_DANDORI_TERM_CHARS: usize = 2;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ==========================================
// 模具检索
// ==========================================

/// 按模具号/模具名/工序名/客户检索
///
/// 空查询返回全部（受上限约束）
pub fn search_dies<'a>(dies: &'a [MasterDies], query: &str, limit: usize) -> Vec<&'a MasterDies> {
    let q = query.trim().to_lowercase();
    dies.iter()
        .filter(|d| {
            q.is_empty()
                || contains_ci(&d.id_dies, &q)
                || contains_ci(&d.nama_dies, &q)
                || contains_ci(&d.nama_proses, &q)
                || contains_ci(&d.id_cust, &q)
        })
        .take(limit)
        .collect()
}

/// 模具号精确匹配（不区分大小写，用于自动填充与提交校验）
pub fn find_dies_exact<'a>(dies: &'a [MasterDies], id: &str) -> Option<&'a MasterDies> {
    let id = id.trim().to_uppercase();
    if id.is_empty() {
        return None;
    }
    dies.iter().find(|d| d.id_dies.trim().to_uppercase() == id)
}

// ==========================================
// 零件/工序检索
// ==========================================

/// 去重零件名（保持首次出现顺序）
pub fn unique_part_names(parts: &[PartProcess]) -> Vec<&str> {
    let mut seen = HashSet::new();
    parts
        .iter()
        .map(|p| p.part_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// 零件名检索
pub fn search_part_names<'a>(parts: &'a [PartProcess], term: &str) -> Vec<&'a str> {
    let q = term.trim().to_lowercase();
    unique_part_names(parts)
        .into_iter()
        .filter(|name| q.is_empty() || contains_ci(name, &q))
        .collect()
}

/// 某零件的全部工序
pub fn processes_for_part<'a>(parts: &'a [PartProcess], part_name: &str) -> Vec<&'a PartProcess> {
    parts.iter().filter(|p| p.part_name == part_name).collect()
}

/// 在已选零件的工序中检索
pub fn search_processes<'a>(processes: &[&'a PartProcess], term: &str) -> Vec<&'a str> {
    let q = term.trim().to_lowercase();
    processes
        .iter()
        .copied()
        .map(|p| p.process.as_str())
        .filter(|proc| q.is_empty() || contains_ci(proc, &q))
        .collect()
}

// ==========================================
// 换模零件检索
// ==========================================

/// 按零件名/零件号检索（少于 2 个字符时不检索）
pub fn search_dandori_parts<'a>(parts: &'a [DandoriPart], term: &str) -> Vec<&'a DandoriPart> {
    let q = term.trim().to_lowercase();
    if q.chars().count() < MIN_DANDORI_TERM_CHARS {
        return Vec::new();
    }
    parts
        .iter()
        .filter(|p| contains_ci(&p.part_name, &q) || contains_ci(&p.part_no, &q))
        .collect()
}
