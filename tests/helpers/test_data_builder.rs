// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 产出表格 API 的原始 JSON（与服务端字段名一致）
// ==========================================

use serde_json::{json, Value};

// ==========================================
// 生产实绩记录构建器
// ==========================================

pub struct ProductionRecordBuilder {
    date: String,
    machine: String,
    part_name: String,
    part_no: String,
    process: String,
    qty_spk: u64,
    qty_prod: u64,
    act_time: f64,
    performance: f64,
    achievement_qty: f64,
    achievement_eff: f64,
    group_line: String,
}

impl ProductionRecordBuilder {
    pub fn new(date: &str, machine: &str) -> Self {
        Self {
            date: date.to_string(),
            machine: machine.to_string(),
            part_name: "Bracket".to_string(),
            part_no: "PN-100".to_string(),
            process: "Blank".to_string(),
            qty_spk: 500,
            qty_prod: 480,
            act_time: 2.0,
            performance: 85.0,
            achievement_qty: 96.0,
            achievement_eff: 90.0,
            group_line: "A".to_string(),
        }
    }

    pub fn part(mut self, part_name: &str, part_no: &str) -> Self {
        self.part_name = part_name.to_string();
        self.part_no = part_no.to_string();
        self
    }

    pub fn process(mut self, process: &str) -> Self {
        self.process = process.to_string();
        self
    }

    pub fn quantities(mut self, planned: u64, produced: u64) -> Self {
        self.qty_spk = planned;
        self.qty_prod = produced;
        self
    }

    pub fn act_time(mut self, hours: f64) -> Self {
        self.act_time = hours;
        self
    }

    pub fn performance(mut self, score: f64) -> Self {
        self.performance = score;
        self
    }

    pub fn achievements(mut self, qty: f64, eff: f64) -> Self {
        self.achievement_qty = qty;
        self.achievement_eff = eff;
        self
    }

    pub fn line(mut self, group_line: &str) -> Self {
        self.group_line = group_line.to_string();
        self
    }

    pub fn build(self) -> Value {
        json!({
            "date": self.date,
            "mesin": self.machine,
            "partName": self.part_name,
            "partNo": self.part_no,
            "proses": self.process,
            "qtySpk": self.qty_spk,
            "qtyProd": self.qty_prod,
            "actTime": self.act_time,
            "performanceScore": self.performance,
            "achievementQty": self.achievement_qty,
            "achievementEff": self.achievement_eff,
            "groupLine": self.group_line,
        })
    }
}

/// `getAchievementData` 响应
pub fn achievement_json(records: Vec<Value>) -> Value {
    json!({ "records": records })
}

/// 看板常用数据集：两天、三台机台、两条产线
pub fn sample_achievement() -> Value {
    achievement_json(vec![
        ProductionRecordBuilder::new("2026-01-05", "P3 Press").performance(95.0).line("P").build(),
        ProductionRecordBuilder::new("2026-01-05T08:00:00.000Z", "A1 Bend")
            .performance(72.0)
            .build(),
        ProductionRecordBuilder::new("2026-01-06", "P3 Press")
            .part("Cover", "PN-200")
            .performance(91.0)
            .line("P")
            .build(),
        ProductionRecordBuilder::new("2026-01-06 14:30:00", "A1 Bend")
            .part("Cover", "PN-200")
            .performance(65.0)
            .build(),
        ProductionRecordBuilder::new("2026-01-06", "B2 Weld")
            .performance(80.0)
            .line("B")
            .build(),
    ])
}

/// `getDropdowns` 响应
pub fn dropdowns_json() -> Value {
    json!({
        "parts": [
            { "partName": "Bracket", "proses": "Blank", "groupLine": "A" },
            { "partName": "Bracket", "proses": "Bend", "groupLine": "A" },
            { "partName": "Cover", "proses": "Draw", "groupLine": "P" },
            { "partName": "Hinge", "proses": "Pierce", "groupLine": "B" }
        ],
        "machines": ["A1 Bend", "B2 Weld", "P3 Press"],
        "groupLines": ["P", "a", " B ", "", "XY"]
    })
}

/// `getMasterDies` 响应
pub fn dies_json() -> Value {
    json!({
        "status": "success",
        "data": [
            { "id_dies": "D-001", "nama_dies": "Bracket Blank", "id_proses": "10", "nama_proses": "Blank", "id_cust": "C1" },
            { "id_dies": "D-002", "nama_dies": "Bracket Bend", "id_proses": "20", "nama_proses": "Bend", "id_cust": "C1" },
            { "id_dies": "X-100", "nama_dies": "Cover Draw", "id_proses": "10", "nama_proses": "Draw", "id_cust": "C2" }
        ]
    })
}

/// `getMaster` 响应（换模主数据）
pub fn dandori_master_json() -> Value {
    json!({
        "mesin": [[1, "P3 Press", "P"], [2, "A1 Bend", "A"]],
        "dies": [
            ["PN-100", "Bracket", "10", "Blank", 30],
            ["PN-100", "Bracket", "20", "Bend", "45"],
            ["PN-200", "Cover", "10", "Draw", 60]
        ],
        "losstime": [[1, "Setting dies"], [2, "Cleaning"], [3, "Trial"]]
    })
}

/// `getReportData` 响应（记录仅 P/A 产线）
pub fn report_json() -> Value {
    json!({
        "header": {
            "dateFrom": "2026-01-05",
            "dateTo": "2026-01-06",
            "achievementNo": "12/STP/I/26"
        },
        "records": [
            {
                "partName": "Bracket", "partNo": "PN-100", "proses": "Blank", "mesin": "P3 Press",
                "groupLine": "P", "sph": 400, "qtySpk": 500, "qtyProd": 480, "actTime": 1.5,
                "sphAct": 320.4, "cycleTime": 11.25, "dandori": 0.5, "needTime": 1.5,
                "performanceScore": 92.0, "machineLoading": { "P3 Press": 1.5 }
            },
            {
                "partName": "Cover", "partNo": "PN-200", "proses": "Bend", "mesin": "A1 Bend",
                "groupLine": "a", "qtySpk": 300, "qtyProd": 150, "actTime": 2.0,
                "sphAct": 75, "needTime": 2.0, "performanceScore": 60.0,
                "machineLoading": { "A1 Bend": 2.0 }
            }
        ],
        "machines": [
            { "name": "P3 Press", "shortName": "P3" },
            { "name": "A1 Bend", "shortName": "A1" },
            { "name": "B2 Weld", "shortName": "B2" }
        ],
        "chartData": { "labels": ["P3", "A1", "B2"], "values": [92.0, 60.0, 0.0] },
        "summary": {
            "kapasitasTerpakai": { "P3 Press": 1.5, "A1 Bend": 2.0, "B2 Weld": 0 },
            "machinePerformance": [
                { "machine": "P3 Press", "avgPerformance": 92.0 },
                { "machine": "B2 Weld", "avgPerformance": 0 }
            ]
        }
    })
}
