// ==========================================
// 成品发运排程系统 - 车皮装载领域模型
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 7. 车皮级装载优化
// ==========================================
// 红线: 装载方案只是快照, 不可反向污染产品清单
// ==========================================

use crate::domain::types::Priority;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 待装载成品
// ==========================================
// 不变量: weight_t > 0; 尺寸缺失视为任意仓位可装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,      // 成品ID
    pub weight_t: f64,           // 重量 (吨, > 0)
    pub length_m: Option<f64>,   // 长度 (米)
    pub width_m: Option<f64>,    // 宽度 (米)
    pub height_m: Option<f64>,   // 高度 (米)
    pub priority: Priority,      // 优先级
    pub destination: String,     // 目的地
}

impl Product {
    /// 判断成品尺寸是否能放入指定仓位
    ///
    /// 规则: 未声明的尺寸维度视为不受限
    pub fn fits_in(&self, slot: &Slot) -> bool {
        let len_ok = self.length_m.map(|l| l <= slot.max_length_m).unwrap_or(true);
        let wid_ok = self.width_m.map(|w| w <= slot.max_width_m).unwrap_or(true);
        let hgt_ok = self.height_m.map(|h| h <= slot.max_height_m).unwrap_or(true);
        len_ok && wid_ok && hgt_ok
    }
}

// ==========================================
// Slot - 车皮内装载仓位
// ==========================================
// 不变量: 所有上限 > 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub slot_id: String,      // 仓位ID
    pub max_weight_t: f64,    // 重量上限 (吨)
    pub max_length_m: f64,    // 长度上限 (米)
    pub max_width_m: f64,     // 宽度上限 (米)
    pub max_height_m: f64,    // 高度上限 (米)
}

// ==========================================
// Wagon - 车皮
// ==========================================
// 不变量: payload_limit_t > 0
// 仓位重量之和 <= 载重上限属设计建议, 不在此强制
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wagon {
    pub wagon_id: String,      // 车皮ID
    pub wagon_type: String,    // 车皮型号
    pub payload_limit_t: f64,  // 载重上限 (吨)
    pub slots: Vec<Slot>,      // 仓位布局
}

// ==========================================
// RakeTemplate - 配列模板
// ==========================================
// 可复用的专列配置: 车型 + 车皮数 + 单车仓位布局
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RakeTemplate {
    pub template_id: String,   // 模板ID
    pub wagon_type: String,    // 车皮型号
    pub wagon_count: u32,      // 车皮数 (> 0)
    pub payload_limit_t: f64,  // 单车载重上限 (吨)
    pub slot_layout: Vec<Slot>, // 单车仓位布局
}

impl RakeTemplate {
    /// 展开模板为具体车皮列表
    ///
    /// 车皮ID编码: {模板ID}-W{序号}, 仓位ID编码: {车皮ID}-S{序号}
    pub fn expand(&self) -> Vec<Wagon> {
        (0..self.wagon_count)
            .map(|w| {
                let wagon_id = format!("{}-W{}", self.template_id, w + 1);
                let slots = self
                    .slot_layout
                    .iter()
                    .enumerate()
                    .map(|(s, slot)| Slot {
                        slot_id: format!("{}-S{}", wagon_id, s + 1),
                        ..slot.clone()
                    })
                    .collect();
                Wagon {
                    wagon_id,
                    wagon_type: self.wagon_type.clone(),
                    payload_limit_t: self.payload_limit_t,
                    slots,
                }
            })
            .collect()
    }

    /// 整列载重上限 (吨)
    pub fn total_payload_t(&self) -> f64 {
        self.payload_limit_t * self.wagon_count as f64
    }
}

// ==========================================
// LoadAssignment - 成品落位决策
// ==========================================
// 不变量: 一个成品至多出现在一条落位记录中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadAssignment {
    pub product_id: String, // 成品ID
    pub wagon_id: String,   // 车皮ID
    pub slot_id: String,    // 仓位ID
}

// ==========================================
// LoadingPlan - 单模板装载方案
// ==========================================
// 不变量: utilization_pct ∈ [0, 100]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingPlan {
    pub template_id: String,               // 来源模板ID
    pub wagons: Vec<Wagon>,                // 展开后的车皮
    pub assignments: Vec<LoadAssignment>,  // 落位明细
    pub total_loaded_t: f64,               // 总装载吨位
    pub utilization_pct: f64,              // 整列载重利用率 (%)
    pub unassigned_products: Vec<String>,  // 未落位成品ID (只报告)
}

// ==========================================
// TemplateSelection - 模板择优结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template_id: String, // 胜出模板ID
    pub plan: LoadingPlan,   // 对应装载方案
    pub score: f64,          // 择优得分 = 总装载吨位*100 + 利用率
}
