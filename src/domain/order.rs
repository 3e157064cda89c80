// ==========================================
// 成品发运排程系统 - 订单与资源领域模型
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 1.1 输入数据模型
// ==========================================
// 红线: 订单/库存/资源在一次优化调用内只读
// ==========================================

use crate::domain::types::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Order - 成品发运订单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,            // 订单ID
    pub material: String,            // 物料/品种代码
    pub destination: String,         // 目的地
    pub quantity_t: f64,             // 订货量 (吨, >= 0)
    pub priority: Priority,          // 优先级
    pub due_date: Option<NaiveDate>, // 交付期 (可缺失)
}

impl Order {
    /// 构造订单 (数量为负时钳到 0, 边界层脏数据不进入核心)
    pub fn new(
        order_id: impl Into<String>,
        material: impl Into<String>,
        destination: impl Into<String>,
        quantity_t: f64,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            material: material.into(),
            destination: destination.into(),
            quantity_t: quantity_t.max(0.0),
            priority,
            due_date,
        }
    }
}

// ==========================================
// ResourceCounts - 当日可用运力
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ResourceCounts {
    pub available_rakes: u32,  // 可用专列数
    pub available_trucks: u32, // 可用汽车数
}

impl ResourceCounts {
    /// 构造运力计数
    pub fn new(available_rakes: u32, available_trucks: u32) -> Self {
        Self {
            available_rakes,
            available_trucks,
        }
    }
}

// ==========================================
// InventoryRecord - 在库库存记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub material: String, // 物料代码
    pub quantity_t: f64,  // 在库量 (吨, >= 0)
}

impl InventoryRecord {
    /// 构造库存记录 (在库量为负时钳到 0)
    pub fn new(material: impl Into<String>, quantity_t: f64) -> Self {
        Self {
            material: material.into(),
            quantity_t: quantity_t.max(0.0),
        }
    }

    /// 把库存记录折叠为 物料 -> 在库量 查询表 (同物料多条记录累加)
    pub fn fold(records: &[InventoryRecord]) -> HashMap<String, f64> {
        let mut map: HashMap<String, f64> = HashMap::new();
        for record in records {
            *map.entry(record.material.clone()).or_insert(0.0) += record.quantity_t;
        }
        map
    }
}
