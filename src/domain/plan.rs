// ==========================================
// 成品发运排程系统 - 发运方案领域模型
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 2. 单日方案 / 6. 多日方案
// ==========================================
// 红线: 方案一经返回即不可变, 不跨调用持久化
// ==========================================

use crate::domain::types::SolverStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RakeAssignment - 单列专列发运决策
// ==========================================
// 不变量: 58 <= wagons <= 59, tonnes <= wagons * 车皮载重
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RakeAssignment {
    pub rake_id: String,                // 专列ID (当日序号编码)
    pub destination: String,            // 目的地
    pub tonnes: f64,                    // 装载吨位
    pub wagons: u32,                    // 车皮数
    pub loading_slots: u32,             // 最小装车时段数 (按吞吐量向上取整)
    pub estimated_cost: f64,            // 预估成本 (与目标函数同口径)
    pub estimated_delay_hours: f64,     // 预测延误 (小时)
}

// ==========================================
// TruckAssignment - 单辆汽车发运决策
// ==========================================
// 不变量: tonnes <= 汽车载重上限 (默认 22 吨)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckAssignment {
    pub truck_id: String,           // 汽车ID (当日序号编码)
    pub destination: String,        // 目的地
    pub tonnes: f64,                // 装载吨位
    pub estimated_cost: f64,        // 预估成本
    pub estimated_delay_hours: f64, // 预测延误 (小时)
}

// ==========================================
// PlanSummary - 单日方案汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanSummary {
    pub total_cost: f64,                // 总成本
    pub total_tonnage: f64,             // 总吨位
    pub total_rakes: u32,               // 启用专列数
    pub total_trucks: u32,              // 启用汽车数
    pub rail_vs_road_ratio: f64,        // 铁路吨位占比 (0~1)
    pub estimated_completion_days: u32, // 预估完成天数
}

// ==========================================
// DailyPlan - 单日发运方案
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub plan_id: String,                // 方案ID (uuid)
    pub rakes: Vec<RakeAssignment>,     // 专列决策列表
    pub trucks: Vec<TruckAssignment>,   // 汽车决策列表
    pub summary: PlanSummary,           // 汇总
    pub solver_status: SolverStatus,    // 求解状态
    pub solver_time_seconds: f64,       // 求解耗时 (秒)
    pub objective_value: f64,           // 目标函数值
    pub unassigned_orders: Vec<String>, // 未能落位的订单ID (只报告, 不报错)
}

impl DailyPlan {
    /// 构造空方案 (空订单输入的短路出口)
    pub fn empty() -> Self {
        Self {
            plan_id: uuid::Uuid::new_v4().to_string(),
            rakes: Vec::new(),
            trucks: Vec::new(),
            summary: PlanSummary::default(),
            solver_status: SolverStatus::EmptyInput,
            solver_time_seconds: 0.0,
            objective_value: 0.0,
            unassigned_orders: Vec::new(),
        }
    }
}

// ==========================================
// DailyBucket - 多日周期内的单日订单分桶
// ==========================================
// 不变量: 每个订单恰好属于一个桶
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBucket {
    pub day_index: u32,          // 周期内日序号 (0 起)
    pub date: NaiveDate,         // 日历日期
    pub order_ids: Vec<String>,  // 该日订单ID列表
}

// ==========================================
// DailyPlanSlot - 多日方案中的单日条目
// ==========================================
// 无订单的日子记为空条目 (plan = None)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanSlot {
    pub day_index: u32,          // 周期内日序号
    pub date: NaiveDate,         // 日历日期
    pub has_plan: bool,          // 是否有发运方案
    pub rake_plan: Option<DailyPlan>, // 单日方案 (空日为 None)
}

// ==========================================
// MultiPeriodPlan - 多日发运方案
// ==========================================
// 不变量: 汇总 = 所有非空单日方案之和
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiPeriodPlan {
    pub plan_id: String,                  // 方案ID (uuid)
    pub horizon_days: u32,                // 排程周期天数
    pub start_date: NaiveDate,            // 周期起始日期
    pub daily_plans: Vec<DailyPlanSlot>,  // 按日方案列表
    pub summary: PlanSummary,             // 跨日汇总
    pub input_summary: Vec<(u32, usize)>, // (日序号, 分桶订单数)
    pub bucketing_fallback: bool,         // 分桶模型是否走了贪心兜底
}
