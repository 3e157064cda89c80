// ==========================================
// 成品发运排程系统 - 成本函数库
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 2.1 成本与常数库
// ==========================================
// 职责: 纯函数计算各项成本/罚金, 无状态
// 红线: 目标函数与贪心兜底必须用同一套成本口径
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::params::CostParameters;
use crate::domain::types::Priority;

/// 铁路段运费: 吨位 * 每吨运费, 高成本目的地按比例加价
pub fn rail_leg_cost(tonnes: f64, destination: &str, params: &CostParameters) -> f64 {
    let base = tonnes * params.freight_rate_per_t;
    if params.is_high_cost_destination(destination) {
        base * (1.0 + params.high_cost_surcharge_pct)
    } else {
        base
    }
}

/// 公路段运费: 吨位 * 运距 * 每公里每吨运费
pub fn road_leg_cost(tonnes: f64, destination: &str, params: &CostParameters) -> f64 {
    tonnes * params.distance_km(destination) * params.truck_rate_per_km_t
}

/// 滞留费: 车皮数 * 滞留小时 * 每车皮小时费率
pub fn demurrage_cost(wagons: u32, demurrage_hours: f64, params: &CostParameters) -> f64 {
    wagons as f64 * demurrage_hours * params.demurrage_rate_per_wagon_hour
}

/// 延误罚金: 预测延误小时 * 每小时罚率
pub fn delay_penalty(delay_hours: f64, params: &CostParameters) -> f64 {
    delay_hours * params.delay_penalty_per_hour
}

/// 非整列发运加价: 车皮数低于整列时, 按缺口车皮的运费比例加价
pub fn partial_rake_penalty(
    wagons: u32,
    params: &CostParameters,
    tuning: &DispatchTuning,
) -> f64 {
    if wagons >= tuning.full_rake_wagons {
        return 0.0;
    }
    let missing = (tuning.full_rake_wagons - wagons) as f64;
    missing * tuning.wagon_capacity_t * params.freight_rate_per_t * params.partial_rake_surcharge_pct
}

/// 一列多目的地罚金: 每个额外目的地计一次
pub fn multi_destination_penalty(destination_count: usize, params: &CostParameters) -> f64 {
    destination_count.saturating_sub(1) as f64 * params.multi_destination_penalty
}

/// SLA 迟交罚金 (交付期感知)
///
/// 规则:
/// - 距交付期 >= 紧迫窗口: 罚金为 0
/// - 进入窗口或已逾期: (窗口 - 剩余小时) * 吨位 * 每吨小时罚率 * 优先级权重
/// - 结果下限钳到 0
pub fn sla_penalty(
    hours_to_due: f64,
    quantity_t: f64,
    priority: Priority,
    params: &CostParameters,
    tuning: &DispatchTuning,
) -> f64 {
    if hours_to_due >= tuning.tight_window_hours {
        return 0.0;
    }
    let exposure_hours = tuning.tight_window_hours - hours_to_due;
    (exposure_hours * quantity_t * params.sla_penalty_per_t_hour * params.priority_weight(priority))
        .max(0.0)
}

/// 推荐方式不一致罚金: 按订货量计
pub fn mode_mismatch_penalty(quantity_t: f64, params: &CostParameters) -> f64 {
    quantity_t * params.mode_mismatch_penalty_per_t
}

/// 最小装车时段数: ceil(吨位 / 吞吐量 * 60 / 单时段分钟数)
pub fn min_loading_slots(tonnes: f64, tuning: &DispatchTuning) -> u32 {
    if tonnes <= 0.0 || tuning.loading_throughput_tph <= 0.0 || tuning.slot_minutes <= 0.0 {
        return 0;
    }
    let hours = tonnes / tuning.loading_throughput_tph;
    (hours * 60.0 / tuning.slot_minutes).ceil() as u32
}
