// ==========================================
// 成品发运排程系统 - 贪心兜底引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 4. Greedy Fallback
// ==========================================
// 职责: 求解失败/超时/不可行时的确定性顺序分配
// 红线: 与目标函数共用成本函数库, 成本口径可比
// 保证: 可行 + 按优先级有序, 不保证全局最优
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::order::Order;
use crate::domain::plan::{DailyPlan, RakeAssignment, TruckAssignment};
use crate::domain::types::SolverStatus;
use crate::engine::costs;
use crate::engine::dispatch::DispatchInput;
use crate::engine::summarize_plan;
use chrono::NaiveDate;
use tracing::{info, warn};

// ==========================================
// GreedyFallback - 贪心兜底引擎
// ==========================================
pub struct GreedyFallback {
    // 无状态引擎, 不需要注入依赖
}

impl GreedyFallback {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 生成兜底方案
    ///
    /// 规则 (依据 Dispatch_Engine_Specs 4):
    /// 1) 按 (优先级等级升序, 交付期升序, 缺交付期排最后) 排序
    /// 2) 订货量 >= 铁路最小量且有剩余专列 -> 下一列专列
    /// 3) 否则有剩余汽车 -> 下一辆汽车 (吨位钳到汽车载重)
    /// 4) 两侧运力耗尽 -> 记入未落位列表 (报告, 不报错)
    ///
    /// # 返回
    /// 状态为 GREEDY_FALLBACK 的单日方案
    pub fn plan(&self, input: &DispatchInput, tuning: &DispatchTuning) -> DailyPlan {
        let mut ordered: Vec<&Order> = input.orders.iter().collect();
        ordered.sort_by_key(|o| {
            (
                o.priority.rank(),
                o.due_date.unwrap_or(NaiveDate::MAX),
            )
        });

        let demurrage_hours = input
            .predictions
            .demurrage_or(tuning.default_demurrage_hours);

        let mut rakes: Vec<RakeAssignment> = Vec::new();
        let mut trucks: Vec<TruckAssignment> = Vec::new();
        let mut unassigned: Vec<String> = Vec::new();

        for order in ordered {
            let rake_slot_free = (rakes.len() as u32) < input.resources.available_rakes;
            let rail_worthy = order.quantity_t >= tuning.rail_min_quantity_t;

            if rake_slot_free && rail_worthy {
                let rake_index = rakes.len();
                let wagons = ((order.quantity_t / tuning.wagon_capacity_t).ceil() as u32)
                    .clamp(tuning.min_wagons_per_rake, tuning.max_wagons_per_rake);
                let tonnes = order
                    .quantity_t
                    .min(wagons as f64 * tuning.wagon_capacity_t);
                let delay_hours = input.predictions.rake_delay(rake_index);

                let estimated_cost =
                    costs::rail_leg_cost(tonnes, &order.destination, &input.cost_params)
                        + costs::demurrage_cost(wagons, demurrage_hours, &input.cost_params)
                        + costs::delay_penalty(delay_hours, &input.cost_params)
                        + costs::partial_rake_penalty(wagons, &input.cost_params, tuning);

                rakes.push(RakeAssignment {
                    rake_id: format!("RAKE-{}", rake_index + 1),
                    destination: order.destination.clone(),
                    tonnes,
                    wagons,
                    loading_slots: costs::min_loading_slots(tonnes, tuning),
                    estimated_cost,
                    estimated_delay_hours: delay_hours,
                });
            } else if (trucks.len() as u32) < input.resources.available_trucks {
                let truck_index = trucks.len();
                let tonnes = order.quantity_t.min(tuning.truck_capacity_t);
                let delay_hours = input.predictions.truck_delay(truck_index);

                let estimated_cost =
                    costs::road_leg_cost(tonnes, &order.destination, &input.cost_params)
                        + costs::delay_penalty(delay_hours, &input.cost_params);

                trucks.push(TruckAssignment {
                    truck_id: format!("TRUCK-{}", truck_index + 1),
                    destination: order.destination.clone(),
                    tonnes,
                    estimated_cost,
                    estimated_delay_hours: delay_hours,
                });
            } else {
                unassigned.push(order.order_id.clone());
            }
        }

        if !unassigned.is_empty() {
            warn!(
                unassigned_count = unassigned.len(),
                "兜底方案存在未落位订单"
            );
        }

        let summary = summarize_plan(&rakes, &trucks);
        let objective_value = summary.total_cost;

        info!(
            rakes = rakes.len(),
            trucks = trucks.len(),
            unassigned = unassigned.len(),
            total_tonnage = summary.total_tonnage,
            "贪心兜底方案生成完成"
        );

        DailyPlan {
            plan_id: uuid::Uuid::new_v4().to_string(),
            rakes,
            trucks,
            summary,
            solver_status: SolverStatus::GreedyFallback,
            solver_time_seconds: 0.0,
            objective_value,
            unassigned_orders: unassigned,
        }
    }
}
