// ==========================================
// 成品发运排程系统 - 目标函数组装引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 2.3 Objective Composer
// ==========================================
// 职责: 在已建模型上叠加各项成本/罚金系数
// 红线: 所有罚金系数来自参数, 不硬编码
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::order::Order;
use crate::domain::params::{CostParameters, PredictionSet};
use crate::domain::types::TransportMode;
use crate::engine::costs;
use crate::engine::model_builder::DispatchVars;
use crate::solver::model::LpModel;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// ObjectiveComposer - 目标函数组装引擎
// ==========================================
pub struct ObjectiveComposer {
    // 无状态引擎, 不需要注入依赖
}

impl ObjectiveComposer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 组装最小化目标
    ///
    /// 成本项清单 (依据 Dispatch_Engine_Specs 2.3):
    /// 1) 铁路运费 (含高成本目的地加价) -> 订单铁路标志
    /// 2) 公路运费 (运距相关) -> 订单公路标志
    /// 3) 滞留费 -> 车皮数
    /// 4) 延误罚金 -> 专列/汽车启用标志
    /// 5) 非整列加价 (线性化) -> 启用标志 + 车皮数
    /// 6) 一列多目的地罚金 (粗粒度线性化) -> 启用标志
    /// 7) SLA 迟交罚金 (交付期感知, 分方式计延误) -> 方式标志
    /// 8) 推荐方式不一致罚金 -> 相反方式标志
    ///
    /// # 参数
    /// - `now`: 排程时刻 (SLA 剩余小时的基准)
    pub fn compose(
        &self,
        model: &mut LpModel,
        vars: &DispatchVars,
        orders: &[Order],
        predictions: &PredictionSet,
        params: &CostParameters,
        tuning: &DispatchTuning,
        now: NaiveDateTime,
    ) {
        let demurrage_hours = predictions.demurrage_or(tuning.default_demurrage_hours);

        // 多目的地罚金的粗粒度摊派: 每启用专列按 ceil(目的地数/专列数)-1 计
        let destinations: HashSet<&str> =
            orders.iter().map(|o| o.destination.as_str()).collect();
        let rake_count = vars.rake_assigned.len();
        let extra_dest_per_rake = if rake_count > 0 {
            let spread =
                (destinations.len() as f64 / rake_count as f64).ceil() as usize;
            costs::multi_destination_penalty(spread, params)
        } else {
            0.0
        };

        // ===== 专列侧成本 =====
        let partial_unit = params.freight_rate_per_t
            * tuning.wagon_capacity_t
            * params.partial_rake_surcharge_pct;
        for r in 0..rake_count {
            // 滞留费: 每车皮 * 预测滞留小时 * 费率
            model.add_objective_term(
                vars.rake_wagons[r],
                demurrage_hours * params.demurrage_rate_per_wagon_hour,
            );
            // 延误罚金
            model.add_objective_term(
                vars.rake_assigned[r],
                costs::delay_penalty(predictions.rake_delay(r), params),
            );
            // 非整列加价: pct * 运费 * 车皮载重 * (整列车皮数*启用 - 实际车皮数)
            model.add_objective_term(
                vars.rake_assigned[r],
                partial_unit * tuning.full_rake_wagons as f64,
            );
            model.add_objective_term(vars.rake_wagons[r], -partial_unit);
            // 多目的地罚金 (粗粒度)
            model.add_objective_term(vars.rake_assigned[r], extra_dest_per_rake);
        }

        // ===== 汽车侧成本 =====
        for k in 0..vars.truck_assigned.len() {
            model.add_objective_term(
                vars.truck_assigned[k],
                costs::delay_penalty(predictions.truck_delay(k), params),
            );
        }

        // ===== 订单侧成本 (方式标志) =====
        let mean_rake_delay = mean_delay(&|r| predictions.rake_delay(r), rake_count);
        let mean_truck_delay =
            mean_delay(&|k| predictions.truck_delay(k), vars.truck_assigned.len());

        for (i, order) in orders.iter().enumerate() {
            let dest_extra = predictions.destination_extra_cost(&order.destination);

            // 运费
            model.add_objective_term(
                vars.order_rail[i],
                costs::rail_leg_cost(order.quantity_t, &order.destination, params) + dest_extra,
            );
            model.add_objective_term(
                vars.order_road[i],
                costs::road_leg_cost(order.quantity_t, &order.destination, params) + dest_extra,
            );

            // SLA 迟交罚金: 分方式计入预测延误后的剩余小时
            if let Some(due) = order.due_date {
                let hours_to_due =
                    (due.and_hms_opt(0, 0, 0).unwrap_or_default() - now).num_minutes() as f64
                        / 60.0;
                let sla_rail = costs::sla_penalty(
                    hours_to_due - mean_rake_delay,
                    order.quantity_t,
                    order.priority,
                    params,
                    tuning,
                );
                let sla_road = costs::sla_penalty(
                    hours_to_due - mean_truck_delay,
                    order.quantity_t,
                    order.priority,
                    params,
                    tuning,
                );
                model.add_objective_term(vars.order_rail[i], sla_rail);
                model.add_objective_term(vars.order_road[i], sla_road);
            }

            // 推荐方式不一致罚金
            match predictions.mode_for_order(&order.order_id) {
                Some(TransportMode::Rail) => model.add_objective_term(
                    vars.order_road[i],
                    costs::mode_mismatch_penalty(order.quantity_t, params),
                ),
                Some(TransportMode::Road) => model.add_objective_term(
                    vars.order_rail[i],
                    costs::mode_mismatch_penalty(order.quantity_t, params),
                ),
                None => {}
            }
        }

        debug!(
            orders = orders.len(),
            destinations = destinations.len(),
            demurrage_hours,
            "目标函数组装完成"
        );
    }
}

/// 可用资源的平均预测延误 (无资源时取 0)
fn mean_delay(delay_of: &dyn Fn(usize) -> f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (0..count).map(delay_of).sum::<f64>() / count as f64
}
