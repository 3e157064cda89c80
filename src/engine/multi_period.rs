// ==========================================
// 成品发运排程系统 - 多日分解引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 6. Multi-Period Decomposer
// ==========================================
// 职责: 订单分日 (迟交 vs 产能平衡模型) + 逐日调用单日流程 + 跨日汇总
// 红线: 周期为 1 天时直通单日流程, 不建分桶模型
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::order::Order;
use crate::domain::plan::{DailyBucket, DailyPlanSlot, MultiPeriodPlan, PlanSummary};
use crate::engine::dispatch::{DispatchEngine, DispatchInput};
use crate::solver::{
    ConstraintSense, HighsEngine, LpModel, OptimizeSense, SolverEngine, VarType,
};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

// ==========================================
// MultiPeriodInput - 多日排程请求
// ==========================================
// 运力/费率/预测假定每日相同 (调用方可逐日变更后分次调用)
#[derive(Debug, Clone)]
pub struct MultiPeriodInput {
    pub base: DispatchInput,   // 单日输入 (订单为全周期订单)
    pub horizon_days: u32,     // 排程周期天数 (>= 1)
    pub start_date: NaiveDate, // 周期起始日期
}

// ==========================================
// MultiPeriodPlanner - 多日分解引擎
// ==========================================
pub struct MultiPeriodPlanner {
    tuning: DispatchTuning,
    day_engine: DispatchEngine,
    bucket_solver: Box<dyn SolverEngine>,
}

impl MultiPeriodPlanner {
    /// 构造函数 (默认 HiGHS 引擎)
    pub fn new(tuning: DispatchTuning) -> Self {
        Self {
            day_engine: DispatchEngine::new(tuning.clone()),
            bucket_solver: Box::new(HighsEngine::new()),
            tuning,
        }
    }

    /// 执行多日排程
    ///
    /// 步骤 (依据 Dispatch_Engine_Specs 6):
    /// 1) 推导订单交付日序号 (相对最早交付期)
    /// 2) 建分桶模型: 订单 x 日 0/1 变量, 每单恰好一日
    /// 3) 软产能约束: 超产能走松弛变量, 罚不禁止
    /// 4) 目标: 迟交罚金 + 约 50 倍权重的超产能罚金
    /// 5) 逐非空日调用单日流程
    /// 6) 跨日汇总
    pub fn plan(&self, input: &MultiPeriodInput) -> MultiPeriodPlan {
        let horizon = input.horizon_days.max(1);

        // 周期为 1: 直通单日流程
        if horizon == 1 {
            info!("排程周期为 1 天, 直通单日流程");
            let day_plan = self.day_engine.plan_single_day(&input.base);
            let summary = day_plan.summary.clone();
            let order_count = input.base.orders.len();
            return MultiPeriodPlan {
                plan_id: uuid::Uuid::new_v4().to_string(),
                horizon_days: 1,
                start_date: input.start_date,
                daily_plans: vec![DailyPlanSlot {
                    day_index: 0,
                    date: input.start_date,
                    has_plan: true,
                    rake_plan: Some(day_plan),
                }],
                summary,
                input_summary: vec![(0, order_count)],
                bucketing_fallback: false,
            };
        }

        info!(
            orders = input.base.orders.len(),
            horizon_days = horizon,
            start_date = %input.start_date,
            "开始多日发运排程"
        );

        // ==========================================
        // 步骤1: 交付日序号
        // ==========================================
        let due_days = derive_due_days(&input.base.orders, horizon);

        // ==========================================
        // 步骤2-4: 分桶模型求解 (失败走贪心分桶)
        // ==========================================
        let (buckets, bucketing_fallback) =
            match self.solve_bucketing(&input.base, horizon, &due_days, input.start_date) {
                Some(buckets) => (buckets, false),
                None => {
                    warn!("分桶模型无可用解, 转入按交付日贪心分桶");
                    (
                        greedy_buckets(&input.base.orders, horizon, &due_days, input.start_date),
                        true,
                    )
                }
            };

        // ==========================================
        // 步骤5: 逐日单日流程
        // ==========================================
        let mut daily_plans = Vec::with_capacity(horizon as usize);
        let mut input_summary = Vec::with_capacity(horizon as usize);
        let mut summary = PlanSummary::default();
        let mut rail_tonnage = 0.0;

        for bucket in &buckets {
            input_summary.push((bucket.day_index, bucket.order_ids.len()));

            if bucket.order_ids.is_empty() {
                daily_plans.push(DailyPlanSlot {
                    day_index: bucket.day_index,
                    date: bucket.date,
                    has_plan: false,
                    rake_plan: None,
                });
                continue;
            }

            let day_orders: Vec<Order> = input
                .base
                .orders
                .iter()
                .filter(|o| bucket.order_ids.contains(&o.order_id))
                .cloned()
                .collect();
            let day_input = DispatchInput {
                orders: day_orders,
                ..input.base.clone()
            };

            let day_plan = self.day_engine.plan_single_day(&day_input);

            // 跨日累计
            summary.total_cost += day_plan.summary.total_cost;
            summary.total_tonnage += day_plan.summary.total_tonnage;
            summary.total_rakes += day_plan.summary.total_rakes;
            summary.total_trucks += day_plan.summary.total_trucks;
            rail_tonnage += day_plan.rakes.iter().map(|r| r.tonnes).sum::<f64>();

            daily_plans.push(DailyPlanSlot {
                day_index: bucket.day_index,
                date: bucket.date,
                has_plan: true,
                rake_plan: Some(day_plan),
            });
        }

        // ==========================================
        // 步骤6: 跨日汇总
        // ==========================================
        if summary.total_tonnage > 0.0 {
            summary.rail_vs_road_ratio = rail_tonnage / summary.total_tonnage;
        }
        summary.estimated_completion_days =
            daily_plans.iter().filter(|s| s.has_plan).count() as u32;

        info!(
            days_with_plan = summary.estimated_completion_days,
            total_tonnage = summary.total_tonnage,
            total_cost = summary.total_cost,
            bucketing_fallback,
            "多日发运排程完成"
        );

        MultiPeriodPlan {
            plan_id: uuid::Uuid::new_v4().to_string(),
            horizon_days: horizon,
            start_date: input.start_date,
            daily_plans,
            summary,
            input_summary,
            bucketing_fallback,
        }
    }

    /// 分桶模型: 变量 x[i][t] = 订单 i 排在第 t 天
    ///
    /// 目标 = Σ 量 * 优先级权重 * max(0, t - 交付日) * 日迟交罚金
    ///      + Σ 超产能量 * 超产能罚金 (约 50 倍权重)
    fn solve_bucketing(
        &self,
        base: &DispatchInput,
        horizon: u32,
        due_days: &[u32],
        start_date: NaiveDate,
    ) -> Option<Vec<DailyBucket>> {
        let orders = &base.orders;
        if orders.is_empty() {
            return Some(empty_buckets(horizon, start_date));
        }

        let mut model = LpModel::new("multi_period_bucketing", OptimizeSense::Minimize);
        let total_demand: f64 = orders.iter().map(|o| o.quantity_t).sum();
        let daily_cap = self.tuning.daily_capacity_t(
            base.resources.available_rakes,
            base.resources.available_trucks,
        );
        let overcap_penalty =
            self.tuning.lateness_penalty_per_t_day * self.tuning.overcapacity_penalty_factor;

        // x[i][t] 变量 + 每单恰好一日
        let mut x = Vec::with_capacity(orders.len());
        for (i, order) in orders.iter().enumerate() {
            let weight = base.cost_params.priority_weight(order.priority);
            let mut row = Vec::with_capacity(horizon as usize);
            for t in 0..horizon {
                let var = model.add_binary(format!("order_{}_day_{}", i, t));
                let late_days = t.saturating_sub(due_days[i]) as f64;
                model.add_objective_term(
                    var,
                    order.quantity_t * weight * late_days * self.tuning.lateness_penalty_per_t_day,
                );
                row.push(var);
            }
            model.add_constraint(
                format!("order_{}_one_day", order.order_id),
                row.iter().map(|&v| (v, 1.0)).collect(),
                ConstraintSense::Equal,
                1.0,
            );
            x.push(row);
        }

        // 软产能约束: Σ 量 x[i][t] - over[t] <= 日产能
        for t in 0..horizon as usize {
            let over = model.add_var(
                format!("overcap_day_{}", t),
                VarType::Continuous,
                0.0,
                Some(total_demand),
            );
            model.add_objective_term(over, overcap_penalty);

            let mut terms: Vec<(usize, f64)> = orders
                .iter()
                .enumerate()
                .map(|(i, o)| (x[i][t], o.quantity_t))
                .collect();
            terms.push((over, -1.0));
            model.add_constraint(
                format!("daily_capacity_{}", t),
                terms,
                ConstraintSense::LessEqual,
                daily_cap,
            );
        }

        let control = self.tuning.solve_control();
        let solution = match self.bucket_solver.solve(&model, &control) {
            Ok(solution) if solution.status.is_usable() => solution,
            Ok(_) | Err(_) => return None,
        };

        // 读解组桶
        let mut buckets = empty_buckets(horizon, start_date);
        for (i, order) in orders.iter().enumerate() {
            let day = (0..horizon as usize)
                .find(|&t| solution.bool_value(x[i][t]))
                .unwrap_or(due_days[i] as usize);
            buckets[day].order_ids.push(order.order_id.clone());
        }

        debug!(
            days = horizon,
            objective = solution.objective_value.unwrap_or(0.0),
            "分桶模型求解完成"
        );
        Some(buckets)
    }
}

/// 推导订单交付日序号 (相对最早交付期, 钳到周期内)
///
/// 规则: 无交付期的订单排周期末日; 全部无交付期时排第 0 天
fn derive_due_days(orders: &[Order], horizon: u32) -> Vec<u32> {
    let earliest = orders.iter().filter_map(|o| o.due_date).min();
    orders
        .iter()
        .map(|order| match (order.due_date, earliest) {
            (Some(due), Some(earliest)) => {
                let days = (due - earliest).num_days().max(0) as u32;
                days.min(horizon - 1)
            }
            (None, Some(_)) => horizon - 1,
            (_, None) => 0,
        })
        .collect()
}

/// 贪心分桶: 按交付日直排, 不做产能平衡
fn greedy_buckets(
    orders: &[Order],
    horizon: u32,
    due_days: &[u32],
    start_date: NaiveDate,
) -> Vec<DailyBucket> {
    let mut buckets = empty_buckets(horizon, start_date);
    for (i, order) in orders.iter().enumerate() {
        buckets[due_days[i] as usize]
            .order_ids
            .push(order.order_id.clone());
    }
    buckets
}

fn empty_buckets(horizon: u32, start_date: NaiveDate) -> Vec<DailyBucket> {
    (0..horizon)
        .map(|t| DailyBucket {
            day_index: t,
            date: start_date + Duration::days(t as i64),
            order_ids: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Priority;

    fn order_due(id: &str, qty: f64, due: Option<NaiveDate>) -> Order {
        Order::new(id, "HR_COIL", "PATNA", qty, Priority::Medium, due)
    }

    #[test]
    fn test_derive_due_days_relative_to_earliest() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day);
        let orders = vec![
            order_due("O1", 100.0, d(5)),
            order_due("O2", 100.0, d(7)),
            order_due("O3", 100.0, None),
        ];
        let due_days = derive_due_days(&orders, 3);
        assert_eq!(due_days, vec![0, 2, 2], "无交付期排周期末日");
    }

    #[test]
    fn test_derive_due_days_no_due_dates_at_all() {
        let orders = vec![order_due("O1", 100.0, None)];
        assert_eq!(derive_due_days(&orders, 5), vec![0]);
    }

    #[test]
    fn test_greedy_buckets_every_order_in_one_bucket() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day);
        let orders = vec![
            order_due("O1", 100.0, d(1)),
            order_due("O2", 100.0, d(2)),
            order_due("O3", 100.0, d(2)),
        ];
        let due_days = derive_due_days(&orders, 3);
        let buckets = greedy_buckets(&orders, 3, &due_days, d(1).unwrap());
        let total: usize = buckets.iter().map(|b| b.order_ids.len()).sum();
        assert_eq!(total, 3, "每个订单恰好属于一个桶");
        assert_eq!(buckets[0].order_ids, vec!["O1".to_string()]);
    }
}
