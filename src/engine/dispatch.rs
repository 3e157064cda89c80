// ==========================================
// 成品发运排程系统 - 单日发运编排器
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 3. Solver Orchestrator
// ==========================================
// 状态机: Idle -> Building -> Solving -> {Solved | Fallback} -> Done
// 红线: 求解崩溃只触发兜底, 不向上冒泡;
//       空订单直接短路为 EMPTY_INPUT 零方案
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::order::{Order, ResourceCounts};
use crate::domain::params::{CostParameters, PredictionSet};
use crate::domain::plan::{DailyPlan, RakeAssignment, TruckAssignment};
use crate::domain::types::SolverStatus;
use crate::engine::costs;
use crate::engine::fallback::GreedyFallback;
use crate::engine::model_builder::{DispatchModelBuilder, DispatchVars};
use crate::engine::objective::ObjectiveComposer;
use crate::engine::summarize_plan;
use crate::solver::{HighsEngine, LpSolution, SolveStatus, SolverEngine};
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// DispatchInput - 单日排程请求
// ==========================================
// 一次优化调用构造一次, 核心内只读
#[derive(Debug, Clone)]
pub struct DispatchInput {
    pub orders: Vec<Order>,              // 当日订单
    pub resources: ResourceCounts,       // 当日可用运力
    pub inventory: HashMap<String, f64>, // 物料在库量 (InventoryRecord::fold 产出)
    pub predictions: PredictionSet,      // 外部 ML 预测
    pub cost_params: CostParameters,     // 费率参数
    pub planning_datetime: Option<NaiveDateTime>, // 排程时刻 (缺省取当前时刻)
}

impl DispatchInput {
    /// SLA 基准时刻
    pub fn now(&self) -> NaiveDateTime {
        self.planning_datetime
            .unwrap_or_else(|| Utc::now().naive_utc())
    }
}

// ==========================================
// DispatchEngine - 单日发运编排器
// ==========================================
pub struct DispatchEngine {
    tuning: DispatchTuning,
    builder: DispatchModelBuilder,
    composer: ObjectiveComposer,
    fallback: GreedyFallback,
    solver: Box<dyn SolverEngine>,
}

impl DispatchEngine {
    /// 构造编排器 (默认 HiGHS 引擎)
    pub fn new(tuning: DispatchTuning) -> Self {
        Self::with_solver(tuning, Box::new(HighsEngine::new()))
    }

    /// 注入自定义求解引擎 (测试/替换引擎用)
    pub fn with_solver(tuning: DispatchTuning, solver: Box<dyn SolverEngine>) -> Self {
        Self {
            tuning,
            builder: DispatchModelBuilder::new(),
            composer: ObjectiveComposer::new(),
            fallback: GreedyFallback::new(),
            solver,
        }
    }

    pub fn tuning(&self) -> &DispatchTuning {
        &self.tuning
    }

    /// 执行单日排程流程
    ///
    /// 步骤: 建模 -> 组目标 -> 限时求解 -> 读解 / 兜底
    ///
    /// # 返回
    /// 单日发运方案 (总能产出, 不返回错误)
    pub fn plan_single_day(&self, input: &DispatchInput) -> DailyPlan {
        // 空订单短路
        if input.orders.is_empty() {
            info!("订单为空, 返回 EMPTY_INPUT 零方案");
            return DailyPlan::empty();
        }

        info!(
            orders = input.orders.len(),
            rakes = input.resources.available_rakes,
            trucks = input.resources.available_trucks,
            "开始单日发运排程"
        );

        // ==========================================
        // 步骤1: Building - 构建模型
        // ==========================================
        let (mut model, vars) = self.builder.build(
            &input.orders,
            input.resources.available_rakes,
            input.resources.available_trucks,
            &input.inventory,
            &self.tuning,
        );

        // ==========================================
        // 步骤2: 组装目标函数
        // ==========================================
        self.composer.compose(
            &mut model,
            &vars,
            &input.orders,
            &input.predictions,
            &input.cost_params,
            &self.tuning,
            input.now(),
        );

        // ==========================================
        // 步骤3: Solving - 限时求解
        // ==========================================
        let control = self.tuning.solve_control();
        let solution = match self.solver.solve(&model, &control) {
            Ok(solution) if solution.status.is_usable() => solution,
            Ok(solution) => {
                warn!(
                    status = %solution.status,
                    "求解无可用解, 转入贪心兜底"
                );
                return self.fallback.plan(input, &self.tuning);
            }
            Err(err) => {
                warn!(error = %err, "求解引擎异常, 转入贪心兜底");
                return self.fallback.plan(input, &self.tuning);
            }
        };

        // ==========================================
        // 步骤4: Solved - 读解组方案
        // ==========================================
        let plan = self.extract_plan(input, &vars, &solution);

        info!(
            status = %plan.solver_status,
            total_rakes = plan.summary.total_rakes,
            total_trucks = plan.summary.total_trucks,
            total_tonnage = plan.summary.total_tonnage,
            objective = plan.objective_value,
            solve_seconds = plan.solver_time_seconds,
            "单日发运排程完成"
        );

        plan
    }

    /// 从求解结果还原发运方案
    ///
    /// 目的地分摊: 模型只决定订单方式与各列吨位,
    /// 铁路订单按顺序倾注到启用专列, 专列目的地取首个倾注订单
    fn extract_plan(
        &self,
        input: &DispatchInput,
        vars: &DispatchVars,
        solution: &LpSolution,
    ) -> DailyPlan {
        let demurrage_hours = input
            .predictions
            .demurrage_or(self.tuning.default_demurrage_hours);

        // 铁路订单队列 (订单ID, 目的地, 余量)
        let mut rail_queue: Vec<(usize, f64)> = Vec::new();
        let mut road_queue: Vec<(usize, f64)> = Vec::new();
        for (i, order) in input.orders.iter().enumerate() {
            if solution.bool_value(vars.order_rail[i]) {
                rail_queue.push((i, order.quantity_t));
            } else if solution.bool_value(vars.order_road[i]) {
                road_queue.push((i, order.quantity_t));
            }
        }
        let mut rail_cursor = 0usize;
        let mut road_cursor = 0usize;

        // ===== 专列决策 =====
        let mut rakes: Vec<RakeAssignment> = Vec::new();
        for r in 0..vars.rake_assigned.len() {
            if !solution.bool_value(vars.rake_assigned[r]) {
                continue;
            }
            let wagons = solution.int_value(vars.rake_wagons[r]).max(0) as u32;
            let tonnes = solution.value(vars.rake_tonnage[r]).max(0.0);
            // 退化解防护: 启用标志为 1 但实际零吨位的专列不出方案
            if tonnes <= 1e-6 {
                continue;
            }

            // 按顺序倾注铁路订单, 统计该列覆盖的目的地
            let mut remaining = tonnes;
            let mut destinations: Vec<String> = Vec::new();
            while remaining > 1e-6 && rail_cursor < rail_queue.len() {
                let entry = &mut rail_queue[rail_cursor];
                let take = entry.1.min(remaining);
                entry.1 -= take;
                remaining -= take;
                let dest = input.orders[entry.0].destination.clone();
                if !destinations.contains(&dest) {
                    destinations.push(dest);
                }
                if entry.1 <= 1e-6 {
                    rail_cursor += 1;
                }
            }
            let destination = destinations
                .first()
                .cloned()
                .unwrap_or_else(|| "UNSPECIFIED".to_string());
            let delay_hours = input.predictions.rake_delay(r);

            let estimated_cost =
                costs::rail_leg_cost(tonnes, &destination, &input.cost_params)
                    + costs::demurrage_cost(wagons, demurrage_hours, &input.cost_params)
                    + costs::delay_penalty(delay_hours, &input.cost_params)
                    + costs::partial_rake_penalty(wagons, &input.cost_params, &self.tuning)
                    + costs::multi_destination_penalty(destinations.len(), &input.cost_params);

            rakes.push(RakeAssignment {
                rake_id: format!("RAKE-{}", rakes.len() + 1),
                destination,
                tonnes,
                wagons,
                loading_slots: costs::min_loading_slots(tonnes, &self.tuning),
                estimated_cost,
                estimated_delay_hours: delay_hours,
            });
        }

        // ===== 汽车决策 =====
        let mut trucks: Vec<TruckAssignment> = Vec::new();
        for k in 0..vars.truck_assigned.len() {
            if !solution.bool_value(vars.truck_assigned[k]) {
                continue;
            }
            let tonnes = solution.value(vars.truck_tonnage[k]).max(0.0);
            if tonnes <= 1e-6 {
                continue;
            }

            // 倾注公路订单确定目的地
            let mut remaining = tonnes;
            let mut destination: Option<String> = None;
            while remaining > 1e-6 && road_cursor < road_queue.len() {
                let entry = &mut road_queue[road_cursor];
                let take = entry.1.min(remaining);
                entry.1 -= take;
                remaining -= take;
                let order_idx = entry.0;
                destination
                    .get_or_insert_with(|| input.orders[order_idx].destination.clone());
                if entry.1 <= 1e-6 {
                    road_cursor += 1;
                }
            }
            let destination = destination.unwrap_or_else(|| "UNSPECIFIED".to_string());
            let delay_hours = input.predictions.truck_delay(k);

            let estimated_cost =
                costs::road_leg_cost(tonnes, &destination, &input.cost_params)
                    + costs::delay_penalty(delay_hours, &input.cost_params);

            trucks.push(TruckAssignment {
                truck_id: format!("TRUCK-{}", trucks.len() + 1),
                destination,
                tonnes,
                estimated_cost,
                estimated_delay_hours: delay_hours,
            });
        }

        let summary = summarize_plan(&rakes, &trucks);
        let solver_status = match solution.status {
            SolveStatus::Optimal => SolverStatus::Optimal,
            _ => SolverStatus::Feasible,
        };

        debug!(
            rakes = rakes.len(),
            trucks = trucks.len(),
            "求解结果还原完成"
        );

        DailyPlan {
            plan_id: uuid::Uuid::new_v4().to_string(),
            rakes,
            trucks,
            summary,
            solver_status,
            solver_time_seconds: solution.solve_time_seconds,
            objective_value: solution.objective_value.unwrap_or(0.0),
            unassigned_orders: Vec::new(),
        }
    }
}
