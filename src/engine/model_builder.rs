// ==========================================
// 成品发运排程系统 - 单日模型构建引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 2.2 Model Builder
// ==========================================
// 职责: 把当日订单/运力/库存翻译为决策变量与约束
// 输入: 订单列表 + 可用专列/汽车数 + 库存
// 输出: 规划模型 + 变量索引登记表
// 红线: 纯构造, 不做 I/O, 不碰共享状态
// ==========================================

use crate::config::DispatchTuning;
use crate::domain::order::Order;
use crate::solver::model::{ConstraintSense, LpModel, OptimizeSense, VarType};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// DispatchVars - 变量索引登记表
// ==========================================
// 目标组装与解读取共用同一张登记表
#[derive(Debug, Clone, Default)]
pub struct DispatchVars {
    // ===== 专列变量 (每可用专列一组) =====
    pub rake_assigned: Vec<usize>,   // 启用标志 (0/1)
    pub rake_wagons: Vec<usize>,     // 车皮数 (整数)
    pub rake_tonnage: Vec<usize>,    // 装载吨位 (连续)
    pub rake_start_slot: Vec<usize>, // 装车起始时段 (建时段约束时存在)
    pub rake_end_slot: Vec<usize>,   // 装车结束时段

    // ===== 汽车变量 (每可用汽车一组) =====
    pub truck_assigned: Vec<usize>, // 启用标志 (0/1)
    pub truck_tonnage: Vec<usize>,  // 装载吨位 (连续)

    // ===== 订单方式变量 (每订单一组, 互斥) =====
    pub order_rail: Vec<usize>, // 铁路发运标志 (0/1)
    pub order_road: Vec<usize>, // 公路发运标志 (0/1)
}

// ==========================================
// DispatchModelBuilder - 单日模型构建引擎
// ==========================================
pub struct DispatchModelBuilder {
    // 无状态引擎, 不需要注入依赖
}

impl DispatchModelBuilder {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 构建单日发运模型
    ///
    /// 约束清单 (依据 Dispatch_Engine_Specs 2.2):
    /// (a) 启用专列的车皮数在 [min, max] 内, 未启用为 0
    /// (b) 启用专列数 <= 可用专列数
    /// (c) 专列吨位 <= 车皮数 * 车皮载重; 汽车吨位 <= 汽车载重
    /// (d) 时段约束: 装车窗口 >= 吨位折算时段, 全日窗口总量 <= K * 装车点 * 时段数
    /// (e) 每订单 铁路标志 + 公路标志 = 1 (两种方式都可行时)
    /// (f) 吨位衔接: 专列吨位合计 = 铁路订单量合计, 汽车同理
    /// (g) 安全库存 (可选): 各物料发运量 <= 在库量 * (1 - 安全库存比例)
    ///
    /// # 参数
    /// - `orders`: 当日订单
    /// - `available_rakes` / `available_trucks`: 可用运力
    /// - `inventory`: 物料在库量
    /// - `tuning`: 调优参数
    ///
    /// # 返回
    /// (规划模型, 变量索引登记表)
    pub fn build(
        &self,
        orders: &[Order],
        available_rakes: u32,
        available_trucks: u32,
        inventory: &HashMap<String, f64>,
        tuning: &DispatchTuning,
    ) -> (LpModel, DispatchVars) {
        let mut model = LpModel::new("single_day_dispatch", OptimizeSense::Minimize);
        let mut vars = DispatchVars::default();

        let rake_cap = tuning.rake_capacity_t();
        let with_slots = tuning.slots_per_day > 0;

        // ===== 专列决策变量 =====
        for r in 0..available_rakes as usize {
            let assigned = model.add_binary(format!("rake_{}_assigned", r));
            let wagons = model.add_var(
                format!("rake_{}_wagons", r),
                VarType::Integer,
                0.0,
                Some(tuning.max_wagons_per_rake as f64),
            );
            let tonnage = model.add_var(
                format!("rake_{}_tonnage", r),
                VarType::Continuous,
                0.0,
                Some(rake_cap),
            );

            // (a) 启用 => 车皮数进入 [min, max]; 未启用 => 0
            model.add_constraint(
                format!("rake_{}_wagons_min", r),
                vec![
                    (wagons, 1.0),
                    (assigned, -(tuning.min_wagons_per_rake as f64)),
                ],
                ConstraintSense::GreaterEqual,
                0.0,
            );
            model.add_constraint(
                format!("rake_{}_wagons_max", r),
                vec![
                    (wagons, 1.0),
                    (assigned, -(tuning.max_wagons_per_rake as f64)),
                ],
                ConstraintSense::LessEqual,
                0.0,
            );

            // (c) 吨位 <= 车皮数 * 车皮载重
            model.add_constraint(
                format!("rake_{}_tonnage_cap", r),
                vec![(tonnage, 1.0), (wagons, -tuning.wagon_capacity_t)],
                ConstraintSense::LessEqual,
                0.0,
            );

            vars.rake_assigned.push(assigned);
            vars.rake_wagons.push(wagons);
            vars.rake_tonnage.push(tonnage);

            // (d) 装车时段窗口变量
            if with_slots {
                let start = model.add_var(
                    format!("rake_{}_start_slot", r),
                    VarType::Integer,
                    0.0,
                    Some(tuning.slots_per_day as f64),
                );
                let end = model.add_var(
                    format!("rake_{}_end_slot", r),
                    VarType::Integer,
                    0.0,
                    Some(tuning.slots_per_day as f64),
                );
                // 窗口长度 >= 吨位折算的最小时段数 (线性下界, 精确取整在成本库)
                let slots_per_tonne =
                    60.0 / (tuning.loading_throughput_tph * tuning.slot_minutes);
                model.add_constraint(
                    format!("rake_{}_loading_window", r),
                    vec![(end, 1.0), (start, -1.0), (tonnage, -slots_per_tonne)],
                    ConstraintSense::GreaterEqual,
                    0.0,
                );
                vars.rake_start_slot.push(start);
                vars.rake_end_slot.push(end);
            }
        }

        // (b) 启用专列数 <= 可用专列数
        if available_rakes > 0 {
            model.add_constraint(
                "rakes_available",
                vars.rake_assigned.iter().map(|&v| (v, 1.0)).collect(),
                ConstraintSense::LessEqual,
                available_rakes as f64,
            );
        }

        // (d) 装车点并装上限: 全日窗口总量 <= K * 装车点数 * 时段数
        if with_slots && available_rakes > 0 {
            let mut terms = Vec::new();
            for r in 0..available_rakes as usize {
                terms.push((vars.rake_end_slot[r], 1.0));
                terms.push((vars.rake_start_slot[r], -1.0));
            }
            model.add_constraint(
                "siding_capacity",
                terms,
                ConstraintSense::LessEqual,
                (tuning.max_rakes_per_loading_point
                    * tuning.loading_points
                    * tuning.slots_per_day) as f64,
            );
        }

        // ===== 汽车决策变量 =====
        for k in 0..available_trucks as usize {
            let assigned = model.add_binary(format!("truck_{}_assigned", k));
            let tonnage = model.add_var(
                format!("truck_{}_tonnage", k),
                VarType::Continuous,
                0.0,
                Some(tuning.truck_capacity_t),
            );
            // (c) 未启用 => 吨位为 0
            model.add_constraint(
                format!("truck_{}_tonnage_cap", k),
                vec![(tonnage, 1.0), (assigned, -tuning.truck_capacity_t)],
                ConstraintSense::LessEqual,
                0.0,
            );
            vars.truck_assigned.push(assigned);
            vars.truck_tonnage.push(tonnage);
        }

        // ===== 订单方式变量 =====
        for (i, order) in orders.iter().enumerate() {
            // 一侧运力为 0 时, 该方式不可行 (变量上界钳 0)
            let rail_upper = if available_rakes > 0 { 1.0 } else { 0.0 };
            let road_upper = if available_trucks > 0 { 1.0 } else { 0.0 };
            let rail = model.add_var(
                format!("order_{}_rail", i),
                VarType::Binary,
                0.0,
                Some(rail_upper),
            );
            let road = model.add_var(
                format!("order_{}_road", i),
                VarType::Binary,
                0.0,
                Some(road_upper),
            );

            // (e) 方式互斥且必选其一
            model.add_constraint(
                format!("order_{}_mode", order.order_id),
                vec![(rail, 1.0), (road, 1.0)],
                ConstraintSense::Equal,
                1.0,
            );

            vars.order_rail.push(rail);
            vars.order_road.push(road);
        }

        // (f) 吨位衔接: 专列吨位合计 = 铁路订单量合计
        let mut rail_link: Vec<(usize, f64)> =
            vars.rake_tonnage.iter().map(|&v| (v, 1.0)).collect();
        for (i, order) in orders.iter().enumerate() {
            rail_link.push((vars.order_rail[i], -order.quantity_t));
        }
        model.add_constraint("rail_tonnage_link", rail_link, ConstraintSense::Equal, 0.0);

        let mut road_link: Vec<(usize, f64)> =
            vars.truck_tonnage.iter().map(|&v| (v, 1.0)).collect();
        for (i, order) in orders.iter().enumerate() {
            road_link.push((vars.order_road[i], -order.quantity_t));
        }
        model.add_constraint("road_tonnage_link", road_link, ConstraintSense::Equal, 0.0);

        // (g) 安全库存约束 (可选, 只约束在库物料)
        if tuning.safety_stock_pct > 0.0 {
            let mut by_material: HashMap<&str, Vec<usize>> = HashMap::new();
            for (i, order) in orders.iter().enumerate() {
                by_material.entry(order.material.as_str()).or_default().push(i);
            }
            for (material, idxs) in by_material {
                let Some(&stock) = inventory.get(material) else {
                    continue;
                };
                let dispatchable = stock * (1.0 - tuning.safety_stock_pct);
                let mut terms = Vec::new();
                for &i in &idxs {
                    terms.push((vars.order_rail[i], orders[i].quantity_t));
                    terms.push((vars.order_road[i], orders[i].quantity_t));
                }
                model.add_constraint(
                    format!("safety_stock_{}", material),
                    terms,
                    ConstraintSense::LessEqual,
                    dispatchable,
                );
            }
        }

        debug!(
            orders = orders.len(),
            rakes = available_rakes,
            trucks = available_trucks,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "单日发运模型构建完成"
        );

        (model, vars)
    }
}
