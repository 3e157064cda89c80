// ==========================================
// 成品发运排程系统 - 车皮级装载优化引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 7. Loading Optimizer
// ==========================================
// 职责: 单模板内成品 -> 仓位的 0/1 指派优化
// 约束: 仓位重量上限 / 车皮载重上限 / 尺寸适配
// 目标: 最大化 Σ 重量 * (10 + 优先级分), 重件高优先级优先
// ==========================================

use crate::domain::loading::{LoadAssignment, LoadingPlan, Product, RakeTemplate};
use crate::engine::error::DispatchError;
use crate::solver::{
    ConstraintSense, HighsEngine, LpModel, OptimizeSense, SolveControl, SolverEngine,
};
use tracing::{debug, info};

/// 优先级分 (HIGH=3, MEDIUM=2, LOW=1), 装载目标用
fn priority_score(product: &Product) -> f64 {
    (4 - product.priority.rank()) as f64
}

// ==========================================
// LoadingOptimizer - 装载优化引擎
// ==========================================
pub struct LoadingOptimizer {
    solver: Box<dyn SolverEngine>,
    control: SolveControl,
}

impl LoadingOptimizer {
    /// 构造函数 (默认 HiGHS 引擎与默认求解预算)
    pub fn new() -> Self {
        Self {
            solver: Box::new(HighsEngine::new()),
            control: SolveControl::default(),
        }
    }

    /// 注入自定义求解引擎与预算
    pub fn with_solver(solver: Box<dyn SolverEngine>, control: SolveControl) -> Self {
        Self { solver, control }
    }

    /// 求解单模板装载方案
    ///
    /// # 参数
    /// - `allow_unassigned`: true = 允许留装 (每件至多一仓位);
    ///   false = 必须全装 (每件恰好一仓位, 不可行即报错)
    ///
    /// # 返回
    /// 装载方案; 禁止留装且不可行时返回 LoadingInfeasible
    pub fn optimize(
        &self,
        products: &[Product],
        template: &RakeTemplate,
        allow_unassigned: bool,
    ) -> Result<LoadingPlan, DispatchError> {
        let wagons = template.expand();

        let mut model = LpModel::new(
            format!("loading_{}", template.template_id),
            OptimizeSense::Maximize,
        );

        // 尺寸适配的 (成品, 车皮, 仓位) 三元组才建变量
        // pair: (成品序号, 车皮序号, 仓位序号, 变量索引)
        let mut pairs: Vec<(usize, usize, usize, usize)> = Vec::new();
        for (p, product) in products.iter().enumerate() {
            for (w, wagon) in wagons.iter().enumerate() {
                for (s, slot) in wagon.slots.iter().enumerate() {
                    if !product.fits_in(slot) {
                        continue;
                    }
                    let var = model.add_binary(format!(
                        "load_{}_{}",
                        product.product_id, slot.slot_id
                    ));
                    model.add_objective_term(
                        var,
                        product.weight_t * (10.0 + priority_score(product)),
                    );
                    pairs.push((p, w, s, var));
                }
            }
        }

        // 每件成品: 至多/恰好落一个仓位
        for (p, product) in products.iter().enumerate() {
            let terms: Vec<(usize, f64)> = pairs
                .iter()
                .filter(|&&(pi, _, _, _)| pi == p)
                .map(|&(_, _, _, var)| (var, 1.0))
                .collect();
            if allow_unassigned {
                if terms.is_empty() {
                    continue; // 无可装仓位, 直接留装
                }
                model.add_constraint(
                    format!("product_{}_at_most_once", product.product_id),
                    terms,
                    ConstraintSense::LessEqual,
                    1.0,
                );
            } else {
                // 无可装仓位时为空约束 0=1, 模型不可行, 统一走报错出口
                model.add_constraint(
                    format!("product_{}_exactly_once", product.product_id),
                    terms,
                    ConstraintSense::Equal,
                    1.0,
                );
            }
        }

        // 仓位重量上限
        for (w, wagon) in wagons.iter().enumerate() {
            for (s, slot) in wagon.slots.iter().enumerate() {
                let terms: Vec<(usize, f64)> = pairs
                    .iter()
                    .filter(|&&(_, wi, si, _)| wi == w && si == s)
                    .map(|&(pi, _, _, var)| (var, products[pi].weight_t))
                    .collect();
                if !terms.is_empty() {
                    model.add_constraint(
                        format!("slot_{}_weight", slot.slot_id),
                        terms,
                        ConstraintSense::LessEqual,
                        slot.max_weight_t,
                    );
                }
            }
        }

        // 车皮载重上限
        for (w, wagon) in wagons.iter().enumerate() {
            let terms: Vec<(usize, f64)> = pairs
                .iter()
                .filter(|&&(_, wi, _, _)| wi == w)
                .map(|&(pi, _, _, var)| (var, products[pi].weight_t))
                .collect();
            if !terms.is_empty() {
                model.add_constraint(
                    format!("wagon_{}_payload", wagon.wagon_id),
                    terms,
                    ConstraintSense::LessEqual,
                    wagon.payload_limit_t,
                );
            }
        }

        debug!(
            template = %template.template_id,
            products = products.len(),
            wagons = wagons.len(),
            pairs = pairs.len(),
            "装载模型构建完成"
        );

        let solution = self.solver.solve(&model, &self.control)?;
        if !solution.status.is_usable() {
            return Err(DispatchError::LoadingInfeasible {
                template_id: template.template_id.clone(),
            });
        }

        // 读解组方案
        let mut assignments = Vec::new();
        let mut assigned_flags = vec![false; products.len()];
        let mut total_loaded_t = 0.0;
        for &(p, w, s, var) in &pairs {
            if solution.bool_value(var) {
                assignments.push(LoadAssignment {
                    product_id: products[p].product_id.clone(),
                    wagon_id: wagons[w].wagon_id.clone(),
                    slot_id: wagons[w].slots[s].slot_id.clone(),
                });
                assigned_flags[p] = true;
                total_loaded_t += products[p].weight_t;
            }
        }

        let unassigned_products: Vec<String> = products
            .iter()
            .zip(assigned_flags.iter())
            .filter(|(_, &assigned)| !assigned)
            .map(|(p, _)| p.product_id.clone())
            .collect();

        let total_payload_t = template.total_payload_t();
        let utilization_pct = if total_payload_t > 0.0 {
            (total_loaded_t / total_payload_t * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        info!(
            template = %template.template_id,
            loaded = assignments.len(),
            unassigned = unassigned_products.len(),
            total_loaded_t,
            utilization_pct,
            "装载优化完成"
        );

        Ok(LoadingPlan {
            template_id: template.template_id.clone(),
            wagons,
            assignments,
            total_loaded_t,
            utilization_pct,
            unassigned_products,
        })
    }
}

impl Default for LoadingOptimizer {
    fn default() -> Self {
        Self::new()
    }
}
