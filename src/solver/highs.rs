// ==========================================
// 成品发运排程系统 - HiGHS 求解引擎适配器
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 3.1 求解器可插拔设计
// ==========================================
// 职责: 把中立规划模型翻译为 HiGHS API 调用
// 约定: 静默求解, 时限/种子/线程数由 SolveControl 下发
// ==========================================

use crate::solver::model::{
    ConstraintSense, LpModel, LpSolution, SolveControl, SolveStatus, SolverEngine, SolverError,
    VarType,
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

// ==========================================
// HighsEngine - HiGHS 适配器
// ==========================================
pub struct HighsEngine {
    // 无状态引擎, 每次求解构造独立的 HiGHS 问题实例
}

impl HighsEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for HighsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverEngine for HighsEngine {
    fn solve(&self, model: &LpModel, control: &SolveControl) -> Result<LpSolution, SolverError> {
        model.validate()?;

        let start = Instant::now();
        let num_vars = model.num_variables();

        // 变量先行, 再逐行加约束 (RowProblem 模式)
        let mut problem = RowProblem::default();
        let mut cols = Vec::with_capacity(num_vars);

        for (idx, var) in model.variables.iter().enumerate() {
            let upper = var.upper.unwrap_or(f64::INFINITY);
            let obj_coeff = model.objective[idx];
            let col = match var.var_type {
                VarType::Integer | VarType::Binary => {
                    problem.add_integer_column(obj_coeff, var.lower..upper)
                }
                VarType::Continuous => problem.add_column(obj_coeff, var.lower..upper),
            };
            cols.push(col);
        }

        for constraint in &model.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|&&(_, coeff)| coeff != 0.0)
                .map(|&(idx, coeff)| (cols[idx], coeff))
                .collect();

            match constraint.sense {
                ConstraintSense::LessEqual => {
                    problem.add_row(..=constraint.bound, &terms);
                }
                ConstraintSense::Equal => {
                    problem.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintSense::GreaterEqual => {
                    problem.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match model.sense {
            crate::solver::model::OptimizeSense::Minimize => Sense::Minimise,
            crate::solver::model::OptimizeSense::Maximize => Sense::Maximise,
        };

        let mut highs_model = problem.optimise(sense);
        highs_model.set_option("output_flag", false);
        highs_model.set_option("time_limit", control.time_limit_seconds.max(0.1));
        highs_model.set_option("random_seed", control.random_seed);
        highs_model.set_option("threads", control.threads.max(1));

        debug!(
            model = %model.name,
            variables = num_vars,
            constraints = model.num_constraints(),
            time_limit = control.time_limit_seconds,
            "提交 HiGHS 求解"
        );

        let solved = highs_model.solve();
        let solve_time_seconds = start.elapsed().as_secs_f64();

        let status = solved.status();
        match status {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective_value = compute_objective(model, &values);
                Ok(LpSolution {
                    status: SolveStatus::Optimal,
                    objective_value: Some(objective_value),
                    values,
                    solve_time_seconds,
                })
            }
            HighsModelStatus::ReachedTimeLimit => {
                // 到时限: 有完整在手解则按可行解返回, 否则未知
                let values = solved.get_solution().columns().to_vec();
                if values.len() == num_vars {
                    let objective_value = compute_objective(model, &values);
                    Ok(LpSolution {
                        status: SolveStatus::Feasible,
                        objective_value: Some(objective_value),
                        values,
                        solve_time_seconds,
                    })
                } else {
                    Ok(LpSolution {
                        status: SolveStatus::Unknown,
                        objective_value: None,
                        values: Vec::new(),
                        solve_time_seconds,
                    })
                }
            }
            HighsModelStatus::Infeasible => Ok(LpSolution {
                status: SolveStatus::Infeasible,
                objective_value: None,
                values: Vec::new(),
                solve_time_seconds,
            }),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(LpSolution {
                    status: SolveStatus::Unbounded,
                    objective_value: None,
                    values: Vec::new(),
                    solve_time_seconds,
                })
            }
            other => Err(SolverError::EngineFailure(format!(
                "HiGHS 返回异常状态: {:?}",
                other
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

/// 按模型系数回算目标值 (与引擎内部取值口径一致)
fn compute_objective(model: &LpModel, values: &[f64]) -> f64 {
    model
        .objective
        .iter()
        .zip(values.iter())
        .map(|(c, v)| c * v)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::model::{ConstraintSense, LpModel, OptimizeSense, VarType};

    // 最小可行模型: min x, x >= 3
    #[test]
    fn test_highs_solves_tiny_lp() {
        let mut model = LpModel::new("tiny", OptimizeSense::Minimize);
        let x = model.add_var("x", VarType::Continuous, 0.0, Some(10.0));
        model.add_objective_term(x, 1.0);
        model.add_constraint("lb", vec![(x, 1.0)], ConstraintSense::GreaterEqual, 3.0);

        let engine = HighsEngine::new();
        let solution = engine.solve(&model, &SolveControl::default()).unwrap();

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!((solution.value(x) - 3.0).abs() < 1e-6);
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }

    // 整数变量 + 不可行约束
    #[test]
    fn test_highs_reports_infeasible() {
        let mut model = LpModel::new("infeasible", OptimizeSense::Minimize);
        let x = model.add_var("x", VarType::Integer, 0.0, Some(5.0));
        model.add_objective_term(x, 1.0);
        model.add_constraint("impossible", vec![(x, 1.0)], ConstraintSense::GreaterEqual, 7.0);

        let engine = HighsEngine::new();
        let solution = engine.solve(&model, &SolveControl::default()).unwrap();
        assert_eq!(solution.status, SolveStatus::Infeasible);
    }

    // 0/1 背包: 验证整数解读取
    #[test]
    fn test_highs_binary_knapsack() {
        let mut model = LpModel::new("knapsack", OptimizeSense::Maximize);
        let a = model.add_binary("a"); // 价值 10, 重量 6
        let b = model.add_binary("b"); // 价值 7, 重量 5
        let c = model.add_binary("c"); // 价值 5, 重量 4
        model.add_objective_term(a, 10.0);
        model.add_objective_term(b, 7.0);
        model.add_objective_term(c, 5.0);
        model.add_constraint(
            "capacity",
            vec![(a, 6.0), (b, 5.0), (c, 4.0)],
            ConstraintSense::LessEqual,
            10.0,
        );

        let engine = HighsEngine::new();
        let solution = engine.solve(&model, &SolveControl::default()).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(solution.bool_value(a));
        assert!(solution.bool_value(c));
        assert!(!solution.bool_value(b));
    }
}
