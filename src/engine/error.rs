// ==========================================
// 成品发运排程系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================
// 红线: 未落位/未装载是报告不是错误;
//       只有"无法给出任何方案"才返回错误
// ==========================================

use crate::solver::SolverError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    // ===== 装载优化错误 =====
    #[error("装载模型不可行 (禁止留装时): template_id={template_id}")]
    LoadingInfeasible { template_id: String },

    #[error("所有候选配列模板均不可行")]
    NoFeasibleTemplate,

    // ===== 求解器错误 =====
    #[error("求解器错误: {0}")]
    Solver(#[from] SolverError),
}
