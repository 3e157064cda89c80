// ==========================================
// 成品发运排程系统 - 求解器层
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 3. 求解器抽象
// ==========================================
// 职责: 中立规划模型 + 可插拔求解引擎
// 红线: 求解崩溃不得作为致命错误向上冒泡
// ==========================================

pub mod highs;
pub mod model;

// 重导出核心类型
pub use highs::HighsEngine;
pub use model::{
    ConstraintSense, LpConstraint, LpModel, LpSolution, LpVariable, OptimizeSense, SolveControl,
    SolveStatus, SolverEngine, SolverError, VarType,
};
