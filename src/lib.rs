// ==========================================
// 成品发运排程系统 - 核心库
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 系统宪法
// 技术栈: Rust + HiGHS (混合整数规划)
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 求解器层 - 抽象模型与引擎适配
pub mod solver;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 调优参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Priority, SolverStatus, TransportMode};

// 领域实体
pub use domain::{
    CostParameters, DailyBucket, DailyPlan, InventoryRecord, LoadAssignment, LoadingPlan,
    MultiPeriodPlan, Order, PlanSummary, PredictionSet, Product, RakeAssignment, RakeTemplate,
    ResourceCounts, Slot, TemplateSelection, TruckAssignment, Wagon,
};

// 引擎
pub use engine::{
    DispatchEngine, DispatchError, DispatchInput, DispatchModelBuilder, GreedyFallback,
    LoadingOptimizer, MultiPeriodInput, MultiPeriodPlanner, ObjectiveComposer, TemplateSelector,
};

// 求解器
pub use solver::{HighsEngine, LpModel, SolveControl, SolveStatus, SolverEngine, SolverError};

// 配置
pub use config::DispatchTuning;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "成品发运排程系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
