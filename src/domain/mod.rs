// ==========================================
// 成品发运排程系统 - 领域模型层
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 1. 数据模型
// ==========================================
// 职责: 定义领域实体、类型、只读输入模型
// 红线: 不含求解逻辑,不含引擎逻辑
// ==========================================

pub mod loading;
pub mod order;
pub mod params;
pub mod plan;
pub mod types;

// 重导出核心类型
pub use loading::{
    LoadAssignment, LoadingPlan, Product, RakeTemplate, Slot, TemplateSelection, Wagon,
};
pub use order::{InventoryRecord, Order, ResourceCounts};
pub use params::{CostParameters, PredictionSet};
pub use plan::{
    DailyBucket, DailyPlan, DailyPlanSlot, MultiPeriodPlan, PlanSummary, RakeAssignment,
    TruckAssignment,
};
pub use types::{Priority, SolverStatus, TransportMode};
