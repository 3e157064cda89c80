// ==========================================
// 成品发运排程系统 - 引擎层
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 2~8 引擎体系
// ==========================================
// 职责: 实现发运优化业务规则
// 红线: 引擎纯函数化, 每次调用自建模型自弃模型;
//       求解失败只兜底不冒泡
// ==========================================

pub mod costs;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod loading;
pub mod model_builder;
pub mod multi_period;
pub mod objective;
pub mod template_selector;

// 重导出核心引擎
pub use dispatch::{DispatchEngine, DispatchInput};
pub use error::DispatchError;
pub use fallback::GreedyFallback;
pub use loading::LoadingOptimizer;
pub use model_builder::{DispatchModelBuilder, DispatchVars};
pub use multi_period::{MultiPeriodInput, MultiPeriodPlanner};
pub use objective::ObjectiveComposer;
pub use template_selector::TemplateSelector;

use crate::domain::plan::{PlanSummary, RakeAssignment, TruckAssignment};

/// 汇总单日方案 (求解路径与兜底路径共用)
///
/// 口径: 铁路占比 = 铁路吨位 / 总吨位;
/// 预估完成天数 = 1 + ceil(最大预测延误 / 24h) (无发运为 0)
pub(crate) fn summarize_plan(
    rakes: &[RakeAssignment],
    trucks: &[TruckAssignment],
) -> PlanSummary {
    let rail_tonnage: f64 = rakes.iter().map(|r| r.tonnes).sum();
    let road_tonnage: f64 = trucks.iter().map(|t| t.tonnes).sum();
    let total_tonnage = rail_tonnage + road_tonnage;

    let total_cost = rakes.iter().map(|r| r.estimated_cost).sum::<f64>()
        + trucks.iter().map(|t| t.estimated_cost).sum::<f64>();

    let max_delay_hours = rakes
        .iter()
        .map(|r| r.estimated_delay_hours)
        .chain(trucks.iter().map(|t| t.estimated_delay_hours))
        .fold(0.0_f64, f64::max);

    let estimated_completion_days = if total_tonnage > 0.0 {
        1 + (max_delay_hours / 24.0).ceil() as u32
    } else {
        0
    };

    PlanSummary {
        total_cost,
        total_tonnage,
        total_rakes: rakes.len() as u32,
        total_trucks: trucks.len() as u32,
        rail_vs_road_ratio: if total_tonnage > 0.0 {
            rail_tonnage / total_tonnage
        } else {
            0.0
        },
        estimated_completion_days,
    }
}
