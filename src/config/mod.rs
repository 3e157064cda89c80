// ==========================================
// 成品发运排程系统 - 调优参数配置
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 0.1 调优参数体系
// ==========================================
// 职责: 集中所有可调阈值, 引擎不硬编码业务常数
// 红线: 改参数不改模型结构
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DispatchTuning - 发运排程调优参数
// ==========================================
// 所有字段带默认值, 缺失配置不阻断排程
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchTuning {
    // ===== 专列/车皮物理参数 =====
    /// 单列最小车皮数
    pub min_wagons_per_rake: u32,
    /// 单列最大车皮数
    pub max_wagons_per_rake: u32,
    /// 整列判定车皮数 (低于此数计非整列加价)
    pub full_rake_wagons: u32,
    /// 单车皮载重 (吨)
    pub wagon_capacity_t: f64,

    // ===== 汽车物理参数 =====
    /// 单辆汽车载重 (吨)
    pub truck_capacity_t: f64,

    // ===== 贪心兜底参数 =====
    /// 铁路发运最小订货量 (吨, 低于此量走公路)
    pub rail_min_quantity_t: f64,

    // ===== SLA 参数 =====
    /// 紧迫窗口 (小时, 交付期进入窗口才累计 SLA 罚金)
    pub tight_window_hours: f64,

    // ===== 装车点/时段参数 =====
    /// 装车点数量
    pub loading_points: u32,
    /// 同一装车点同时段最大并装专列数 (K)
    pub max_rakes_per_loading_point: u32,
    /// 当日离散时段数 (0 = 不建时段约束)
    pub slots_per_day: u32,
    /// 单时段分钟数
    pub slot_minutes: f64,
    /// 装车吞吐量 (吨/小时)
    pub loading_throughput_tph: f64,

    // ===== 库存参数 =====
    /// 安全库存比例 (0~1, 0 = 不启用安全库存约束)
    pub safety_stock_pct: f64,

    // ===== 滞留参数 =====
    /// 缺省滞留时长 (小时, 预测缺失时使用)
    pub default_demurrage_hours: f64,

    // ===== 求解预算 =====
    /// 求解墙钟时限 (秒)
    pub solver_time_limit_seconds: f64,
    /// 固定随机种子 (可复现)
    pub solver_random_seed: i32,
    /// 求解器内部线程数
    pub solver_threads: i32,

    // ===== 多日分桶模型参数 =====
    /// 迟交罚金单位 (每吨每天)
    pub lateness_penalty_per_t_day: f64,
    /// 超产能罚金倍率 (相对迟交罚金单位, 默认 50 倍)
    pub overcapacity_penalty_factor: f64,
}

impl Default for DispatchTuning {
    fn default() -> Self {
        Self {
            min_wagons_per_rake: 58,
            max_wagons_per_rake: 59,
            full_rake_wagons: 59,
            wagon_capacity_t: 63.0,
            truck_capacity_t: 22.0,
            rail_min_quantity_t: 500.0,
            tight_window_hours: 72.0,
            loading_points: 1,
            max_rakes_per_loading_point: 2,
            slots_per_day: 24,
            slot_minutes: 60.0,
            loading_throughput_tph: 500.0,
            safety_stock_pct: 0.0,
            default_demurrage_hours: 6.0,
            solver_time_limit_seconds: 10.0,
            solver_random_seed: 42,
            solver_threads: 4,
            lateness_penalty_per_t_day: 10.0,
            overcapacity_penalty_factor: 50.0,
        }
    }
}

impl DispatchTuning {
    /// 单列最大装载吨位 (吨)
    pub fn rake_capacity_t(&self) -> f64 {
        self.max_wagons_per_rake as f64 * self.wagon_capacity_t
    }

    /// 单日总运力近似 (吨): 专列 * 59 * 63 + 汽车 * 22
    pub fn daily_capacity_t(&self, available_rakes: u32, available_trucks: u32) -> f64 {
        available_rakes as f64 * self.rake_capacity_t()
            + available_trucks as f64 * self.truck_capacity_t
    }

    /// 求解预算 (下发给求解引擎)
    pub fn solve_control(&self) -> crate::solver::SolveControl {
        crate::solver::SolveControl {
            time_limit_seconds: self.solver_time_limit_seconds,
            random_seed: self.solver_random_seed,
            threads: self.solver_threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuning_defaults() {
        let tuning = DispatchTuning::default();
        assert_eq!(tuning.min_wagons_per_rake, 58);
        assert_eq!(tuning.max_wagons_per_rake, 59);
        assert_eq!(tuning.rake_capacity_t(), 59.0 * 63.0);
        assert_eq!(tuning.daily_capacity_t(1, 4), 59.0 * 63.0 + 4.0 * 22.0);
    }

    #[test]
    fn test_tuning_deserialize_partial() {
        // 缺失字段取默认值
        let tuning: DispatchTuning =
            serde_json::from_str(r#"{"truck_capacity_t": 25.0}"#).unwrap();
        assert_eq!(tuning.truck_capacity_t, 25.0);
        assert_eq!(tuning.max_wagons_per_rake, 59);
    }
}
