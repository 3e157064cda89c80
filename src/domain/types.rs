// ==========================================
// 成品发运排程系统 - 领域类型定义
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 0.2 基础类型体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单优先级 (Order Priority)
// ==========================================
// 红线: 等级制,不是评分制
// 排序: High < Medium < Low (数值越小越优先)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,   // 高优先级
    Medium, // 中优先级
    Low,    // 低优先级
}

impl Priority {
    /// 数值等级 (1=最高, 3=最低), 用于排序
    pub fn rank(&self) -> i32 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// 从字符串解析优先级 (未知值默认 MEDIUM)
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "HIGH" => Priority::High,
            "LOW" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

// ==========================================
// 运输方式 (Transport Mode)
// ==========================================
// 铁路=整列发运(专列), 公路=汽车发运
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Rail, // 铁路发运
    Road, // 公路发运
}

impl TransportMode {
    /// 从字符串解析运输方式 (未知值返回 None)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RAIL" => Some(TransportMode::Rail),
            "ROAD" => Some(TransportMode::Road),
            _ => None,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Rail => write!(f, "RAIL"),
            TransportMode::Road => write!(f, "ROAD"),
        }
    }
}

// ==========================================
// 求解状态 (Solver Status)
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 3. Solver Orchestrator
// 状态机出口: Solved -> OPTIMAL/FEASIBLE, Fallback -> GREEDY_FALLBACK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Optimal,        // 求解器最优解
    Feasible,       // 求解器可行解 (未证最优)
    GreedyFallback, // 贪心兜底方案
    EmptyInput,     // 空订单输入, 零方案
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Optimal => write!(f, "OPTIMAL"),
            SolverStatus::Feasible => write!(f, "FEASIBLE"),
            SolverStatus::GreedyFallback => write!(f, "GREEDY_FALLBACK"),
            SolverStatus::EmptyInput => write!(f, "EMPTY_INPUT"),
        }
    }
}
