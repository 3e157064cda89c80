// ==========================================
// 成品发运排程系统 - 抽象规划模型
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 3.1 求解器可插拔设计
// ==========================================
// 职责: 变量 + 线性约束 + 线性目标的中立表示
// 红线: 引擎层只依赖本模型与 SolverEngine 接口, 不依赖具体求解器
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// 变量类型 (Variable Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Continuous, // 连续变量 (x ∈ ℝ)
    Integer,    // 整数变量 (x ∈ ℤ)
    Binary,     // 0/1 变量
}

// ==========================================
// 约束方向 (Constraint Sense)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    LessEqual,    // <=
    Equal,        // =
    GreaterEqual, // >=
}

// ==========================================
// 优化方向 (Optimize Sense)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeSense {
    Minimize, // 最小化
    Maximize, // 最大化
}

// ==========================================
// LpVariable - 决策变量定义
// ==========================================
#[derive(Debug, Clone)]
pub struct LpVariable {
    pub name: String,           // 变量名 (可解释性)
    pub var_type: VarType,      // 变量类型
    pub lower: f64,             // 下界
    pub upper: Option<f64>,     // 上界 (None = 无上界)
}

// ==========================================
// LpConstraint - 线性约束 (稀疏表示)
// ==========================================
#[derive(Debug, Clone)]
pub struct LpConstraint {
    pub name: String,               // 约束名 (可解释性)
    pub terms: Vec<(usize, f64)>,   // (变量索引, 系数)
    pub sense: ConstraintSense,     // 约束方向
    pub bound: f64,                 // 右端项
}

// ==========================================
// LpModel - 规划模型
// ==========================================
// 每次优化调用构造一个新模型, 求解后即弃
#[derive(Debug, Clone)]
pub struct LpModel {
    pub name: String,                   // 模型名
    pub sense: OptimizeSense,           // 优化方向
    pub variables: Vec<LpVariable>,     // 变量表
    pub objective: Vec<f64>,            // 目标系数 (与变量表对齐)
    pub constraints: Vec<LpConstraint>, // 约束表
}

impl LpModel {
    /// 构造空模型
    pub fn new(name: impl Into<String>, sense: OptimizeSense) -> Self {
        Self {
            name: name.into(),
            sense,
            variables: Vec::new(),
            objective: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// 添加变量, 返回变量索引
    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        var_type: VarType,
        lower: f64,
        upper: Option<f64>,
    ) -> usize {
        self.variables.push(LpVariable {
            name: name.into(),
            var_type,
            lower,
            upper,
        });
        self.objective.push(0.0);
        self.variables.len() - 1
    }

    /// 添加 0/1 变量
    pub fn add_binary(&mut self, name: impl Into<String>) -> usize {
        self.add_var(name, VarType::Binary, 0.0, Some(1.0))
    }

    /// 目标系数累加 (同一变量可多次计入不同成本项)
    pub fn add_objective_term(&mut self, var: usize, coeff: f64) {
        self.objective[var] += coeff;
    }

    /// 添加约束
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(usize, f64)>,
        sense: ConstraintSense,
        bound: f64,
    ) {
        self.constraints.push(LpConstraint {
            name: name.into(),
            terms,
            sense,
            bound,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// 模型自检: 约束项索引越界 / 变量界倒置
    pub fn validate(&self) -> Result<(), SolverError> {
        for var in &self.variables {
            if let Some(upper) = var.upper {
                if var.lower > upper {
                    return Err(SolverError::InvalidModel(format!(
                        "变量 {} 下界 {} 大于上界 {}",
                        var.name, var.lower, upper
                    )));
                }
            }
        }
        for constraint in &self.constraints {
            for &(idx, _) in &constraint.terms {
                if idx >= self.variables.len() {
                    return Err(SolverError::InvalidModel(format!(
                        "约束 {} 引用了不存在的变量索引 {}",
                        constraint.name, idx
                    )));
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// 求解状态 (Solve Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,    // 最优
    Feasible,   // 可行 (到时限的在手解)
    Infeasible, // 不可行
    Unbounded,  // 无界
    Unknown,    // 未知 (时限内无在手解等)
}

impl SolveStatus {
    /// 解是否可用于读取变量值
    pub fn is_usable(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Unbounded => write!(f, "UNBOUNDED"),
            SolveStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// LpSolution - 求解结果
// ==========================================
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub status: SolveStatus,          // 求解状态
    pub objective_value: Option<f64>, // 目标函数值 (可用解才有)
    pub values: Vec<f64>,             // 变量取值 (与变量表对齐)
    pub solve_time_seconds: f64,      // 求解耗时 (秒)
}

impl LpSolution {
    /// 读取变量值 (无解时取 0)
    pub fn value(&self, var: usize) -> f64 {
        self.values.get(var).copied().unwrap_or(0.0)
    }

    /// 读取整数变量值 (四舍五入消除数值噪声)
    pub fn int_value(&self, var: usize) -> i64 {
        self.value(var).round() as i64
    }

    /// 读取 0/1 变量值
    pub fn bool_value(&self, var: usize) -> bool {
        self.value(var) > 0.5
    }
}

// ==========================================
// SolveControl - 求解预算
// ==========================================
// 时限由求解引擎自身强制, 调用方视为阻塞调用
#[derive(Debug, Clone, Copy)]
pub struct SolveControl {
    pub time_limit_seconds: f64, // 墙钟时限 (秒)
    pub random_seed: i32,        // 固定随机种子 (可复现)
    pub threads: i32,            // 内部搜索线程数
}

impl Default for SolveControl {
    fn default() -> Self {
        Self {
            time_limit_seconds: 10.0,
            random_seed: 42,
            threads: 4,
        }
    }
}

// ==========================================
// 求解器错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("模型无效: {0}")]
    InvalidModel(String),

    #[error("求解引擎失败: {0}")]
    EngineFailure(String),
}

// ==========================================
// Trait: SolverEngine - 求解引擎接口
// ==========================================
// 任何混合整数规划引擎实现本接口即可接入
pub trait SolverEngine: Send + Sync {
    /// 在给定预算内求解模型
    fn solve(&self, model: &LpModel, control: &SolveControl) -> Result<LpSolution, SolverError>;

    /// 引擎名称
    fn name(&self) -> &str;
}
