// ==========================================
// 成品发运排程系统 - 费率参数与预测输入
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 1.2 外部输入模型
// ==========================================
// 红线: 预测值只消费不生产, 缺失键一律取默认值
// ==========================================

use crate::domain::types::TransportMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// CostParameters - 费率参数 (外部下发)
// ==========================================
// 所有费率 >= 0; 缺失字段取默认值, 运营侧可整体调参
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// 铁路运费 (每吨)
    pub freight_rate_per_t: f64,

    /// 滞留费 (每车皮每小时)
    pub demurrage_rate_per_wagon_hour: f64,

    /// 公路运费 (每公里每吨)
    pub truck_rate_per_km_t: f64,

    /// 延误罚金 (每小时)
    pub delay_penalty_per_hour: f64,

    /// SLA 迟交罚率 (每吨每小时)
    pub sla_penalty_per_t_hour: f64,

    /// 非整列发运加价比例 (0~1)
    pub partial_rake_surcharge_pct: f64,

    /// 高成本目的地名称 (为空则不加价)
    pub high_cost_destination: Option<String>,

    /// 高成本目的地加价比例 (0~1)
    pub high_cost_surcharge_pct: f64,

    /// 一列多目的地罚金 (每个额外目的地)
    pub multi_destination_penalty: f64,

    /// 推荐运输方式不一致罚率 (每吨)
    pub mode_mismatch_penalty_per_t: f64,

    /// 优先级权重 (HIGH/MEDIUM/LOW -> 权重)
    pub priority_weights: HashMap<String, f64>,

    /// 目的地运距表 (公里)
    pub destination_distance_km: HashMap<String, f64>,

    /// 缺省运距 (公里, 运距表未命中时使用)
    pub default_distance_km: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        let mut priority_weights = HashMap::new();
        priority_weights.insert("HIGH".to_string(), 3.0);
        priority_weights.insert("MEDIUM".to_string(), 2.0);
        priority_weights.insert("LOW".to_string(), 1.0);

        Self {
            freight_rate_per_t: 850.0,
            demurrage_rate_per_wagon_hour: 150.0,
            truck_rate_per_km_t: 3.5,
            delay_penalty_per_hour: 500.0,
            sla_penalty_per_t_hour: 2.0,
            partial_rake_surcharge_pct: 0.10,
            high_cost_destination: None,
            high_cost_surcharge_pct: 0.15,
            multi_destination_penalty: 5000.0,
            mode_mismatch_penalty_per_t: 50.0,
            priority_weights,
            destination_distance_km: HashMap::new(),
            default_distance_km: 500.0,
        }
    }
}

impl CostParameters {
    /// 查优先级权重 (未配置的等级取 1.0)
    pub fn priority_weight(&self, priority: crate::domain::types::Priority) -> f64 {
        self.priority_weights
            .get(&priority.to_string())
            .copied()
            .unwrap_or(1.0)
    }

    /// 查目的地运距 (未命中取缺省运距)
    pub fn distance_km(&self, destination: &str) -> f64 {
        self.destination_distance_km
            .get(destination)
            .copied()
            .unwrap_or(self.default_distance_km)
    }

    /// 判断目的地是否为高成本目的地
    pub fn is_high_cost_destination(&self, destination: &str) -> bool {
        self.high_cost_destination
            .as_deref()
            .map(|d| d.eq_ignore_ascii_case(destination))
            .unwrap_or(false)
    }
}

// ==========================================
// PredictionSet - 外部 ML 预测输入
// ==========================================
// 核心不校验预测内部一致性, 只做"缺键给默认"读取
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PredictionSet {
    /// 专列延误预测 (按专列序号, 小时)
    pub rake_delay_hours: HashMap<usize, f64>,

    /// 汽车延误预测 (按汽车序号, 小时)
    pub truck_delay_hours: HashMap<usize, f64>,

    /// 目的地成本预测 (目的地 -> 附加成本)
    pub destination_cost: HashMap<String, f64>,

    /// 订单推荐运输方式 (订单ID -> 方式)
    pub recommended_mode: HashMap<String, TransportMode>,

    /// 滞留时长预测 (小时)
    pub demurrage_hours: Option<f64>,
}

impl PredictionSet {
    /// 查专列延误 (缺失取 0)
    pub fn rake_delay(&self, rake_index: usize) -> f64 {
        self.rake_delay_hours.get(&rake_index).copied().unwrap_or(0.0)
    }

    /// 查汽车延误 (缺失取 0)
    pub fn truck_delay(&self, truck_index: usize) -> f64 {
        self.truck_delay_hours.get(&truck_index).copied().unwrap_or(0.0)
    }

    /// 查目的地附加成本 (缺失取 0)
    pub fn destination_extra_cost(&self, destination: &str) -> f64 {
        self.destination_cost.get(destination).copied().unwrap_or(0.0)
    }

    /// 查订单推荐运输方式 (缺失返回 None, 不做惩罚)
    pub fn mode_for_order(&self, order_id: &str) -> Option<TransportMode> {
        self.recommended_mode.get(order_id).copied()
    }

    /// 查滞留时长 (缺失取默认值)
    pub fn demurrage_or(&self, default_hours: f64) -> f64 {
        self.demurrage_hours.unwrap_or(default_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Priority;

    #[test]
    fn test_cost_parameters_defaults() {
        let params = CostParameters::default();
        assert!(params.freight_rate_per_t > 0.0);
        assert_eq!(params.priority_weight(Priority::High), 3.0);
        assert_eq!(params.priority_weight(Priority::Low), 1.0);
        assert_eq!(params.distance_km("不存在的目的地"), params.default_distance_km);
    }

    #[test]
    fn test_prediction_missing_keys_default() {
        let pred = PredictionSet::default();
        assert_eq!(pred.rake_delay(0), 0.0);
        assert_eq!(pred.truck_delay(9), 0.0);
        assert_eq!(pred.demurrage_or(6.0), 6.0);
        assert!(pred.mode_for_order("O1").is_none());
    }

    #[test]
    fn test_high_cost_destination_match() {
        let params = CostParameters {
            high_cost_destination: Some("KOLKATA".to_string()),
            ..CostParameters::default()
        };
        assert!(params.is_high_cost_destination("Kolkata"));
        assert!(!params.is_high_cost_destination("Patna"));
    }
}
