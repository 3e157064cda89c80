// ==========================================
// 成品发运排程系统 - 配列模板择优引擎
// ==========================================
// 依据: Dispatch_Engine_Specs.md - 8. Template Selector
// ==========================================
// 职责: 对每个候选模板跑装载优化, 取得分最高者
// 规则: 不可行模板跳过, 全部不可行才报错
// 得分: 总装载吨位 * 100 + 利用率
// ==========================================

use crate::domain::loading::{Product, RakeTemplate, TemplateSelection};
use crate::engine::error::DispatchError;
use crate::engine::loading::LoadingOptimizer;
use tracing::{info, warn};

// ==========================================
// TemplateSelector - 配列模板择优引擎
// ==========================================
pub struct TemplateSelector {
    optimizer: LoadingOptimizer,
}

impl TemplateSelector {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            optimizer: LoadingOptimizer::new(),
        }
    }

    /// 注入自定义装载优化器
    pub fn with_optimizer(optimizer: LoadingOptimizer) -> Self {
        Self { optimizer }
    }

    /// 在候选模板中择优
    ///
    /// # 参数
    /// - `allow_unassigned`: 透传给装载优化器
    ///
    /// # 返回
    /// 胜出 (模板, 方案, 得分); 全部模板不可行时返回 NoFeasibleTemplate
    pub fn select(
        &self,
        products: &[Product],
        templates: &[RakeTemplate],
        allow_unassigned: bool,
    ) -> Result<TemplateSelection, DispatchError> {
        let mut best: Option<TemplateSelection> = None;

        for template in templates {
            let plan = match self.optimizer.optimize(products, template, allow_unassigned) {
                Ok(plan) => plan,
                Err(err) => {
                    // 单模板失败不终止择优
                    warn!(
                        template = %template.template_id,
                        error = %err,
                        "候选模板不可行, 跳过"
                    );
                    continue;
                }
            };

            let score = plan.total_loaded_t * 100.0 + plan.utilization_pct;
            let better = best.as_ref().map(|b| score > b.score).unwrap_or(true);
            if better {
                best = Some(TemplateSelection {
                    template_id: template.template_id.clone(),
                    plan,
                    score,
                });
            }
        }

        match best {
            Some(selection) => {
                info!(
                    template = %selection.template_id,
                    score = selection.score,
                    loaded_t = selection.plan.total_loaded_t,
                    "模板择优完成"
                );
                Ok(selection)
            }
            None => Err(DispatchError::NoFeasibleTemplate),
        }
    }
}

impl Default for TemplateSelector {
    fn default() -> Self {
        Self::new()
    }
}
