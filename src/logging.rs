// ==========================================
// 成品发运排程系统 - 日志系统初始化
// ==========================================
// 工具: tracing + tracing-subscriber (EnvFilter)
// 口径: 外部 crate 只看 warn, 本系统默认 info;
//       求解器内部输出已在引擎侧静默, 不走日志
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 缺省日志过滤器
fn default_filter() -> EnvFilter {
    EnvFilter::new("warn,dispatch_aps=info")
}

/// 初始化日志系统
///
/// RUST_LOG 可覆盖缺省过滤器, 例如:
/// RUST_LOG=dispatch_aps=debug 观察建模/求解明细
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// 初始化测试环境的日志系统 (重复初始化不报错)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("dispatch_aps=debug"))
        .with_test_writer()
        .try_init();
}
