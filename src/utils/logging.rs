/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志（默认 info 级别，可用 RUST_LOG 覆盖）
///
/// 重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `base_url`: 评估后端地址
/// - `batch_size`: 每批并发数
pub fn log_startup(base_url: &str, batch_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 绘图评估批处理模式");
    info!("🌐 评估服务: {}", base_url);
    info!("📊 每批并发数: {}", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录请求加载信息
///
/// # 参数
/// - `total`: 请求总数
/// - `batch_size`: 每批并发数
/// - `pause_ms`: 批次间隔
pub fn log_requests_loaded(total: usize, batch_size: usize, pause_ms: u64) {
    info!("✓ 找到 {} 条待评估的请求", total);
    info!("📋 将以每批 {} 个的方式处理", batch_size);
    info!("💡 每批完成后等待 {}ms 再开始下一批\n", pause_ms);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始请求编号
/// - `end`: 结束请求编号
/// - `total`: 请求总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批请求: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `success`: 成功数量
/// - `total`: 批次总数
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部评估完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
