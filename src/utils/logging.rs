//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use std::path::Path;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::models::{ComparisonTable, TableSummary};

/// 预览中每个单元格显示的最大字符数
const PREVIEW_WIDTH: usize = 40;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式为 `debug`。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - PDF 翻译对照");
    info!("🔧 翻译引擎: {}", config.engine);
    info!("🔑 API 密钥: {}", credential_status(config));
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 密钥只报告是否提供，不输出任何字符
fn credential_status(config: &Config) -> &'static str {
    if config.credential.is_some() {
        "已提供"
    } else {
        "未提供"
    }
}

/// 记录 PDF 提取结果
pub fn log_extracted(label: &str, paragraphs: usize, blank_pages: usize) {
    info!("✓ {}: {} 段文本", label, paragraphs);
    if blank_pages > 0 {
        info!("  (跳过 {} 个空白页)", blank_pages);
    }
}

/// 逐行预览对照结果
pub fn log_preview(table: &ComparisonTable) {
    info!("\n{}", "─".repeat(60));
    info!("📋 对照结果预览");
    info!("{}", "─".repeat(60));
    for (i, row) in table.rows.iter().enumerate() {
        info!(
            "#{} [{:.2}%] {} | {} | {}",
            i + 1,
            row.similarity,
            truncate_text(&single_line(&row.chinese), PREVIEW_WIDTH),
            truncate_text(&single_line(&row.machine_translation), PREVIEW_WIDTH),
            truncate_text(&single_line(&row.reference), PREVIEW_WIDTH)
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &TableSummary, excel_path: &Path, html_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 对照行数: {}", summary.rows);
    info!("❌ 翻译失败: {}", summary.failed);
    if let Some(mean) = summary.mean_similarity {
        info!("📈 平均相似度: {:.2}%", mean);
    }
    if summary.failed > 0 {
        if let Some(mean) = summary.mean_similarity_translated {
            info!("📈 平均相似度（不含失败行）: {:.2}%", mean);
        }
    }
    info!("{}", "=".repeat(60));
    info!("\n表格已保存至: {}", excel_path.display());
    info!("网页已保存至: {}", html_path.display());
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

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    #[test]
    fn test_credential_status_hides_key() {
        let config = Config {
            credential: ApiKey::new("sk-secret-wxyz"),
            ..Config::default()
        };
        let status = credential_status(&config);
        assert_eq!(status, "已提供");
        assert!(!status.contains("wxyz"));

        assert_eq!(credential_status(&Config::default()), "未提供");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_text("你好世界", 2), "你好...");
        assert_eq!(truncate_text("Hello", 10), "Hello");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n b\t\tc "), "a b c");
    }

    #[test]
    fn test_init_is_repeatable() {
        init(false);
        init(true);
    }
}
