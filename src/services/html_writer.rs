//! HTML 导出服务 - 业务能力层
//!
//! 输出一个不带行号列的 `<table border="1" class="dataframe">`
//!
//! 分数列按整列统一的小数位数显示；单元格只转义 `&`、`<`、`>`。

use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::ComparisonTable;

/// HTML 表格导出
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlWriter;

impl HtmlWriter {
    pub fn new() -> Self {
        Self
    }

    /// 生成 HTML 文本
    pub fn render(&self, table: &ComparisonTable) -> String {
        let mut out = String::with_capacity(1024 + table.len() * 256);

        out.push_str("<table border=\"1\" class=\"dataframe\">\n");
        out.push_str("  <thead>\n");
        out.push_str("    <tr style=\"text-align: right;\">\n");
        for header in table.headers() {
            out.push_str(&format!("      <th>{}</th>\n", html_escape(header)));
        }
        out.push_str("    </tr>\n");
        out.push_str("  </thead>\n");

        out.push_str("  <tbody>\n");
        let decimals = table.score_decimals();
        for row in &table.rows {
            out.push_str("    <tr>\n");
            for cell in row.cells(decimals) {
                out.push_str(&format!("      <td>{}</td>\n", html_escape(&cell)));
            }
            out.push_str("    </tr>\n");
        }
        out.push_str("  </tbody>\n");
        out.push_str("</table>");

        out
    }

    /// 写入 HTML 文件
    pub async fn write(&self, table: &ComparisonTable, path: &Path) -> AppResult<()> {
        tokio::fs::write(path, self.render(table))
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
