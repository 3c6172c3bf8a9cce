//! 表格导出服务 - 业务能力层
//!
//! 只负责"把对照表写成 xlsx"，不关心流程
//!
//! xlsx 是一个 zip 包，只写出打开表格所需的最少部件：
//! 工作簿、单个工作表 `Sheet1`、共享字符串表和样式表。

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, AppResult};
use crate::models::ComparisonTable;

const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

/// 表头单元格使用的样式序号（粗体）
const HEADER_STYLE: usize = 1;

/// 表格导出服务
///
/// 职责：
/// - 生成 xlsx 字节
/// - 相似度写成数字单元格，其余列写成文本
/// - 写入前去掉 XML 不允许的控制字符
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcelWriter;

impl ExcelWriter {
    pub fn new() -> Self {
        Self
    }

    /// 生成 xlsx 文件内容
    pub fn to_bytes(&self, table: &ComparisonTable) -> Result<Vec<u8>, ZipError> {
        let mut strings = SharedStrings::default();
        let sheet_xml = build_sheet(table, &mut strings);
        let shared_strings_xml = strings.to_xml();
        let workbook_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            SHEET_NAME
        );

        let parts: [(&str, &[u8]); 7] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
            ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
            ("xl/workbook.xml", workbook_xml.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes()),
            ("xl/styles.xml", STYLES_XML.as_bytes()),
            ("xl/worksheets/sheet1.xml", sheet_xml.as_bytes()),
            ("xl/sharedStrings.xml", shared_strings_xml.as_bytes()),
        ];

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in parts {
            writer.start_file(name, options)?;
            writer.write_all(content)?;
        }

        let bytes = writer.finish()?.into_inner();
        debug!("xlsx 生成完成: {} 行，{} 字节", table.len(), bytes.len());
        Ok(bytes)
    }

    /// 写入 xlsx 文件
    pub async fn write(&self, table: &ComparisonTable, path: &Path) -> AppResult<()> {
        let bytes = self.to_bytes(table)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
    }
}

/// 共享字符串表，相同文本只存一份
#[derive(Default)]
struct SharedStrings {
    index: HashMap<String, usize>,
    values: Vec<String>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, text: &str) -> usize {
        self.references += 1;
        if let Some(&i) = self.index.get(text) {
            return i;
        }
        let i = self.values.len();
        self.values.push(text.to_string());
        self.index.insert(text.to_string(), i);
        i
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.references,
            self.values.len()
        );
        for value in &self.values {
            xml.push_str(r#"<si><t xml:space="preserve">"#);
            xml.push_str(&escape_xml(value));
            xml.push_str("</t></si>");
        }
        xml.push_str("</sst>");
        xml
    }
}

fn build_sheet(table: &ComparisonTable, strings: &mut SharedStrings) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (col, header) in table.headers().iter().enumerate() {
        let i = strings.intern(header);
        xml.push_str(&format!(
            r#"<c r="{}" s="{}" t="s"><v>{}</v></c>"#,
            cell_ref(col, 1),
            HEADER_STYLE,
            i
        ));
    }
    xml.push_str("</row>");

    for (offset, row) in table.rows.iter().enumerate() {
        let r = offset + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        for (col, text) in [&row.chinese, &row.machine_translation, &row.reference]
            .into_iter()
            .enumerate()
        {
            let i = strings.intern(&strip_illegal_chars(text));
            xml.push_str(&format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, cell_ref(col, r), i));
        }
        xml.push_str(&format!(
            r#"<c r="{}"><v>{}</v></c>"#,
            cell_ref(3, r),
            row.similarity
        ));
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 列号从 0 开始，行号从 1 开始；只有 4 列，单个字母足够
fn cell_ref(col: usize, row: usize) -> String {
    let letter = (b'A' + col as u8) as char;
    format!("{}{}", letter, row)
}

/// 去掉 XML 1.0 不允许出现的字符（制表符、换行、回车除外）
fn strip_illegal_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| match c {
            '\t' | '\n' | '\r' => true,
            '\u{0}'..='\u{1F}' => false,
            '\u{FFFE}' | '\u{FFFF}' => false,
            _ => true,
        })
        .collect()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
