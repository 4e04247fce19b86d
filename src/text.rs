//! 纯文本解析
//!
//! 第一行是书名，第二行是作者，其余所有行合并为唯一的章节"Chapter 1"。

use crate::book::{escape_text, title_from_path, wrap_html, Book, Chapter, Format};
use crate::error::{ParseError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// 读取并解析纯文本文件
pub fn parse_text_file(path: &Path, unknown_author: &str) -> Result<Book> {
    let bytes = fs::read(path).map_err(|e| ParseError::read(path, e))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| ParseError::read(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    log::debug!("读取纯文本文件: {} ({} 字节)", path.display(), content.len());
    Ok(parse_text(&content, path, unknown_author))
}

/// 解析已解码的文本内容
pub fn parse_text(content: &str, source: &Path, unknown_author: &str) -> Book {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines = split_lines(content);

    let title = lines
        .first()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .unwrap_or_else(|| title_from_path(source));
    let author = lines.get(1).map(|line| line.to_string());
    let body = lines.get(2..).map(|rest| rest.join("\n")).unwrap_or_default();

    let markup = synthesize_markup(&title, &body);
    let chapter = Chapter::new("Chapter 1", body, markup, 1);

    Book::assemble(
        Some(title),
        author,
        vec![chapter],
        Format::PlainText,
        source,
        unknown_author,
    )
}

/// 按通用换行符拆分：`\r\n`、`\r`、`\n` 都算一次换行，末尾的换行符不产生额外的空行
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = content.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < content.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// 标题放入 `<h1>`，正文放入 `<p>`，每个 `\n\n` 变成一次段落分隔
fn synthesize_markup(title: &str, body: &str) -> String {
    let paragraphs = escape_text(body).replace("\n\n", "</p><p>");
    wrap_html(&format!("<h1>{}</h1><p>{}</p>", escape_text(title), paragraphs))
}
