//! 书籍数据模型
//!
//! `Book` 是一次成功解析的不可变结果，构造时负责补齐标题、作者等回退值，
//! 构造完成后不再允许修改，从而保证标题永远非空。

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 标题回退到文件名也为空时使用的值
const UNTITLED: &str = "Untitled";

/// 不支持格式时占位章节的正文
pub const UNSUPPORTED_MESSAGE: &str = "This file format is not fully supported yet.";

/// EPUB中没有可读章节时占位章节的正文
pub const NO_CHAPTERS_MESSAGE: &str = "No readable chapters were found in this book.";

/// 占位章节的标题
pub const PREVIEW_TITLE: &str = "Preview";

/// 产生书籍的解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    PlainText,
    Epub,
    Unsupported,
}

/// 章节：一个阅读单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    title: String,
    plain_text: String,
    markup: String,
}

impl Chapter {
    /// 创建章节，空白标题会被替换为 `Chapter {position}`
    pub fn new(
        title: impl Into<String>,
        plain_text: impl Into<String>,
        markup: impl Into<String>,
        position: usize,
    ) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            positional_title(position)
        } else {
            title
        };

        Self {
            title,
            plain_text: plain_text.into(),
            markup: markup.into(),
        }
    }

    /// 创建"Preview"占位章节，标记为 `<h1>{heading}</h1><p>{message}</p>`
    pub fn preview(heading: &str, message: &str) -> Self {
        Self {
            title: PREVIEW_TITLE.to_string(),
            plain_text: message.to_string(),
            markup: wrap_html(&format!(
                "<h1>{}</h1><p>{}</p>",
                escape_text(heading),
                escape_text(message)
            )),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 去除标记后的纯文本
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// 可渲染的标记文本
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// 解析得到的书籍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    format: Format,
    chapters: Vec<Chapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image: Option<Vec<u8>>,
}

impl Book {
    /// 组装书籍
    ///
    /// # 参数
    /// * `title` - 解析器找到的标题，缺失或为空时使用文件名回退
    /// * `author` - 解析器找到的作者，缺失或为空时使用 `unknown_author`
    /// * `chapters` - 按阅读顺序排列的章节，原样保留
    /// * `source` - 源文件路径，用于推导回退标题
    pub fn assemble(
        title: Option<String>,
        author: Option<String>,
        chapters: Vec<Chapter>,
        format: Format,
        source: &Path,
        unknown_author: &str,
    ) -> Self {
        let title = non_blank(title).unwrap_or_else(|| title_from_path(source));
        let author = non_blank(author).unwrap_or_else(|| unknown_author.to_string());

        Self {
            title,
            author,
            format,
            chapters,
            cover_image: None,
        }
    }

    /// 为不支持的格式构建占位书籍，标题是去掉扩展名的文件名
    pub fn placeholder(source: &Path, unknown_author: &str) -> Self {
        let name = file_stem(source);
        let title = if name.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            name
        };
        let chapter = Chapter::preview(&title, UNSUPPORTED_MESSAGE);

        Self {
            title,
            author: unknown_author.to_string(),
            format: Format::Unsupported,
            chapters: vec![chapter],
            cover_image: None,
        }
    }

    /// 没有任何章节时补一个占位章节，保证书籍不会以零章节的状态交给调用方
    pub(crate) fn ensure_readable(mut self) -> Self {
        if self.chapters.is_empty() {
            log::warn!("《{}》没有可读章节，使用占位章节", self.title);
            self.chapters
                .push(Chapter::preview(&self.title, NO_CHAPTERS_MESSAGE));
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// 封面图片（目前解析器不会填充）
    pub fn cover_image(&self) -> Option<&[u8]> {
        self.cover_image.as_deref()
    }

    /// 取出章节列表
    pub fn into_chapters(self) -> Vec<Chapter> {
        self.chapters
    }
}

/// 从文件路径推导标题：去掉扩展名，下划线替换为空格
pub fn title_from_path(path: &Path) -> String {
    let title = file_stem(path).replace('_', " ");
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// `Chapter N` 形式的位置标题，N从1开始
pub fn positional_title(position: usize) -> String {
    format!("Chapter {}", position)
}

/// 转义文本中的 `&`、`<`、`>`，用于合成标记
pub(crate) fn escape_text(text: &str) -> String {
    quick_xml::escape::partial_escape(text).into_owned()
}

/// 用最小的HTML文档包裹标记片段
pub(crate) fn wrap_html(body: &str) -> String {
    format!("<html><body>{}</body></html>", body)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
