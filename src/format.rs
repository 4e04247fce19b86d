//! 格式分发
//!
//! 根据扩展名（不区分大小写）选择解析策略。

use std::path::Path;

use crate::book::{Book, Format};
use crate::config::{ParseOptions, UnsupportedPolicy};
use crate::epub;
use crate::error::{ParseError, Result};
use crate::text;

/// 根据扩展名判断文件格式
pub fn detect_format(path: &Path, options: &ParseOptions) -> Format {
    let extension = extension_of(path);

    if options.is_text_extension(&extension) {
        Format::PlainText
    } else if options.is_epub_extension(&extension) {
        Format::Epub
    } else {
        Format::Unsupported
    }
}

/// 使用默认选项解析文件
///
/// # 示例
///
/// ```rust,no_run
/// let book = inkforge::parse("book.epub")?;
/// println!("书名: {}", book.title());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Book> {
    parse_with_options(path, &ParseOptions::default())
}

/// 使用指定选项解析文件
///
/// 返回的书籍至少有一个章节。
pub fn parse_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Book> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParseError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = detect_format(path, options);
    log::info!("解析 {} ({:?})", path.display(), format);

    let book = match format {
        Format::PlainText => text::parse_text_file(path, &options.unknown_author)?,
        Format::Epub => epub::parse_epub(path, options)?.ensure_readable(),
        Format::Unsupported => match options.unsupported {
            UnsupportedPolicy::Placeholder => Book::placeholder(path, &options.unknown_author),
            UnsupportedPolicy::Reject => {
                return Err(ParseError::UnsupportedFormat {
                    extension: extension_of(path),
                });
            }
        },
    };

    log::info!(
        "解析完成: 《{}》 {}, {} 个章节",
        book.title(),
        book.author(),
        book.chapters().len()
    );
    Ok(book)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}
