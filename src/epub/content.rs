//! 章节内容加载
//!
//! 按阅读顺序读取每个内容文件，提取章节标题和纯文本，并原样保留标记。
//! 无法解析、不存在或不可读的文件只会被跳过，不会中断解析。

use crate::book::{positional_title, Chapter};
use crate::epub::resolve_within;
use crate::markup::{self, Element};
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Path, PathBuf};

/// 按顺序加载章节
///
/// # 参数
/// * `root` - 解压根目录，解析后的路径不允许离开此目录
/// * `base_dir` - OPF文件所在目录
/// * `hrefs` - 按脊柱顺序排列的href
pub fn load_chapters(root: &Path, base_dir: &Path, hrefs: &[String]) -> Vec<Chapter> {
    let mut chapters = Vec::new();

    for href in hrefs {
        let Some(path) = resolve_href(root, base_dir, href) else {
            log::warn!("跳过无法解析的章节路径: {}", href);
            continue;
        };

        if !path.is_file() {
            log::warn!("章节文件不存在: {}", path.display());
            continue;
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                let position = chapters.len() + 1;
                chapters.push(build_chapter(content, position));
            }
            Err(e) => {
                log::warn!("无法读取章节文件 {}: {}", path.display(), e);
            }
        }
    }

    log::debug!("加载了 {}/{} 个章节", chapters.len(), hrefs.len());
    chapters
}

/// 由一个内容文件构建章节
///
/// `position` 是该章节在已成功加载章节中的序号（从1开始），用于标题回退。
pub fn build_chapter(content: String, position: usize) -> Chapter {
    let title = extract_title(&content).unwrap_or_else(|| positional_title(position));
    let plain_text = extract_plain_text(&content);
    Chapter::new(title, plain_text, content, position)
}

/// 章节标题：先取 `<title>`，再取第一个 `<h1>`
pub fn extract_title(content: &str) -> Option<String> {
    markup::element_value(content, Element::Title)
        .or_else(|| markup::element_value(content, Element::H1))
}

/// 去除 `<title>` 元素和所有标签后的正文，空白原样保留
pub fn extract_plain_text(content: &str) -> String {
    markup::strip_markup(&markup::remove_title_elements(content))
}

/// 去掉片段标识并做百分号解码，再相对于OPF目录解析
fn resolve_href(root: &Path, base_dir: &Path, href: &str) -> Option<PathBuf> {
    let without_fragment = href.split('#').next().unwrap_or_default();
    if without_fragment.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(without_fragment).decode_utf8().ok()?;
    resolve_within(root, base_dir, &decoded)
}
