//! EPUB解析流水线
//!
//! 解压 → container.xml → OPF → 章节内容，每一步都是无状态函数，
//! 由 `reader::parse_epub` 串联，并保证临时目录在返回前被删除。

pub mod archive;
pub mod container;
pub mod content;
pub mod opf;
pub mod reader;

use std::path::{Component, Path, PathBuf};

pub use archive::ExtractedArchive;
pub use opf::{Manifest, ManifestItem, Metadata, PackageDocument, SpineEntry};
pub use reader::parse_epub;

/// 把 `relative` 相对于 `base` 解析并做词法规范化，结果不在 `root` 之内时返回 `None`
///
/// `relative` 开头的 `/` 被忽略，始终追加在 `base` 之后。
pub(crate) fn resolve_within(root: &Path, base: &Path, relative: &str) -> Option<PathBuf> {
    let relative: PathBuf = Path::new(relative)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();

    let mut resolved = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    resolved.starts_with(root).then_some(resolved)
}
