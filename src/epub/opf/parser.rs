//! OPF解析器模块
//!
//! 按模式扫描OPF文档：任何同时带 `id` 和 `href` 属性的元素都是清单项，
//! 任何带 `idref` 属性的元素都是脊柱项，不要求它们位于 `<manifest>`/`<spine>` 之内。

use crate::epub::opf::{
    manifest::{Manifest, ManifestItem},
    metadata::Metadata,
    spine::SpineEntry,
};
use crate::error::{ParseError, Result};
use crate::markup;
use std::fs;
use std::path::{Path, PathBuf};

/// OPF文件解析结果
#[derive(Debug, Clone)]
pub struct PackageDocument {
    /// OPF文件路径
    pub path: PathBuf,
    /// 元数据
    pub metadata: Metadata,
    /// 清单项(文件列表)
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineEntry>,
}

impl PackageDocument {
    /// 读取并解析OPF文件
    ///
    /// # 返回值
    /// * `Result<PackageDocument>` - 文件无法打开或读取时返回 `ManifestParseFailure`；
    ///   清单或脊柱为空不算错误
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ParseError::ManifestParseFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self::parse(&content, path))
    }

    /// 解析OPF文本
    pub fn parse(opf_content: &str, path: &Path) -> Self {
        let metadata = Metadata::extract(opf_content);
        let mut manifest = Manifest::new();
        let mut spine = Vec::new();

        for tag in markup::scan_tags(opf_content) {
            if let (Some(id), Some(href)) = (tag.attr("id"), tag.attr("href")) {
                manifest.insert(ManifestItem::new(
                    markup::decode_entities(id),
                    markup::decode_entities(href),
                ));
            }
            if let Some(idref) = tag.attr("idref") {
                spine.push(SpineEntry::new(markup::decode_entities(idref)));
            }
        }

        log::debug!(
            "OPF解析完成: {} 个清单项, {} 个脊柱项",
            manifest.len(),
            spine.len()
        );

        Self {
            path: path.to_path_buf(),
            metadata,
            manifest,
            spine,
        }
    }

    /// OPF文件所在的目录，清单中的href相对于此目录
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// 按脊柱顺序返回内容文件的href
    ///
    /// 找不到对应清单项的脊柱项被直接丢弃；重复的脊柱项保留。
    pub fn reading_order(&self) -> Vec<String> {
        self.spine
            .iter()
            .filter_map(|entry| match self.manifest.href(&entry.idref) {
                Some(href) => Some(href.to_string()),
                None => {
                    log::debug!("脊柱项 {} 在清单中不存在，已忽略", entry.idref);
                    None
                }
            })
            .collect()
    }
}
