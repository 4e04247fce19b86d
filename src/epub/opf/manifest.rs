//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

use std::collections::HashMap;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件所在目录)
    pub href: String,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: String, href: String) -> Self {
        Self { id, href }
    }
}

/// 清单：ID到文件路径的映射，重复的ID以最后一次出现为准
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: HashMap<String, ManifestItem>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入清单项，已存在的同ID项会被覆盖
    pub fn insert(&mut self, item: ManifestItem) {
        if let Some(previous) = self.items.insert(item.id.clone(), item) {
            log::debug!("清单ID重复，覆盖: {} ({})", previous.id, previous.href);
        }
    }

    /// 按ID查找文件路径
    pub fn href(&self, id: &str) -> Option<&str> {
        self.items.get(id).map(|item| item.href.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
