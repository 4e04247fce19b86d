//! EPUB解压
//!
//! 把整个压缩包解压到一个随机命名的临时目录中。目录归 `ExtractedArchive` 独占，
//! 调用方必须在所有退出路径上调用 `release`；`Drop` 只是兜底。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{ParseError, Result};

/// EPUB规定的mimetype内容
const EPUB_MIMETYPE: &str = "application/epub+zip";

/// 已解压的EPUB目录树
#[derive(Debug)]
pub struct ExtractedArchive {
    dir: Option<TempDir>,
    root: PathBuf,
}

impl ExtractedArchive {
    /// 解压EPUB文件到新的临时目录
    ///
    /// # 参数
    /// * `path` - EPUB文件路径
    /// * `prefix` - 临时目录名前缀
    ///
    /// # 返回值
    /// * `Result<ExtractedArchive>` - 压缩包不存在、损坏或无法创建目录时返回 `ArchiveExtractionFailure`
    pub fn extract(path: &Path, prefix: &str) -> Result<Self> {
        let failure = |reason: String| ParseError::ArchiveExtractionFailure {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| failure(format!("无法打开文件: {}", e)))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| failure(format!("不是有效的压缩包: {}", e)))?;

        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| failure(format!("无法创建临时目录: {}", e)))?;
        let root = dir.path().to_path_buf();

        // 解压失败时 `dir` 在这里被丢弃，目录随之删除
        archive
            .extract(&root)
            .map_err(|e| failure(format!("解压失败: {}", e)))?;

        log::debug!(
            "已解压 {} 个条目到 {}",
            archive.len(),
            root.display()
        );

        Ok(Self {
            dir: Some(dir),
            root,
        })
    }

    /// 解压目录的根路径
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 递归删除解压目录，重复调用不做任何事
    pub fn release(&mut self) -> Result<()> {
        match self.dir.take() {
            Some(dir) => {
                dir.close().map_err(|source| ParseError::TempCleanupFailure {
                    path: self.root.clone(),
                    source,
                })?;
                log::debug!("已删除临时目录 {}", self.root.display());
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// 检查mimetype文件，缺失或内容不符只记录警告
    pub fn check_mimetype(&self) {
        match fs::read_to_string(self.root.join("mimetype")) {
            Ok(content) if content.trim() == EPUB_MIMETYPE => {}
            Ok(content) => log::warn!(
                "无效的mimetype: 期望 {}, 找到 {}",
                EPUB_MIMETYPE,
                content.trim()
            ),
            Err(_) => log::warn!("缺少mimetype文件"),
        }
    }
}

impl Drop for ExtractedArchive {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            log::warn!("临时目录 {} 未显式释放，在析构时删除", self.root.display());
            if let Err(e) = dir.close() {
                log::error!("无法删除临时目录 {}: {}", self.root.display(), e);
            }
        }
    }
}
