//! 解析选项配置模块
//!
//! 提供解析行为的配置管理功能，支持从YAML文件加载配置。

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认的作者占位值
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// 默认的临时目录前缀
pub const DEFAULT_TEMP_PREFIX: &str = "inkforge-";

/// 遇到不支持的扩展名时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// 返回只有一个"Preview"章节的占位书籍
    #[default]
    Placeholder,
    /// 直接返回 `ParseError::UnsupportedFormat`
    Reject,
}

/// 解析选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// 按纯文本解析的扩展名（不区分大小写）
    pub text_extensions: Vec<String>,
    /// 按EPUB包解析的扩展名（不区分大小写）
    pub epub_extensions: Vec<String>,
    /// 不支持格式的处理策略
    pub unsupported: UnsupportedPolicy,
    /// 找不到作者时使用的值
    pub unknown_author: String,
    /// 解压目录名前缀，目录名的其余部分是随机的
    pub temp_prefix: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            text_extensions: vec!["txt".to_string()],
            epub_extensions: vec!["epub".to_string()],
            unsupported: UnsupportedPolicy::Placeholder,
            unknown_author: UNKNOWN_AUTHOR.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl ParseOptions {
    /// 从YAML配置文件加载解析选项
    ///
    /// 文件中缺省的字段使用默认值。
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use inkforge::ParseOptions;
    /// let options = ParseOptions::from_file("inkforge.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ParseError::Config(format!("无法读取配置文件: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// 从YAML字符串解析选项
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| ParseError::Config(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件到指定路径
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| ParseError::Config(format!("序列化配置失败: {}", e)))?;

        // 在YAML内容前添加注释说明
        let content_with_header = format!(
            "# inkforge 解析选项\n# unsupported: placeholder 返回占位书籍，reject 返回错误\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| ParseError::Config(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 检查扩展名是否属于纯文本格式
    pub fn is_text_extension(&self, extension: &str) -> bool {
        contains_ignore_case(&self.text_extensions, extension)
    }

    /// 检查扩展名是否属于EPUB格式
    pub fn is_epub_extension(&self, extension: &str) -> bool {
        contains_ignore_case(&self.epub_extensions, extension)
    }
}

fn contains_ignore_case(list: &[String], extension: &str) -> bool {
    list.iter().any(|ext| ext.eq_ignore_ascii_case(extension))
}
