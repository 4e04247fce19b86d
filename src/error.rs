use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// 文档解析相关的错误类型
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("文件不存在: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("无法读取文件 {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("不支持的文件格式: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("无法解压EPUB文件 {}: {reason}", path.display())]
    ArchiveExtractionFailure { path: PathBuf, reason: String },

    #[error("container.xml解析错误: {0}")]
    ContainerParseFailure(String),

    #[error("OPF文件解析错误 {}: {reason}", path.display())]
    ManifestParseFailure { path: PathBuf, reason: String },

    #[error("无法清理临时目录 {}: {source}", path.display())]
    TempCleanupFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("配置文件错误: {0}")]
    Config(String),
}

impl ParseError {
    /// 构造读取错误，UTF-8解码失败时也归为此类
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ParseError::ReadError {
            path: path.into(),
            source,
        }
    }
}
