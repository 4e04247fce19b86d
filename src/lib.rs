pub mod book;
pub mod config;
pub mod epub;
pub mod error;
pub mod format;
pub mod markup;
pub mod text;

// === 核心API重新导出 ===

/// 解析入口
pub use format::{detect_format, parse, parse_with_options};

/// 错误处理
pub use error::{ParseError, Result};

// === 数据结构 ===

/// 书籍与章节
pub use book::{Book, Chapter, Format};

/// 解析选项
pub use config::{ParseOptions, UnsupportedPolicy};

// === 底层组件（高级用法） ===

/// EPUB流水线组件
pub use epub::{ExtractedArchive, Manifest, ManifestItem, Metadata, PackageDocument, SpineEntry};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "将TXT、EPUB等文档解析为统一书籍模型的Rust库";
