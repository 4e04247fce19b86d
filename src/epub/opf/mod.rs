//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块提供EPUB包文件的解析功能，包括元数据、清单、脊柱的提取，
//! 以及把脊柱解析为按阅读顺序排列的内容文件列表。

mod metadata;
mod manifest;
mod spine;
mod parser;

pub use metadata::Metadata;
pub use manifest::{Manifest, ManifestItem};
pub use spine::SpineEntry;
pub use parser::PackageDocument;
