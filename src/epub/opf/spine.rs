//! 脊柱模块
//!
//! 提供EPUB包中阅读顺序（脊柱）的结构定义。

/// 脊柱项信息(阅读顺序)，同一个ID可以出现多次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    /// 引用的清单项ID
    pub idref: String,
}

impl SpineEntry {
    /// 创建新的脊柱项
    pub fn new(idref: String) -> Self {
        Self { idref }
    }
}
