//! 元数据模块
//!
//! 从OPF文档中按模式提取Dublin Core元数据。

use crate::markup::{self, Element};

/// 书籍元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// 第一个 `<dc:title>` 的内容
    pub title: Option<String>,
    /// 第一个 `<dc:creator>` 的内容
    pub creator: Option<String>,
    /// 语言
    pub language: Option<String>,
    /// 标识符(ISBN、UUID等)
    pub identifier: Option<String>,
}

impl Metadata {
    /// 从OPF文本中提取元数据
    ///
    /// 提取的值会去掉首尾空白并解码固定实体，空值视为不存在。
    pub fn extract(opf_content: &str) -> Self {
        Self {
            title: markup::element_value(opf_content, Element::DcTitle),
            creator: markup::element_value(opf_content, Element::DcCreator),
            language: markup::element_value(opf_content, Element::DcLanguage),
            identifier: markup::element_value(opf_content, Element::DcIdentifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_metadata() {
        let opf = r#"<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>
            Pride &amp; Prejudice
        </dc:title>
        <dc:creator opf:role="aut">Jane Austen</dc:creator>
        <dc:creator>Second Author</dc:creator>
        <dc:language>en</dc:language>
        <dc:identifier id="BookId">urn:uuid:1234</dc:identifier>
    </metadata>"#;

        let metadata = Metadata::extract(opf);
        assert_eq!(metadata.title.as_deref(), Some("Pride & Prejudice"));
        assert_eq!(metadata.creator.as_deref(), Some("Jane Austen"));
        assert_eq!(metadata.language.as_deref(), Some("en"));
        assert_eq!(metadata.identifier.as_deref(), Some("urn:uuid:1234"));
    }

    #[test]
    fn test_missing_metadata() {
        let metadata = Metadata::extract("<metadata><dc:title></dc:title></metadata>");
        assert_eq!(metadata, Metadata::default());
    }
}
