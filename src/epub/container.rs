use crate::epub::resolve_within;
use crate::error::{ParseError, Result};
use crate::markup;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::path::{Path, PathBuf};

/// container.xml相对于解压根目录的位置
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// 指向OPF文件的属性名
const FULL_PATH_ATTR: &str = "full-path";

/// 读取container.xml并解析出OPF文件的绝对路径
///
/// # 参数
/// * `root` - 解压根目录
///
/// # 返回值
/// * `Result<PathBuf>` - OPF文件路径；文件缺失、不可读或没有 `full-path` 属性时返回 `ContainerParseFailure`
pub fn resolve_package_path(root: &Path) -> Result<PathBuf> {
    let container_path = root.join(CONTAINER_PATH);
    let xml_content = fs::read_to_string(&container_path).map_err(|e| {
        ParseError::ContainerParseFailure(format!("无法读取{}: {}", CONTAINER_PATH, e))
    })?;

    let full_path = find_full_path(&xml_content).ok_or_else(|| {
        ParseError::ContainerParseFailure(format!("{}中没有找到full-path属性", CONTAINER_PATH))
    })?;

    let package_path = resolve_within(root, root, &full_path).ok_or_else(|| {
        ParseError::ContainerParseFailure(format!("full-path指向解压目录之外: {}", full_path))
    })?;

    log::debug!("OPF文件路径: {}", package_path.display());
    Ok(package_path)
}

/// 查找第一个非空的 `full-path` 属性值
///
/// 先用XML事件解析；如果文档在找到属性之前就已损坏，退回到属性模式扫描。
pub fn find_full_path(xml_content: &str) -> Option<String> {
    let value = match scan_xml_events(xml_content) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("container.xml格式错误({})，改用模式匹配", e);
            markup::find_attribute(xml_content, FULL_PATH_ATTR).map(str::to_string)
        }
    };

    value
        .map(|v| markup::decode_entities(&v))
        .filter(|v| !v.trim().is_empty())
}

fn scan_xml_events(xml_content: &str) -> std::result::Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                for attr_result in e.attributes() {
                    let attr = attr_result.map_err(quick_xml::Error::InvalidAttr)?;
                    if attr.key.as_ref() == FULL_PATH_ATTR.as_bytes() {
                        return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
        <rootfile full-path="OEBPS/other.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    fn write_container(root: &Path, content: &str) {
        fs::create_dir_all(root.join("META-INF")).unwrap();
        fs::write(root.join(CONTAINER_PATH), content).unwrap();
    }

    #[test]
    fn test_find_first_full_path() {
        assert_eq!(
            find_full_path(CONTAINER_XML),
            Some("OEBPS/content.opf".to_string())
        );
    }

    #[test]
    fn test_find_full_path_in_malformed_xml() {
        let broken = r#"<container><rootfiles><rootfile media-type="x" full-path="content.opf"/><</container"#;
        assert_eq!(find_full_path(broken), Some("content.opf".to_string()));
    }

    #[test]
    fn test_missing_or_empty_full_path() {
        assert_eq!(find_full_path("<container><rootfiles/></container>"), None);
        assert_eq!(find_full_path(r#"<rootfile full-path=""/>"#), None);
    }

    #[test]
    fn test_resolve_package_path() {
        let dir = tempfile::tempdir().unwrap();
        write_container(dir.path(), CONTAINER_XML);

        let path = resolve_package_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("OEBPS").join("content.opf"));
    }

    #[test]
    fn test_leading_slash_full_path() {
        let dir = tempfile::tempdir().unwrap();
        write_container(dir.path(), r#"<rootfile full-path="/OEBPS/content.opf"/>"#);

        let path = resolve_package_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("OEBPS").join("content.opf"));
    }

    #[test]
    fn test_missing_container() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_package_path(dir.path());
        assert!(matches!(result, Err(ParseError::ContainerParseFailure(_))));
    }

    #[test]
    fn test_container_without_full_path() {
        let dir = tempfile::tempdir().unwrap();
        write_container(dir.path(), "<container><rootfiles><rootfile/></rootfiles></container>");

        let result = resolve_package_path(dir.path());
        assert!(matches!(result, Err(ParseError::ContainerParseFailure(_))));
    }

    #[test]
    fn test_full_path_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        write_container(dir.path(), r#"<rootfile full-path="../../etc/content.opf"/>"#);

        let result = resolve_package_path(dir.path());
        assert!(matches!(result, Err(ParseError::ContainerParseFailure(_))));
    }
}
