use std::path::Path;

use crate::book::{Book, Format};
use crate::config::ParseOptions;
use crate::epub::archive::ExtractedArchive;
use crate::epub::container;
use crate::epub::content;
use crate::epub::opf::PackageDocument;
use crate::error::Result;

/// 解析EPUB文件
///
/// 解压目录在所有返回路径上都会被删除。解析本身失败时返回解析错误，
/// 此时删除失败只记录日志；解析成功但删除失败时返回 `TempCleanupFailure`。
///
/// # 参数
/// * `path` - EPUB文件路径
/// * `options` - 解析选项
///
/// # 返回值
/// * `Result<Book>` - 章节可能为空，是否替换为占位章节由调用方决定
pub fn parse_epub(path: &Path, options: &ParseOptions) -> Result<Book> {
    let mut archive = ExtractedArchive::extract(path, &options.temp_prefix)?;

    let result = read_extracted(&archive, path, options);
    let released = archive.release();

    match (result, released) {
        (Ok(book), Ok(())) => Ok(book),
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup)) => {
            log::error!("{}", cleanup);
            Err(e)
        }
    }
}

/// 在已解压的目录上执行 container → OPF → 章节 的流水线
fn read_extracted(archive: &ExtractedArchive, path: &Path, options: &ParseOptions) -> Result<Book> {
    let root = archive.root();
    archive.check_mimetype();

    let package_path = container::resolve_package_path(root)?;
    let package = PackageDocument::from_path(&package_path)?;

    if let Some(language) = &package.metadata.language {
        log::debug!("书籍语言: {}", language);
    }
    if let Some(identifier) = &package.metadata.identifier {
        log::debug!("书籍标识符: {}", identifier);
    }

    let hrefs = package.reading_order();
    let chapters = content::load_chapters(root, package.base_dir(), &hrefs);

    Ok(Book::assemble(
        package.metadata.title.clone(),
        package.metadata.creator.clone(),
        chapters,
        Format::Epub,
        path,
        &options.unknown_author,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    /// 创建一个测试用的EPUB文件
    fn create_test_epub(path: &Path, container_xml: &str, opf_xml: &str, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);

        zip.start_file("mimetype", FileOptions::<()>::default()).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", FileOptions::<()>::default()).unwrap();
        zip.write_all(container_xml.as_bytes()).unwrap();

        zip.start_file("OEBPS/content.opf", FileOptions::<()>::default()).unwrap();
        zip.write_all(opf_xml.as_bytes()).unwrap();

        for (name, content) in files {
            zip.start_file(format!("OEBPS/{}", name), FileOptions::<()>::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }

    /// 创建一个最后一个条目数据损坏的EPUB（未压缩条目，CRC不匹配）
    fn create_corrupt_epub(path: &Path, payload: &[u8]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let stored = || FileOptions::<()>::default().compression_method(CompressionMethod::Stored);

        zip.start_file("mimetype", stored()).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();
        zip.start_file("META-INF/container.xml", stored()).unwrap();
        zip.write_all(CONTAINER_XML.as_bytes()).unwrap();
        zip.start_file("OEBPS/ch1.html", stored()).unwrap();
        zip.write_all(payload).unwrap();
        zip.finish().unwrap();

        let mut bytes = fs::read(path).unwrap();
        let offset = bytes
            .windows(payload.len())
            .position(|window| window == payload)
            .unwrap();
        bytes[offset] ^= 0xff;
        fs::write(path, bytes).unwrap();
    }

    fn options_with_prefix(prefix: &str) -> ParseOptions {
        ParseOptions {
            temp_prefix: prefix.to_string(),
            ..ParseOptions::default()
        }
    }

    fn leftover_dirs(prefix: &str) -> Vec<PathBuf> {
        fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
            .map(|entry| entry.path())
            .collect()
    }

    #[test]
    fn test_spine_order_beats_manifest_order() {
        let scratch = tempfile::tempdir().unwrap();
        let epub = scratch.path().join("ordered_book.epub");
        let opf = r#"<package><metadata><dc:title>顺序测试</dc:title><dc:creator>作者</dc:creator></metadata>
<manifest><item id="c1" href="ch1.html"/><item id="c2" href="ch2.html"/></manifest>
<spine><itemref idref="c2"/><itemref idref="c1"/></spine></package>"#;
        create_test_epub(
            &epub,
            CONTAINER_XML,
            opf,
            &[
                ("ch1.html", "<title>One</title><p>first</p>"),
                ("ch2.html", "<title>Two</title><p>second</p>"),
            ],
        );

        let prefix = "inkforge-reader-order-";
        let book = parse_epub(&epub, &options_with_prefix(prefix)).unwrap();

        assert_eq!(book.title(), "顺序测试");
        assert_eq!(book.author(), "作者");
        let titles: Vec<&str> = book.chapters().iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Two", "One"]);
        assert_eq!(book.chapters()[0].plain_text(), "second");
        assert!(leftover_dirs(prefix).is_empty());
    }

    #[test]
    fn test_container_without_full_path_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let epub = scratch.path().join("broken.epub");
        create_test_epub(
            &epub,
            "<container><rootfiles><rootfile media-type=\"application/oebps-package+xml\"/></rootfiles></container>",
            "<package/>",
            &[],
        );

        let prefix = "inkforge-reader-container-";
        let result = parse_epub(&epub, &options_with_prefix(prefix));

        assert!(matches!(result, Err(ParseError::ContainerParseFailure(_))));
        assert!(leftover_dirs(prefix).is_empty());
    }

    #[test]
    fn test_corrupt_entry_during_extraction_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let epub = scratch.path().join("bad_crc.epub");
        create_corrupt_epub(&epub, b"<title>Damaged</title><p>payload bytes</p>");

        let prefix = "inkforge-reader-crc-";
        let result = parse_epub(&epub, &options_with_prefix(prefix));

        assert!(matches!(
            result,
            Err(ParseError::ArchiveExtractionFailure { .. })
        ));
        assert!(leftover_dirs(prefix).is_empty());
    }

    #[test]
    fn test_missing_package_document_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let epub = scratch.path().join("no_opf.epub");
        create_test_epub(
            &epub,
            r#"<rootfile full-path="OEBPS/missing.opf"/>"#,
            "<package/>",
            &[],
        );

        let prefix = "inkforge-reader-opf-";
        let result = parse_epub(&epub, &options_with_prefix(prefix));

        assert!(matches!(
            result,
            Err(ParseError::ManifestParseFailure { .. })
        ));
        assert!(leftover_dirs(prefix).is_empty());
    }

    #[test]
    fn test_empty_spine_yields_no_chapters() {
        let scratch = tempfile::tempdir().unwrap();
        let epub = scratch.path().join("empty_spine.epub");
        create_test_epub(&epub, CONTAINER_XML, "<package><manifest/><spine/></package>", &[]);

        let book = parse_epub(&epub, &options_with_prefix("inkforge-reader-empty-")).unwrap();
        assert_eq!(book.title(), "empty spine");
        assert_eq!(book.author(), "unknown");
        assert!(book.chapters().is_empty());
    }
}
