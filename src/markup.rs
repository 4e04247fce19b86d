//! 宽松的标记扫描
//!
//! OPF和XHTML内容都按模式匹配处理，不做结构校验：
//! 格式错误的文档也能尽量提取出标签、属性和元素文本。

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// 任意 `<...>` 标签（包括注释、声明、闭合标签）
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

// 元素开始标签：名称和属性区
static RE_START_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z_][\w:.\-]*)((?:\s[^>]*)?)/?>").expect("valid start tag regex")
});

// 双引号包裹的属性值
static RE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.\-]*)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
});

static RE_TITLE: Lazy<Regex> = Lazy::new(|| element_regex("title"));
static RE_H1: Lazy<Regex> = Lazy::new(|| element_regex("h1"));
static RE_DC_TITLE: Lazy<Regex> = Lazy::new(|| element_regex("dc:title"));
static RE_DC_CREATOR: Lazy<Regex> = Lazy::new(|| element_regex("dc:creator"));
static RE_DC_LANGUAGE: Lazy<Regex> = Lazy::new(|| element_regex("dc:language"));
static RE_DC_IDENTIFIER: Lazy<Regex> = Lazy::new(|| element_regex("dc:identifier"));

// `<tag ...>内容</tag>`，开始标签允许带属性，标签名大小写不敏感
fn element_regex(tag: &str) -> Regex {
    Regex::new(&format!(
        r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>",
        tag = regex::escape(tag)
    ))
    .expect("valid element regex")
}

/// 按内容提取的元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Title,
    H1,
    DcTitle,
    DcCreator,
    DcLanguage,
    DcIdentifier,
}

impl Element {
    fn regex(self) -> &'static Regex {
        match self {
            Element::Title => &RE_TITLE,
            Element::H1 => &RE_H1,
            Element::DcTitle => &RE_DC_TITLE,
            Element::DcCreator => &RE_DC_CREATOR,
            Element::DcLanguage => &RE_DC_LANGUAGE,
            Element::DcIdentifier => &RE_DC_IDENTIFIER,
        }
    }
}

/// 标签扫描得到的一个开始标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// 带前缀的标签名，例如 `dc:title`
    pub name: String,
    /// 双引号属性，同名属性以第一个为准
    pub attributes: HashMap<String, String>,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// 按文档顺序扫描所有开始标签（含自闭合标签）
pub fn scan_tags(markup: &str) -> impl Iterator<Item = Tag> + '_ {
    RE_START_TAG.captures_iter(markup).map(|caps| {
        let name = caps[1].to_string();
        let attributes = parse_attributes(caps.get(2).map_or("", |m| m.as_str()));
        Tag { name, attributes }
    })
}

/// 解析标签属性区中所有 `name="value"` 形式的属性
pub fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for caps in RE_ATTRIBUTE.captures_iter(raw) {
        attributes
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].to_string());
    }
    attributes
}

/// 查找第一个名为 `name` 的双引号属性的值，不关心它属于哪个元素
pub fn find_attribute<'a>(markup: &'a str, name: &str) -> Option<&'a str> {
    RE_ATTRIBUTE
        .captures_iter(markup)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// 返回第一个该元素开始标签与结束标签之间的原始内容
pub fn element_text(markup: &str, element: Element) -> Option<&str> {
    element
        .regex()
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 提取元素文本并清理：去除嵌套标签、解码实体、去掉首尾空白，空结果视为不存在
pub fn element_value(markup: &str, element: Element) -> Option<String> {
    element_text(markup, element)
        .map(|raw| strip_markup(raw).trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 去除所有标签，并解码四个固定实体
///
/// 标签通过反复匹配删除，直到不再有 `<...>`；
/// 实体按 `&nbsp;`、`&lt;`、`&gt;`、`&amp;` 的顺序替换，其他实体保持原样。
pub fn strip_markup(markup: &str) -> String {
    decode_entities(&remove_tags(markup))
}

/// 反复删除 `<...>` 直到没有匹配
pub fn remove_tags(markup: &str) -> String {
    let mut content = markup.to_string();
    while RE_TAG.is_match(&content) {
        content = RE_TAG.replace_all(&content, "").into_owned();
    }
    content
}

/// 解码 `&nbsp;`、`&lt;`、`&gt;`、`&amp;` 四个实体
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// 删除所有 `<title>` 元素，文档标题不计入正文；`<head>` 中的其他内容保留
pub fn remove_title_elements(markup: &str) -> String {
    RE_TITLE.replace_all(markup, "").into_owned()
}
