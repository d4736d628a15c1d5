//! 标签策略
//!
//! 决定哪些元素和属性可以保留在净化后的文档中。

use std::collections::HashSet;

/// 默认允许的元素
pub const ALLOWED_TAGS: &[&str] = &[
    "html", "head", "title", "body", "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "a",
    "nav", "div", "span", "header", "footer", "section", "article", "summary", "table", "caption",
    "th", "tr", "td", "thead", "tbody", "tfoot", "col", "colgroup", "ul", "ol", "li", "dl", "dt",
    "dd", "b", "blockquote", "code", "center", "pre", "i", "q", "s", "strong", "u", "main", "link",
    "form", "input", "textarea", "label",
];

/// 默认允许保留的属性
pub const ALLOWED_ATTRS: &[&str] = &["href", "colspan", "id"];

/// 即使没有子节点也保留的元素
pub const ALLOWED_EMPTY_TAGS: &[&str] = &["td", "textarea", "input", "form", "br", "hr"];

/// 保留全部属性的元素
pub const ATTR_EXEMPT_TAGS: &[&str] = &["meta", "form", "input"];

/// Decides which elements and attributes survive purification
///
/// Tag and attribute names are compared by their lowercase local name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagPolicy {
    allowed_tags: HashSet<String>,
    allowed_attrs: HashSet<String>,
    allowed_empty_tags: HashSet<String>,
    attr_exempt_tags: HashSet<String>,
}

fn to_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_ascii_lowercase()).collect()
}

impl TagPolicy {
    /// 创建一个空策略，所有元素都会被删除
    pub fn empty() -> Self {
        TagPolicy {
            allowed_tags: HashSet::new(),
            allowed_attrs: HashSet::new(),
            allowed_empty_tags: HashSet::new(),
            attr_exempt_tags: HashSet::new(),
        }
    }

    pub fn with_allowed_tags(mut self, tags: &[&str]) -> Self {
        self.allowed_tags = to_set(tags);
        self
    }

    pub fn with_allowed_attrs(mut self, attrs: &[&str]) -> Self {
        self.allowed_attrs = to_set(attrs);
        self
    }

    pub fn with_allowed_empty_tags(mut self, tags: &[&str]) -> Self {
        self.allowed_empty_tags = to_set(tags);
        self
    }

    pub fn with_attr_exempt_tags(mut self, tags: &[&str]) -> Self {
        self.attr_exempt_tags = to_set(tags);
        self
    }

    pub fn allow_tag(&mut self, tag: &str) {
        self.allowed_tags.insert(tag.to_ascii_lowercase());
    }

    pub fn is_allowed_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    pub fn is_allowed_attr(&self, attr: &str) -> bool {
        self.allowed_attrs.contains(attr)
    }

    pub fn is_allowed_empty(&self, tag: &str) -> bool {
        self.allowed_empty_tags.contains(tag)
    }

    /// Attribute-exempt elements keep every attribute they arrived with
    pub fn keeps_all_attrs(&self, tag: &str) -> bool {
        self.attr_exempt_tags.contains(tag)
    }
}

impl Default for TagPolicy {
    fn default() -> Self {
        TagPolicy::empty()
            .with_allowed_tags(ALLOWED_TAGS)
            .with_allowed_attrs(ALLOWED_ATTRS)
            .with_allowed_empty_tags(ALLOWED_EMPTY_TAGS)
            .with_attr_exempt_tags(ATTR_EXEMPT_TAGS)
    }
}
