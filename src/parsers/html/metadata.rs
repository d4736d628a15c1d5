//! 文档元数据
//!
//! 读取 base URL、字符编码和标题，并向 head 中注入样式表与视口声明。

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::{parse_content_type, RequestContext, WebOneError};

use super::dom::{append_child, create_element, find_nodes, get_node_attr};

pub const VIEWPORT_CONTENT: &str = "width=device-width, initial-scale=1.0";

/// 获取文档中第一个 `<base>` 的 href
pub fn get_base_url(handle: &Handle) -> Option<String> {
    find_nodes(handle, &["html", "head", "base"])
        .iter()
        .find_map(|base_node| get_node_attr(base_node, "href"))
}

/// 获取文档字符编码
///
/// 支持两种格式：
/// 1. HTML5 格式：`<meta charset="utf-8">`
/// 2. HTML4 格式：`<meta http-equiv="content-type" content="text/html; charset=utf-8">`
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(meta_charset_node_attr_value) = get_node_attr(meta_node, "charset") {
            return Some(meta_charset_node_attr_value);
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(content) = get_node_attr(meta_node, "content") {
                let (_media_type, charset) = parse_content_type(&content);
                if !charset.is_empty() {
                    return Some(charset);
                }
            }
        }
    }

    None
}

/// 获取文档标题
pub fn get_title(node: &Handle) -> Option<String> {
    for title_node in find_nodes(node, &["html", "head", "title"]).iter() {
        for child_node in title_node.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child_node.data {
                return Some(contents.borrow().trim().to_string());
            }
        }
    }

    None
}

/// 向保留下来的 head 追加样式表链接和视口声明
///
/// 注入的节点不再经过过滤。
pub fn augment_head(head: &Handle, context: &RequestContext) -> Result<(), WebOneError> {
    append_child(
        head,
        create_element(
            "link",
            &[
                ("href", context.routes().stylesheet_path.as_str()),
                ("rel", "stylesheet"),
                ("type", "text/css"),
            ],
        ),
    );
    append_child(
        head,
        create_element(
            "meta",
            &[("name", "viewport"), ("content", VIEWPORT_CONTENT)],
        ),
    );

    Ok(())
}
