use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use crate::core::WebOneError;

/// 将 HTML 字节转换为 DOM
///
/// 无法识别的编码按 UTF-8 处理，非法字节会被替换。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> Result<RcDom, WebOneError> {
    let s = match Encoding::for_label(document_encoding.trim().as_bytes()) {
        Some(encoding) => encoding.decode(data).0.into_owned(),
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| WebOneError::Parse(e.to_string()))
}

/// 查找指定路径的DOM节点
pub fn find_nodes(node: &Handle, node_names: &[&str]) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    let Some((node_name, rest)) = node_names.split_first() else {
        return found_nodes;
    };

    match get_node_name(node) {
        Some(name) if name == *node_name && rest.is_empty() => {
            found_nodes.push(node.clone());
        }
        Some(name) if name == *node_name => {
            for child_node in node.children.borrow().iter() {
                found_nodes.append(&mut find_nodes(child_node, rest));
            }
            return found_nodes;
        }
        _ => {}
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_names));
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性，`None` 表示移除该属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut found_existing_attr = false;

        attrs_mut.retain_mut(|attr| {
            if &*attr.name.local != attr_name {
                return true;
            }

            found_existing_attr = true;
            match &attr_value {
                Some(value) => {
                    attr.value = StrTendril::from_slice(value);
                    true
                }
                None => false,
            }
        });

        if !found_existing_attr {
            if let Some(value) = attr_value {
                attrs_mut.push(create_attribute(attr_name, &value));
            }
        }
    }
}

fn create_attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: format_tendril!("{}", value),
    }
}

/// 创建一个游离的 HTML 元素
pub fn create_element(name: &str, attrs: &[(&str, &str)]) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(name)),
        attrs: RefCell::new(
            attrs
                .iter()
                .map(|(name, value)| create_attribute(name, value))
                .collect(),
        ),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

pub fn create_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}

/// 将 `child` 追加为 `parent` 的最后一个子节点
pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// 获取父节点
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let parent = child.parent.take();
    let upgraded = parent.as_ref().and_then(|weak| weak.upgrade());
    child.parent.set(parent);
    upgraded
}

/// 用 `replacement` 替换 `node` 在父节点中的位置
pub fn replace_node(node: &Handle, replacement: Handle) -> bool {
    let Some(parent) = get_parent_node(node) else {
        return false;
    };

    let mut children = parent.children.borrow_mut();
    match children.iter().position(|child| Rc::ptr_eq(child, node)) {
        Some(index) => {
            replacement.parent.set(Some(Rc::downgrade(&parent)));
            children[index] = replacement;
            node.parent.set(None);
            true
        }
        None => false,
    }
}
