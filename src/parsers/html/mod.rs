//! HTML解析和处理模块
//!
//! - `dom`: 解析和基础DOM操作
//! - `policy`: 元素与属性白名单
//! - `purifier`: 白名单过滤
//! - `element_handlers`: 过滤后按标签分派的结构性重写
//! - `metadata`: 文档元数据与 head 注入
//! - `collapse`: 列表折叠
//! - `serializer`: 序列化功能

pub mod collapse;
pub mod dom;
pub mod element_handlers;
pub mod metadata;
pub mod policy;
pub mod purifier;
pub mod serializer;

pub use collapse::collapse_lists;
pub use dom::{
    append_child, create_element, create_text, find_nodes, get_node_attr,
    get_node_name, get_parent_node, html_to_dom, replace_node, set_node_attr,
};
pub use element_handlers::{ElementHandler, ElementHandlerRegistry};
pub use metadata::{augment_head, get_base_url, get_charset, get_title};
pub use policy::TagPolicy;
pub use purifier::Purifier;
pub use serializer::serialize_document;
