//! 表单重写模块
//!
//! 表单统一提交到代理的表单端点，原始的 action 和 method
//! 以隐藏字段的形式随表单一起提交。

use markup5ever_rcdom::Handle;

use crate::core::{RequestContext, WebOneError};
use crate::parsers::html::{append_child, create_element, get_node_attr, set_node_attr};
use crate::utils::url::{resolve_reference, ORIGIN_ACTION_FIELD, ORIGIN_METHOD_FIELD};

pub const DEFAULT_FORM_METHOD: &str = "get";

/// 重写表单
///
/// 表单端点按 Referer 中的请求地址解析相对 action。当页面的基础 URL
/// 与该地址不同时（重定向或 `<base href>`），action 在这里就被解析为绝对地址。
pub fn rewrite_form(node: &Handle, context: &RequestContext) -> Result<(), WebOneError> {
    let origin_action = origin_action(node, context)?;
    let origin_method =
        get_node_attr(node, "method").unwrap_or_else(|| DEFAULT_FORM_METHOD.to_string());

    append_child(node, hidden_input(ORIGIN_ACTION_FIELD, &origin_action));
    append_child(node, hidden_input(ORIGIN_METHOD_FIELD, &origin_method));

    set_node_attr(node, "method", Some("post".to_string()));
    set_node_attr(
        node,
        "action",
        Some(context.routes().form_endpoint.clone()),
    );

    Ok(())
}

fn origin_action(node: &Handle, context: &RequestContext) -> Result<String, WebOneError> {
    let action = get_node_attr(node, "action").unwrap_or_default();

    // 空的 action 指向页面本身，而不是 base
    if action.trim().is_empty() {
        if context.source_url() == context.requested_url() {
            return Ok(action);
        }
        return Ok(context.source_url().to_string());
    }

    if context.base_url() == context.requested_url() {
        return Ok(action);
    }

    Ok(resolve_reference(context.base_url(), &action)?.to_string())
}

fn hidden_input(name: &str, value: &str) -> Handle {
    create_element(
        "input",
        &[("type", "hidden"), ("name", name), ("value", value)],
    )
}
