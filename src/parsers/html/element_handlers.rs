//! HTML 元素处理器模块
//!
//! 元素通过过滤之后，按标签名分派给对应的处理器做结构性重写：
//!
//! - `a`：链接经由代理入口
//! - `form`：表单提交到代理的表单端点
//! - `head`：注入样式表和视口声明
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use crate::parsers::html::element_handlers::ElementHandlerRegistry;
//!
//! let registry = ElementHandlerRegistry::new();
//! registry.handle_element("a", &context, &node)?;
//! ```

use markup5ever_rcdom::Handle;

use crate::core::{RequestContext, WebOneError};
use crate::parsers::form_rewriter::rewrite_form;
use crate::parsers::link_rewriter::rewrite_link;

use super::metadata::augment_head;

/// HTML 元素处理器特征
///
/// 处理器只会收到已经通过过滤并完成属性清理的元素。
pub trait ElementHandler {
    /// 处理指定的HTML元素节点
    ///
    /// 返回错误时整个文档的净化随之中止。
    fn handle(&self, context: &RequestContext, node: &Handle) -> Result<(), WebOneError>;

    /// 检查是否能处理指定的元素名称
    fn can_handle(&self, element_name: &str) -> bool;
}

/// A 元素处理器
pub struct AnchorElementHandler;

impl ElementHandler for AnchorElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "a"
    }

    fn handle(&self, context: &RequestContext, node: &Handle) -> Result<(), WebOneError> {
        rewrite_link(node, context)
    }
}

/// FORM 元素处理器
pub struct FormElementHandler;

impl ElementHandler for FormElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "form"
    }

    fn handle(&self, context: &RequestContext, node: &Handle) -> Result<(), WebOneError> {
        rewrite_form(node, context)
    }
}

/// HEAD 元素处理器
///
/// 被整体删除的 head 不会到达这里，因此不会注入任何内容。
pub struct HeadElementHandler;

impl ElementHandler for HeadElementHandler {
    fn can_handle(&self, element_name: &str) -> bool {
        element_name == "head"
    }

    fn handle(&self, context: &RequestContext, node: &Handle) -> Result<(), WebOneError> {
        augment_head(node, context)
    }
}

/// 元素处理器注册表
///
/// 处理器按注册顺序查找，只有第一个能处理该元素的处理器会被调用。
pub struct ElementHandlerRegistry {
    handlers: Vec<Box<dyn ElementHandler>>,
}

impl ElementHandlerRegistry {
    /// 创建已注册 a、form、head 处理器的注册表
    pub fn new() -> Self {
        let mut registry = ElementHandlerRegistry::empty();

        registry.register(Box::new(AnchorElementHandler));
        registry.register(Box::new(FormElementHandler));
        registry.register(Box::new(HeadElementHandler));

        registry
    }

    /// 创建不含任何处理器的注册表，只做过滤
    pub fn empty() -> Self {
        ElementHandlerRegistry {
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, handler: Box<dyn ElementHandler>) {
        self.handlers.push(handler);
    }

    /// 处理指定的HTML元素，没有对应处理器的元素保持不变
    pub fn handle_element(
        &self,
        element_name: &str,
        context: &RequestContext,
        node: &Handle,
    ) -> Result<(), WebOneError> {
        match self
            .handlers
            .iter()
            .find(|handler| handler.can_handle(element_name))
        {
            Some(handler) => handler.handle(context, node),
            None => Ok(()),
        }
    }
}

impl Default for ElementHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
