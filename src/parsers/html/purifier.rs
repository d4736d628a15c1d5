//! 白名单过滤
//!
//! 深度优先、后序地决定每个节点的去留。删除的节点从父节点的子节点列表中移除，
//! 保留下来的元素按标签分派给元素处理器完成结构性重写。

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::{RequestContext, WebOneError};

use super::element_handlers::ElementHandlerRegistry;
use super::policy::TagPolicy;

pub struct Purifier<'a> {
    policy: &'a TagPolicy,
    registry: ElementHandlerRegistry,
}

impl<'a> Purifier<'a> {
    /// 创建带有 a、form、head 处理器的过滤器
    pub fn new(policy: &'a TagPolicy) -> Self {
        Self::with_registry(policy, ElementHandlerRegistry::new())
    }

    /// 创建只做过滤、不做任何重写的过滤器
    pub fn filter_only(policy: &'a TagPolicy) -> Self {
        Self::with_registry(policy, ElementHandlerRegistry::empty())
    }

    pub fn with_registry(policy: &'a TagPolicy, registry: ElementHandlerRegistry) -> Self {
        Purifier { policy, registry }
    }

    /// Purifies `node` and everything below it in place
    ///
    /// Returns `true` when the caller must drop `node` from its parent.
    /// Filtering never fails; an error comes from an element handler and
    /// leaves the tree half-processed, so the document must be discarded.
    pub fn purify(&self, node: &Handle, context: &RequestContext) -> Result<bool, WebOneError> {
        match node.data {
            NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => Ok(true),
            NodeData::Doctype { .. } => Ok(false),
            NodeData::Document => {
                self.purify_children(node, context)?;
                Ok(false)
            }
            NodeData::Text { ref contents } => Ok(contents.borrow().trim().is_empty()),
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag = name.local.as_ref();

                if !self.policy.is_allowed_tag(tag) {
                    return Ok(true);
                }

                self.purify_children(node, context)?;

                if node.children.borrow().is_empty() && !self.policy.is_allowed_empty(tag) {
                    return Ok(true);
                }

                if !self.policy.keeps_all_attrs(tag) {
                    attrs
                        .borrow_mut()
                        .retain(|attr| self.policy.is_allowed_attr(attr.name.local.as_ref()));
                }

                self.registry.handle_element(tag, context, node)?;

                Ok(false)
            }
        }
    }

    /// 净化所有子节点，并一次性移除被删除的子节点
    pub fn purify_children(
        &self,
        node: &Handle,
        context: &RequestContext,
    ) -> Result<(), WebOneError> {
        let snapshot: Vec<Handle> = node.children.borrow().clone();
        let mut survivors = Vec::with_capacity(snapshot.len());

        for child in snapshot {
            if self.purify(&child, context)? {
                child.parent.set(None);
            } else {
                survivors.push(child);
            }
        }

        *node.children.borrow_mut() = survivors;

        Ok(())
    }
}
