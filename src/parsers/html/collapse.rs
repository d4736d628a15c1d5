//! 将导航以外的列表折叠进 `<details>` 中

use markup5ever_rcdom::Handle;

use super::dom::{
    append_child, create_element, create_text, find_nodes, get_node_name, get_parent_node,
    replace_node,
};

pub const LIST_CONTAINER_CLASS: &str = "list-container";
pub const COLLAPSE_SUMMARY: &str = "Click to expand";

/// Wraps every `ul` whose parent is not a `nav` into a collapsible block
///
/// Returns the number of wrapped lists.
pub fn collapse_lists(document: &Handle) -> usize {
    let mut collapsed = 0;

    for list in find_nodes(document, &["ul"]) {
        let Some(parent) = get_parent_node(&list) else {
            continue;
        };
        if get_node_name(&parent) == Some("nav") {
            continue;
        }

        let details = create_element("details", &[("class", LIST_CONTAINER_CLASS)]);
        let summary = create_element("summary", &[]);
        append_child(&summary, create_text(COLLAPSE_SUMMARY));
        append_child(&details, summary);

        if replace_node(&list, details.clone()) {
            append_child(&details, list);
            collapsed += 1;
        }
    }

    collapsed
}
