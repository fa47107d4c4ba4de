//! Removal of design-tool-only tokens before normalization.

use dtp_types::{Tier, TokenNode, TokenTree};
use tracing::debug;

/// `sys` groups that only exist for the design tool.
pub const TOOL_ONLY_SYS_GROUPS: [&str; 2] = ["More styles", "layer-opacity"];

/// Drop tool-only `sys` groups and lift `base.base.unit` to `base.unit`.
pub fn clean_tool_tokens(mut tree: TokenTree) -> TokenTree {
    if let Some(sys) = tree
        .root_mut()
        .get_mut(Tier::Sys.as_str())
        .and_then(TokenNode::as_group_mut)
    {
        for key in TOOL_ONLY_SYS_GROUPS {
            if sys.remove(key).is_some() {
                debug!(group = key, "removed tool-only sys group");
            }
        }
    }

    if let Some(base) = tree
        .root_mut()
        .get_mut(Tier::Base.as_str())
        .and_then(TokenNode::as_group_mut)
    {
        let unit = base
            .get("base")
            .and_then(TokenNode::as_group)
            .and_then(|nested| nested.get("unit"))
            .cloned();
        if let Some(unit) = unit {
            base.remove("base");
            base.insert("unit", unit);
        }
    }
    tree
}
