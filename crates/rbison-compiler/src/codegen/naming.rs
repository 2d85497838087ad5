//! Identifier assignment for generated handlers and node types.

use rbison_core::utils::{handler_name, node_type_name};

use super::Emitter;

/// Names the generated module imports or defines itself.
const RESERVED: &[&str] = &[
    "Associativity",
    "Dispatcher",
    "GrammarError",
    "GrammarSpec",
    "HandlerResult",
    "ParseEvent",
    "TreeNode",
    "Value",
    "MODULE_NAME",
    "TOKENS",
    "PRECEDENCES",
    "START",
    "LEXSCRIPT",
    "grammar",
    "dispatcher",
];

/// Generated identifiers of one target.
#[derive(Clone, Debug)]
pub(super) struct TargetNames {
    pub handler: String,
    pub node_type: String,
}

impl Emitter<'_> {
    /// Give every target a handler and node type name, in declaration order.
    ///
    /// Targets that map to a name already taken get a numeric suffix:
    /// `list-item` and `listItem` become `on_list_item` and `on_list_item_2`.
    pub(super) fn assign_names(&mut self) {
        self.used_names.extend(RESERVED.iter().map(|name| name.to_string()));

        let spec = self.spec;
        for target in spec.targets() {
            let handler = self.unique_name(&handler_name(target), "_");
            let node_type = self.unique_name(&node_type_name(target), "");
            self.names.insert(target.to_string(), TargetNames { handler, node_type });
        }
    }

    pub(super) fn unique_name(&mut self, base: &str, separator: &str) -> String {
        if self.used_names.insert(base.to_string()) {
            return base.to_string();
        }

        let mut counter = 2;
        loop {
            let name = format!("{base}{separator}{counter}");
            if self.used_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }

    pub(super) fn names_of(&self, target: &str) -> TargetNames {
        self.names.get(target).cloned().unwrap_or_else(|| TargetNames {
            handler: handler_name(target),
            node_type: node_type_name(target),
        })
    }
}
