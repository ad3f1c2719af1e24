//! `ParseTree` export as nested, indented `BTreeNode { kind, value,
//! nodeList }` records:
//!
//! ```text
//! BTreeNode
//! {
//!     kind: -2
//!     value: E
//!     nodeList:
//!         BTreeNode
//!         {
//!             kind: 100
//!             value: x1
//!             nodeList:
//!         }
//! }
//! ```
//!
//! `kind` is the resolved token code for a terminal leaf. For a
//! nonterminal node it is one of two sentinels: `-1` when the node's
//! first child is itself the same nonterminal (a left-recursive
//! production, e.g. `E -> E + T`), and `-2` for everything else
//! (ordinary multi-child productions and empty-rhs ones alike).

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::parse_tree::ParseTree;
use crate::symbol::Symbol;

const KIND_LEFT_RECURSIVE: i64 = -1;
const KIND_OTHER_NONTERMINAL: i64 = -2;

pub struct TreeIo;

impl TreeIo {
    pub fn export(tree: &ParseTree, terminal_codes: &BTreeMap<Symbol, i64>) -> String {
        let mut out = String::new();
        write_node(tree, terminal_codes, &mut out, 0);
        out
    }
}

fn node_kind(tree: &ParseTree, terminal_codes: &BTreeMap<Symbol, i64>) -> i64 {
    if tree.is_leaf() {
        return *terminal_codes.get(&tree.symbol).unwrap_or(&KIND_OTHER_NONTERMINAL);
    }
    match tree.children.first() {
        Some(first) if first.symbol == tree.symbol => KIND_LEFT_RECURSIVE,
        _ => KIND_OTHER_NONTERMINAL,
    }
}

fn write_node(tree: &ParseTree, terminal_codes: &BTreeMap<Symbol, i64>, out: &mut String, depth: usize) {
    let pad = "    ".repeat(depth);
    let child_pad = "    ".repeat(depth + 1);
    let kind = node_kind(tree, terminal_codes);
    let value = tree.lexeme.clone().unwrap_or_else(|| tree.symbol.name().to_string());

    let _ = writeln!(out, "{pad}BTreeNode");
    let _ = writeln!(out, "{pad}{{");
    let _ = writeln!(out, "{child_pad}kind: {kind}");
    let _ = writeln!(out, "{child_pad}value: {value}");
    if tree.children.is_empty() {
        let _ = writeln!(out, "{child_pad}nodeList:");
    } else {
        let _ = writeln!(out, "{child_pad}nodeList:");
        for child in &tree.children {
            write_node(child, terminal_codes, out, depth + 2);
        }
    }
    let _ = writeln!(out, "{pad}}}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_kind_is_its_token_code() {
        let mut codes = BTreeMap::new();
        codes.insert(Symbol::terminal("id"), 100);
        let leaf = ParseTree::leaf(Symbol::terminal("id"), "x1".into());
        assert_eq!(node_kind(&leaf, &codes), 100);
    }

    #[test]
    fn left_recursive_production_gets_sentinel_minus_one() {
        let inner = ParseTree::leaf(Symbol::terminal("id"), "a".into());
        let e = ParseTree::node(Symbol::nonterminal("E"), vec![inner]);
        let wrapped = ParseTree::node(Symbol::nonterminal("E"), vec![e]);
        assert_eq!(node_kind(&wrapped, &BTreeMap::new()), KIND_LEFT_RECURSIVE);
    }

    #[test]
    fn ordinary_production_gets_sentinel_minus_two() {
        let a = ParseTree::leaf(Symbol::terminal("a"), "a".into());
        let b = ParseTree::leaf(Symbol::terminal("b"), "b".into());
        let node = ParseTree::node(Symbol::nonterminal("S"), vec![a, b]);
        assert_eq!(node_kind(&node, &BTreeMap::new()), KIND_OTHER_NONTERMINAL);
    }

    #[test]
    fn empty_rhs_also_gets_sentinel_minus_two() {
        let node = ParseTree::node(Symbol::nonterminal("A"), vec![]);
        assert_eq!(node_kind(&node, &BTreeMap::new()), KIND_OTHER_NONTERMINAL);
    }

    #[test]
    fn export_nests_children_under_node_list() {
        let leaf = ParseTree::leaf(Symbol::terminal("id"), "x1".into());
        let tree = ParseTree::node(Symbol::nonterminal("E"), vec![leaf]);
        let text = TreeIo::export(&tree, &BTreeMap::new());
        assert!(text.contains("BTreeNode"));
        assert!(text.contains("nodeList:"));
        assert!(text.contains("x1"));
    }
}
