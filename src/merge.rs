//! Folding of per-key values into one result tree.
//!
//! [`merge`] reconciles two values that landed on the same path. It takes
//! both sides by value and returns the merged tree, so nothing the caller
//! still holds is ever mutated. While values are folded, sequences are kept
//! sparse in a working tree: a slot costs one entry however large its
//! index is, and holes are absent keys. Lowering the tree back to a
//! [`Value`] lists the occupied slots in index order, which compacts every
//! sequence in the same pass.
//!
//! ```rust
//! use qs_value::merge::merge;
//! use qs_value::{qs, ParseOptions};
//!
//! let merged = merge(qs!({ "a": "b" }), qs!({ "c": "d" }), &ParseOptions::default());
//! assert_eq!(merged, qs!({ "a": "b", "c": "d" }));
//!
//! let merged = merge(qs!("b"), qs!("c"), &ParseOptions::default());
//! assert_eq!(merged, qs!(["b", "c"]));
//! ```

use crate::keys::is_forbidden_key;
use crate::{ParseOptions, QsMap, Value};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Position of an item in a sparse sequence.
///
/// Wider than any index the parser accepts, so shifting and pushing past
/// `usize::MAX` cannot wrap.
pub(crate) type Slot = u128;

/// Working form of a tree while values are folded together.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    /// A scalar; never `Undefined`, `Sequence` or `Mapping`.
    Leaf(Value),
    List(BTreeMap<Slot, Node>),
    Map(IndexMap<String, Node>),
}

impl Node {
    /// Lifts a value into the working form. `Undefined` lifts to nothing,
    /// and `Undefined` items and entries are left out.
    pub(crate) fn from_value(value: Value) -> Option<Node> {
        match value {
            Value::Undefined => None,
            Value::Sequence(items) => Some(Node::List(
                (0..)
                    .zip(items)
                    .filter_map(|(slot, item)| Node::from_value(item).map(|node| (slot, node)))
                    .collect(),
            )),
            Value::Mapping(map) => Some(Node::Map(
                map.into_iter()
                    .filter_map(|(key, item)| Node::from_value(item).map(|node| (key, node)))
                    .collect(),
            )),
            scalar => Some(Node::Leaf(scalar)),
        }
    }

    /// Lowers the tree to a [`Value`], densifying every sequence.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Node::Leaf(value) => value,
            Node::List(slots) => {
                Value::Sequence(slots.into_values().map(Node::into_value).collect())
            }
            Node::Map(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect(),
            ),
        }
    }

    /// A one-item sequence holding `node` at `slot`.
    pub(crate) fn at_slot(slot: Slot, node: Node) -> Node {
        let mut slots = BTreeMap::new();
        slots.insert(slot, node);
        Node::List(slots)
    }

    /// A one-entry mapping.
    pub(crate) fn entry(key: String, node: Node) -> Node {
        let mut entries = IndexMap::with_capacity(1);
        entries.insert(key, node);
        Node::Map(entries)
    }

    fn is_structured(&self) -> bool {
        !matches!(self, Node::Leaf(_))
    }
}

/// Appends `incoming` to `existing` the way repeated flat keys accumulate.
///
/// Sequences on either side are flattened one level.
#[must_use]
pub fn combine(existing: Value, incoming: Value) -> Value {
    let mut items = match existing {
        Value::Sequence(items) => items,
        other => vec![other],
    };
    match incoming {
        Value::Sequence(more) => items.extend(more),
        other => items.push(other),
    }
    Value::Sequence(items)
}

/// Merges `source` into `target`.
///
/// Rules, first match wins:
///
/// - an `Undefined` source leaves the target unchanged
/// - a scalar source is appended to a sequence target
/// - a scalar source becomes a `true` flag key on a mapping target; `Null`
///   and empty text add nothing
/// - two scalars become a two-element sequence
/// - a scalar target is prepended to a structured source
/// - two sequences merge slot by slot
/// - a sequence meeting a mapping whose keys are all canonical indices
///   merges with it slot by slot; any other mapping turns the sequence into
///   a mapping keyed by index
/// - two mappings merge key by key
///
/// The result is compacted: holes left by sparse indices are removed.
#[must_use]
pub fn merge(target: Value, source: Value, options: &ParseOptions) -> Value {
    match (Node::from_value(target), Node::from_value(source)) {
        (Some(target), Some(source)) => merge_nodes(target, source, options).into_value(),
        (Some(node), None) | (None, Some(node)) => node.into_value(),
        (None, None) => Value::Undefined,
    }
}

pub(crate) fn merge_nodes(target: Node, source: Node, options: &ParseOptions) -> Node {
    match (target, source) {
        (Node::List(mut slots), Node::Leaf(value)) => {
            push(&mut slots, Node::Leaf(value));
            Node::List(slots)
        }

        (Node::Map(mut entries), Node::Leaf(value)) => {
            add_flag(&mut entries, &value, options);
            Node::Map(entries)
        }

        (Node::Leaf(target), Node::List(slots)) => {
            let mut merged = BTreeMap::new();
            merged.insert(0, Node::Leaf(target));
            merged.extend(
                slots
                    .into_iter()
                    .map(|(slot, item)| (slot.saturating_add(1), item)),
            );
            Node::List(merged)
        }

        (Node::Leaf(target), source) => {
            let mut merged = BTreeMap::new();
            merged.insert(0, Node::Leaf(target));
            merged.insert(1, source);
            Node::List(merged)
        }

        (Node::List(slots), Node::List(incoming)) => {
            Node::List(merge_slots(slots, incoming, options))
        }

        (Node::List(slots), Node::Map(incoming)) => match index_slots(incoming, options) {
            Ok(incoming) => Node::List(merge_slots(slots, incoming, options)),
            Err(incoming) => Node::Map(merge_entries(slots_to_entries(slots), incoming, options)),
        },

        (Node::Map(entries), Node::List(incoming)) => match index_slots(entries, options) {
            Ok(slots) => Node::List(merge_slots(slots, incoming, options)),
            Err(entries) => Node::Map(merge_entries(entries, slots_to_entries(incoming), options)),
        },

        (Node::Map(entries), Node::Map(incoming)) => {
            Node::Map(merge_entries(entries, incoming, options))
        }
    }
}

fn add_flag(entries: &mut IndexMap<String, Node>, source: &Value, options: &ParseOptions) {
    let Some(key) = source.scalar_text() else {
        return;
    };
    if key.is_empty() {
        return;
    }
    if options.rejects_prototype_keys() && is_forbidden_key(&key) {
        log::debug!("refusing prototype-reserved flag key {:?}", key);
        return;
    }
    entries.insert(key, Node::Leaf(Value::Bool(true)));
}

/// Stores `item` one past the highest occupied slot.
fn push(slots: &mut BTreeMap<Slot, Node>, item: Node) {
    let next = slots
        .keys()
        .next_back()
        .map_or(0, |last| last.saturating_add(1));
    slots.insert(next, item);
}

fn merge_slots(
    mut slots: BTreeMap<Slot, Node>,
    incoming: BTreeMap<Slot, Node>,
    options: &ParseOptions,
) -> BTreeMap<Slot, Node> {
    for (slot, item) in incoming {
        let occupant = slots.get(&slot).map(Node::is_structured);
        match occupant {
            Some(true) if item.is_structured() => {
                if let Some(existing) = slots.remove(&slot) {
                    slots.insert(slot, merge_nodes(existing, item, options));
                }
            }
            Some(_) => push(&mut slots, item),
            None => {
                slots.insert(slot, item);
            }
        }
    }
    slots
}

fn merge_entries(
    mut entries: IndexMap<String, Node>,
    incoming: IndexMap<String, Node>,
    options: &ParseOptions,
) -> IndexMap<String, Node> {
    for (key, node) in incoming {
        match entries.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::replace(existing, Node::Leaf(Value::Undefined));
                *existing = merge_nodes(current, node, options);
            }
            None => {
                entries.insert(key, node);
            }
        }
    }
    entries
}

/// Re-reads a mapping as a sparse sequence when every key is a canonical
/// index, as over-limit index segments produce. Hands the mapping back
/// otherwise.
fn index_slots(
    entries: IndexMap<String, Node>,
    options: &ParseOptions,
) -> std::result::Result<BTreeMap<Slot, Node>, IndexMap<String, Node>> {
    let all_indices = !entries.is_empty() && entries.keys().all(|key| canonical_index(key).is_some());
    if !options.parse_arrays || !all_indices {
        return Err(entries);
    }
    Ok(entries
        .into_iter()
        .filter_map(|(key, node)| canonical_index(&key).map(|slot| (slot, node)))
        .collect())
}

/// Parses `key` as a slot if it is written the way the slot would print.
pub(crate) fn canonical_index(key: &str) -> Option<Slot> {
    let slot = key.parse::<Slot>().ok()?;
    (slot.to_string() == key).then_some(slot)
}

pub(crate) fn slots_to_entries(slots: BTreeMap<Slot, Node>) -> IndexMap<String, Node> {
    slots
        .into_iter()
        .map(|(slot, node)| (slot.to_string(), node))
        .collect()
}

/// Re-keys a sequence by its index strings, skipping holes.
#[must_use]
pub fn sequence_to_mapping(items: Vec<Value>) -> QsMap {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| !item.is_undefined())
        .map(|(index, item)| (index.to_string(), item))
        .collect()
}

/// Removes `Undefined` slots from every sequence in the tree.
///
/// Runs over an explicit work list, so arbitrarily deep input cannot
/// exhaust the stack. Every node is visited exactly once; an owned tree
/// has no shared or cyclic children.
pub fn compact(value: &mut Value) {
    let mut pending: Vec<&mut Value> = vec![value];
    while let Some(node) = pending.pop() {
        match node {
            Value::Sequence(items) => {
                items.retain(|item| !item.is_undefined());
                pending.extend(items.iter_mut());
            }
            Value::Mapping(map) => pending.extend(map.values_mut()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qs;

    fn merge_default(target: Value, source: Value) -> Value {
        merge(target, source, &ParseOptions::default())
    }

    #[test]
    fn test_combine_flattens() {
        assert_eq!(combine(qs!("a"), qs!("b")), qs!(["a", "b"]));
        assert_eq!(combine(qs!(["a", "b"]), qs!("c")), qs!(["a", "b", "c"]));
        assert_eq!(combine(qs!("a"), qs!(["b", "c"])), qs!(["a", "b", "c"]));
    }

    #[test]
    fn test_undefined_source() {
        assert_eq!(merge_default(qs!("a"), Value::Undefined), qs!("a"));
    }

    #[test]
    fn test_scalar_pairs() {
        assert_eq!(merge_default(qs!("a"), qs!("b")), qs!(["a", "b"]));
        assert_eq!(merge_default(Value::Null, qs!("b")), qs!([null, "b"]));
    }

    #[test]
    fn test_append_to_sequence() {
        assert_eq!(merge_default(qs!(["a"]), qs!("b")), qs!(["a", "b"]));
    }

    #[test]
    fn test_scalar_on_mapping_sets_flag() {
        assert_eq!(
            merge_default(qs!({ "b": "c" }), qs!("d")),
            qs!({ "b": "c", "d": true })
        );
        assert_eq!(merge_default(qs!({ "b": "c" }), qs!("")), qs!({ "b": "c" }));
        assert_eq!(
            merge_default(qs!({ "b": "c" }), qs!("constructor")),
            qs!({ "b": "c" })
        );
    }

    #[test]
    fn test_scalar_promoted_before_structure() {
        assert_eq!(merge_default(qs!("a"), qs!(["b", "c"])), qs!(["a", "b", "c"]));
        assert_eq!(
            merge_default(qs!("a"), qs!({ "b": "c" })),
            qs!(["a", { "b": "c" }])
        );
    }

    #[test]
    fn test_sequences_merge_by_slot() {
        let target = Value::Sequence(vec![qs!({ "a": "b" })]);
        let source = Value::Sequence(vec![qs!({ "c": "d" })]);
        assert_eq!(merge_default(target, source), qs!([{ "a": "b", "c": "d" }]));

        let sparse = Value::Sequence(vec![Value::Undefined, qs!("y")]);
        assert_eq!(merge_default(qs!(["x"]), sparse), qs!(["x", "y"]));

        let taken = Value::Sequence(vec![qs!("z")]);
        assert_eq!(merge_default(qs!(["x"]), taken), qs!(["x", "z"]));

        let scalar = Value::Sequence(vec![qs!("z")]);
        assert_eq!(
            merge_default(qs!([{ "a": "b" }]), scalar),
            qs!([{ "a": "b" }, "z"])
        );
    }

    #[test]
    fn test_sequence_meets_mapping() {
        let merged = merge_default(qs!(["bar"]), qs!({ "bad": "baz" }));
        assert_eq!(merged, qs!({ "0": "bar", "bad": "baz" }));

        let merged = merge_default(qs!({ "bad": "baz" }), qs!(["bar"]));
        assert_eq!(merged, qs!({ "bad": "baz", "0": "bar" }));
    }

    #[test]
    fn test_index_keyed_mapping_meets_sequence() {
        let overflow = qs!({ "9999": "1" });
        let sparse = Value::Sequence(vec![Value::Undefined, Value::Undefined, qs!("2")]);
        assert_eq!(merge_default(overflow, sparse), qs!(["2", "1"]));

        let merged = merge_default(qs!(["x"]), qs!({ "99": "y" }));
        assert_eq!(merged, qs!(["x", "y"]));

        let options = ParseOptions::default().with_parse_arrays(false);
        let merged = merge(qs!({ "99": "y" }), qs!(["x"]), &options);
        assert_eq!(merged, qs!({ "99": "y", "0": "x" }));
    }

    #[test]
    fn test_slots_stay_sparse() {
        let huge = Node::at_slot(Slot::from(u64::MAX), Node::Leaf(qs!("x")));
        let small = Node::at_slot(2, Node::Leaf(qs!("y")));
        let merged = merge_nodes(huge, small, &ParseOptions::default());
        match &merged {
            Node::List(slots) => assert_eq!(slots.len(), 2),
            other => panic!("Expected list, got {:?}", other),
        }
        assert_eq!(merged.into_value(), qs!(["y", "x"]));
    }

    #[test]
    fn test_push_after_highest_slot() {
        let list = Node::at_slot(Slot::from(u64::MAX), Node::Leaf(qs!("x")));
        let merged = merge_nodes(list, Node::Leaf(qs!("y")), &ParseOptions::default());
        assert_eq!(merged.into_value(), qs!(["x", "y"]));
    }

    #[test]
    fn test_canonical_index() {
        assert_eq!(canonical_index("0"), Some(0));
        assert_eq!(canonical_index("9999"), Some(9999));
        assert_eq!(canonical_index("01"), None);
        assert_eq!(canonical_index("+1"), None);
        assert_eq!(canonical_index("a"), None);
    }

    #[test]
    fn test_mappings_merge_recursively() {
        let merged = merge_default(
            qs!({ "a": { "b": "c" } }),
            qs!({ "a": { "d": "e" }, "f": "g" }),
        );
        assert_eq!(merged, qs!({ "a": { "b": "c", "d": "e" }, "f": "g" }));
    }

    #[test]
    fn test_sequence_to_mapping_skips_holes() {
        let map = sequence_to_mapping(vec![Value::Undefined, qs!("a"), qs!("b")]);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    #[test]
    fn test_compact_nested() {
        let mut value = qs!({
            "a": [null, { "b": [] }]
        });
        if let Value::Mapping(map) = &mut value {
            if let Some(Value::Sequence(items)) = map.get_mut("a") {
                items.insert(0, Value::Undefined);
                items.push(Value::Sequence(vec![Value::Undefined, qs!("c")]));
            }
        }
        compact(&mut value);
        assert_eq!(value, qs!({ "a": [null, { "b": [] }, ["c"]] }));
    }
}
