//! Red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`], ordered map and set
//! collections backed by a classic red-black tree: a self-balancing binary
//! search tree guaranteeing O(log n) insertion, lookup, and removal together
//! with ordered forward and backward iteration.
//!
//! # Example
//!
//! ```
//! use crimson_tree::RBTreeMap;
//!
//! let mut inventory = RBTreeMap::new();
//! inventory.insert("apples", 12);
//! inventory.insert("pears", 3);
//! inventory.insert("quinces", 7);
//!
//! // Lookup and update in O(log n).
//! assert_eq!(inventory.get(&"pears"), Some(&3));
//! *inventory.entry("pears").or_insert(0) += 1;
//!
//! // Iteration is always in key order.
//! let names: Vec<_> = inventory.keys().copied().collect();
//! assert_eq!(names, ["apples", "pears", "quinces"]);
//!
//! // The largest key is one step back from the end.
//! assert_eq!(inventory.iter().next_back(), Some((&"quinces", &7)));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap`/`BTreeSet` where they overlap
//! - **Stable entries** - Nodes never move while they live, so unrelated
//!   references stay valid across inserts and removals of other keys
//!
//! # Implementation
//!
//! A red-black tree is a binary search tree in which every node carries a
//! color tag and three links (parent, left child, right child). Five rules
//! tie the colors to the shape: every node is red or black, the root is
//! black, the shared "nil" leaf is black, a red node never has a red child,
//! and every path from a node down to a nil leaf crosses the same number of
//! black nodes. Together they bound the tree height by 2 log2(n + 1), which
//! is what makes every operation O(log n) in the worst case.
//!
//! Nodes live in a handle-addressed arena with slot 0 permanently reserved
//! for the single shared sentinel node that stands in for "no child" and
//! "no parent" everywhere. Links are plain arena indices, so the
//! parent/child back-references that make pointer-based red-black trees
//! awkward to own never form reference cycles here. Values are stored in a
//! second arena addressed through each node's value handle, which keeps
//! mutable value access disjoint from the link structure.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: The iterator types need `unsafe` raw-pointer access into the arenas,
// so `unsafe_code` cannot be forbidden outright.
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
