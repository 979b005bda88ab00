//! Order-statistic AVL tree for Rust.
//!
//! This crate provides [`OSAvlTree`], an ordered set of unique keys backed by an AVL
//! tree whose nodes also track the size of their subtree. The size augmentation
//! turns order questions into O(log n) walks:
//!
//! - [`NodeRef::rank`] - The number of keys less than a node's key
//! - [`range_count`](OSAvlTree::range_count) - The number of keys in `[lo, hi]`
//! - [`get_by_rank`](OSAvlTree::get_by_rank) - The key at a given sorted position
//! - Indexing by [`Rank`] - e.g., `tree[Rank(0)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use osavl_tree::{OSAvlTree, Rank, range_query};
//!
//! let mut tree = OSAvlTree::new();
//! tree.insert(8);
//! tree.insert(10);
//! tree.insert(1);
//!
//! // Keys 1 and 8 lie in [0, 9].
//! assert_eq!(range_query(&tree, &0, &9), 2);
//!
//! // Bound queries return nodes that know their rank.
//! let upper = tree.upper_bound(&8).unwrap();
//! assert_eq!(*upper.key(), 10);
//! assert_eq!(upper.rank(), 2);
//!
//! assert_eq!(tree[Rank(0)], 1);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) range counting** - Two rank lookups, no scan of the keys in range
//! - **Strong exception safety** - [`try_insert`](OSAvlTree::try_insert) and
//!   [`try_clone`](OSAvlTree::try_clone) leave every tree untouched on failure
//! - **No recursion** - Copying and clearing use explicit work stacks
//! - **`cli`** - Builds the `range_query` command driver
//!
//! # Implementation
//!
//! Nodes live in an arena owned by the tree and refer to each other by handle.
//! A child link is the only owner of a node; the parent link is a back-reference
//! used to walk towards the root while rebalancing and computing ranks.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod compare;
pub mod error;
pub mod osavl_tree;

pub use compare::{Compare, Natural};
pub use error::ReserveError;
pub use order_statistic::Rank;
pub use osavl_tree::{NodeRef, OSAvlTree, range_query, total_size};
