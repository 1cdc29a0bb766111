// ABOUTME: DOM layer for component HTML: parsing and top-level normalization.
// ABOUTME: Wraps scraper's ego-tree arena so later stages address nodes by NodeId.

//! DOM utilities for component documents.
//!
//! Nodes are never detached or mutated after parsing; the partitioner and
//! serializer refer to them by [`ego_tree::NodeId`] and carry explicit skip
//! sets instead.

pub mod document;

pub use document::Document;
