//! Host-facing nodes wrapping the pipeline stages.
//!
//! Nodes are registered explicitly with a [`NodeRegistry`] at startup; see
//! [`register_builtin_nodes`].

pub(crate) mod builtin;
pub(crate) mod registry;
pub(crate) mod schema;
