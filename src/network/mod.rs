//! Bipartite stochastic network and its Gibbs-style transition rule.

/// Units, layers and the complete bipartite state graph.
pub mod graph;
/// Activation probability and per-sweep state updates.
pub mod update;
