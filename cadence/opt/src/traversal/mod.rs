//! Helpers for traversing scopes and regions in scheduling order.
mod post_order;

pub use post_order::{RegionTraversal, ScopeTraversal};

/// A pass or analysis that can be identified by name.
pub trait Named {
    /// The name of a pass. Is used for identifying passes.
    fn name() -> &'static str;
    /// A short description of the pass.
    fn description() -> &'static str;
}
