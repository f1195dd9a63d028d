mod base;
mod builder;
mod fixed;
mod layer;
mod partial;
mod state;
mod zeros;

pub use base::{BaseTree, DEFAULT_ZERO_ELEMENT};
pub use builder::TreeBuilder;
pub use fixed::MerkleTree;
pub use layer::Layer;
pub use partial::PartialMerkleTree;
pub use state::SerializedTreeState;
pub use zeros::build_zeros;

pub(crate) use base::capacity_for;
