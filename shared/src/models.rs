pub mod metadata;
pub mod node;
pub mod pod;
pub mod quantity;

pub use metadata::Metadata;
pub use node::{Node, NodeStatus, Resources};
pub use pod::{Pod, PodSpec};
pub use quantity::{Quantity, QuantityError};
