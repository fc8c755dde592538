//! Pipeline module - the discretization engine and its orchestrators

pub mod discretize;
pub mod entropy;
pub mod evaluate;
pub mod interval;
pub mod normalise;
pub mod partition;
pub mod ranking;
pub mod splitter;

pub use discretize::*;
pub use entropy::*;
pub use evaluate::*;
pub use interval::*;
pub use normalise::*;
pub use partition::{Partition, SplitTree};
pub use ranking::*;
pub use splitter::*;
