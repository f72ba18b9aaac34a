mod definitions;
pub mod visitor;
mod walk;
pub use definitions::*;
