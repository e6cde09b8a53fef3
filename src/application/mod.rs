pub mod ports;
pub mod registry;
pub mod usecases;

pub use ports::*;
pub use registry::*;
