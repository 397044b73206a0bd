pub mod gear;
pub mod teeth;

pub use gear::*;
pub use teeth::*;
