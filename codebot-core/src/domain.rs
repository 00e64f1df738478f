pub mod outcome;
pub mod payload;
pub mod task;

pub use outcome::*;
pub use payload::*;
pub use task::*;
