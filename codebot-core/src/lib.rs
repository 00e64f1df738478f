pub mod domain;
pub mod error;
pub mod format;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use format::{
    escape_markdown_v2, extract_code_blocks, find_code_blocks, CodeBlock, FenceLabel,
};
pub use traits::*;
