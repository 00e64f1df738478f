//! Text post-processing for replies delivered in Telegram's MarkdownV2 dialect.
//!
//! Two steps make up the pipeline: [`extract_code_blocks`] pulls fenced code out of
//! a model reply and re-wraps it, and [`escape_markdown_v2`] escapes plain prose.
//! Escaping is not idempotent, so every text segment must pass through it at most
//! once.

pub mod fence;
pub mod markdown;

pub use fence::{extract_code_blocks, find_code_blocks, CodeBlock, FenceLabel};
pub use markdown::{escape_markdown_v2, is_reserved, MARKDOWN_V2_RESERVED};
