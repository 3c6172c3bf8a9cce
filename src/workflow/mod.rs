pub mod comparison_flow;
pub mod paragraph_ctx;

pub use comparison_flow::{build_table, ComparisonFlow};
pub use paragraph_ctx::ParagraphCtx;
