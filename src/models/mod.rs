pub mod comparison;
pub mod loaders;

pub use comparison::{
    ComparisonRow, ComparisonTable, Paragraph, TableSummary, TranslationOutcome, COLUMN_HEADERS,
};
pub use loaders::{load_pdf, PdfSource};
