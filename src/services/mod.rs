pub mod aligner;
pub mod deepl_translator;
pub mod excel_writer;
pub mod html_writer;
pub mod openai_translator;
pub mod similarity;
pub mod translator;

pub use aligner::{align, ensure_reference_covers, AlignedRow};
pub use deepl_translator::DeepLTranslator;
pub use excel_writer::ExcelWriter;
pub use html_writer::HtmlWriter;
pub use openai_translator::OpenAiTranslator;
pub use similarity::{similarity_percent, SequenceMatcher};
pub use translator::{translate_paragraph, Translate, TranslatorBackend};
