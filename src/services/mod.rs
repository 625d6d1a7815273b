pub mod llm;
pub mod summarizer;
pub mod transcript;
