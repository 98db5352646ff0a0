pub mod cache;
pub mod client;
pub mod translator;

pub use cache::TranslationCache;
pub use client::{GoogleTranslateClient, TranslationBackend};
pub use translator::{HeaderTranslator, TranslationOutcome, TranslationWarning};
