pub mod dictionary;
pub mod lemmatizer;
pub mod processor;
pub mod sentences;
pub mod tagger;
pub mod translator;

pub use dictionary::FreeDictionary;
pub use lemmatizer::EnglishLemmatizer;
pub use processor::EnglishProcessor;
pub use sentences::SentenceSplitter;
pub use tagger::EnglishTagger;
pub use translator::OpenAiTranslator;
