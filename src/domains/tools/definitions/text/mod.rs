//! Text analysis namespace.

mod counting;
mod llm;
mod nlp;

pub use counting::*;
pub use llm::*;
pub use nlp::*;

use crate::domains::tools::{NamespaceDef, ParamSpec};
use crate::operation;

pub const DESCRIPTION: &str = "Text analysis and manipulation utilities.";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION)
        .operation(
            operation!("words_count", "Count the words in a text.", |args, _| {
                words_count(args.str("text")?)
            })
            .param(ParamSpec::string("text", "Input text")),
        )
        .operation(
            operation!(
                "characters_count",
                "Count the characters in a text, with and without spaces.",
                |args, _| characters_count(args.str("text")?)
            )
            .param(ParamSpec::string("text", "Input text")),
        )
        .operation(
            operation!(
                "show_characters",
                "Split a word into its individual characters.",
                |args, _| show_characters(args.str("word")?)
            )
            .param(ParamSpec::string("word", "Word to split")),
        )
        .operation(
            operation!("word_stem", "Stem of an English word (Snowball).", |args, _| {
                word_stem(args.str("word")?)
            })
            .param(ParamSpec::string("word", "English word")),
        )
        .operation(
            operation!(
                "nlp_tokenize",
                "Tokenize English text into stemmed words with stop words removed.",
                |args, _| nlp_tokenize(args.str("text")?)
            )
            .param(ParamSpec::string("text", "Input text")),
        )
        .operation(
            operation!(
                "llm_tokenize",
                "Tokenize text with an LLM byte-pair encoding (gpt2, p50k_base, cl100k_base, o200k_base).",
                |args, _| llm_tokenize(args.str("text")?, args.str("algorithm")?)
            )
            .param(ParamSpec::string("text", "Input text"))
            .param(ParamSpec::string("algorithm", "Encoding name").with_default("gpt2")),
        )
}
