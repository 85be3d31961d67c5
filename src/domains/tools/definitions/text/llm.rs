use std::sync::OnceLock;

use serde_json::json;
use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::domains::tools::{OpResult, OperationError};

/// Byte-pair encodings understood by `llm_tokenize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    R50k,
    P50k,
    Cl100k,
    O200k,
}

impl Encoding {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gpt2" | "r50k_base" | "r50k" => Some(Self::R50k),
            "p50k_base" | "p50k" => Some(Self::P50k),
            "cl100k_base" | "cl100k" => Some(Self::Cl100k),
            "o200k_base" | "o200k" => Some(Self::O200k),
            _ => None,
        }
    }

    fn encoder(self) -> Result<&'static CoreBPE, OperationError> {
        static R50K: OnceLock<CoreBPE> = OnceLock::new();
        static P50K: OnceLock<CoreBPE> = OnceLock::new();
        static CL100K: OnceLock<CoreBPE> = OnceLock::new();
        static O200K: OnceLock<CoreBPE> = OnceLock::new();

        let (cell, build): (&'static OnceLock<CoreBPE>, fn() -> anyhow::Result<CoreBPE>) =
            match self {
                Self::R50k => (&R50K, tiktoken_rs::r50k_base),
                Self::P50k => (&P50K, tiktoken_rs::p50k_base),
                Self::Cl100k => (&CL100K, tiktoken_rs::cl100k_base),
                Self::O200k => (&O200K, tiktoken_rs::o200k_base),
            };

        if let Some(bpe) = cell.get() {
            return Ok(bpe);
        }
        debug!("Loading {:?} encoding", self);
        let bpe = build().map_err(|e| {
            OperationError::external(format!("Failed to load {:?} encoding: {}", self, e))
        })?;
        Ok(cell.get_or_init(|| bpe))
    }
}

pub fn llm_tokenize(text: &str, algorithm: &str) -> OpResult {
    let encoding = Encoding::parse(algorithm).ok_or_else(|| {
        OperationError::invalid_input(format!(
            "Unsupported algorithm '{}'. Supported: gpt2, r50k_base, p50k_base, cl100k_base, o200k_base",
            algorithm
        ))
    })?;
    let bpe = encoding.encoder()?;

    let token_ids = bpe.encode_with_special_tokens(text);
    let tokens = bpe
        .split_by_token(text, true)
        .map_err(|e| OperationError::external(format!("Tokenization failed: {}", e)))?;

    Ok(json!({
        "algorithm": algorithm.trim().to_ascii_lowercase(),
        "tokenizer_backend": "tiktoken",
        "tokens": tokens,
        "token_ids": token_ids,
        "token_count": token_ids.len(),
    }))
}
