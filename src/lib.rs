//! Bilingual (Russian/English) noisy-channel query spelling corrector.
//!
//! The three read-only models ([`LanguageModel`], [`ErrorModel`], [`Trie`])
//! are built once from a training corpus and then shared read-only across
//! [`Spellchecker`] instances; see [`driver`] for the correction loop.

pub mod driver;
pub mod error;
pub mod error_model;
pub mod generators;
pub mod language_model;
pub mod scorer;
pub mod tables;
pub mod tokenizer;
pub mod trie;

pub use crate::driver::{CorrectionParams, Spellchecker};
pub use crate::error::{SpellError, SpellResult};
pub use crate::error_model::ErrorModel;
pub use crate::language_model::LanguageModel;
pub use crate::trie::{Candidate, Trie};
