//! Reduction of raw tagged record text into structured facts.

pub mod fact;
pub mod tokenizer;

pub use fact::{Fact, FactTree};
pub use tokenizer::{Line, pointer_xref, tokenize_line};
