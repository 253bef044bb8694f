// Resume content synthesis engine.
// Template path is pure and deterministic; the ai path goes through the augmenter,
// which only ever talks to the model via llm_client::TextGenerator.

pub mod assembler;
pub mod augmenter;
pub mod classifier;
pub mod formatters;
pub mod prompts;
pub mod template;
pub mod validation;
