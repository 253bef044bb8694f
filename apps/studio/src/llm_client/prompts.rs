// Shared prompt fragments used by every augmenter call.
// Call-specific templates live in generation/prompts.rs.

/// System prompt for all resume-writing calls: plain prose, no scaffolding.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a professional resume writer. \
    Respond with the requested resume text only. \
    Do NOT repeat the instructions. \
    Do NOT use markdown, headings, or quotation marks. \
    Do NOT include explanations or apologies.";

/// Instruction appended to prompts that reference user-provided facts.
pub const GROUNDING_INSTRUCTION: &str = "\
    Use only the details given above. Do not invent employers, dates, degrees, or numbers.";
