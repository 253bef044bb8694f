// All prompt templates for the Generative Augmenter.
// Placeholders are `{name}` and are filled by `fill_template` before sending.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Professional summary. Replace: {education}, {skills}, {experience}, {grounding_instruction}
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a professional resume summary (2-3 sentences) for someone with:
- Education: {education}
- Skills: {skills}
- Experience: {experience}

The summary should highlight their strengths and career goals.
{grounding_instruction}";

/// Responsibilities for one job. Replace: {job_title}, {skills}
pub const RESPONSIBILITIES_PROMPT_TEMPLATE: &str = "Create 4 professional resume bullet points for a {job_title} position using these skills: {skills}

Each bullet point should describe an achievement or responsibility. Be specific and use action verbs.";

/// Rewrite of one short bullet. Replace: {bullet}, {skills}
pub const ENHANCE_BULLET_PROMPT_TEMPLATE: &str = "Rewrite this resume bullet point to be more specific and impactful, using an action verb. Keep it to one sentence.
Skills: {skills}
Bullet: {bullet}";

/// Complementary skills. Replace: {skills}
pub const EXPAND_SKILLS_PROMPT_TEMPLATE: &str = "List 3 additional professional skills that complement these skills, separated by commas: {skills}";

/// Coursework for an education entry. Replace: {education}, {grounding_instruction}
pub const COURSEWORK_PROMPT_TEMPLATE: &str = "List relevant university coursework for this education, as one comma-separated line: {education}
{grounding_instruction}";

/// Fallback skills excerpt when the user listed none.
pub const DEFAULT_SKILLS_EXCERPT: &str = "various professional skills";
/// Fallback skills phrase for the summary prompt.
pub const DEFAULT_SUMMARY_SKILLS: &str = "various skills";

/// Fills `{name}` placeholders in one left-to-right pass. Inserted values are never
/// rescanned, so user text containing `{skills}` stays literal. Unknown names are kept.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let slot = after.find('}').and_then(|end| {
            let name = &after[..end];
            slots
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match slot {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
