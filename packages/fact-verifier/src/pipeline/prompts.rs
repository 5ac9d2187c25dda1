//! Prompt text for verdict synthesis.

use std::fmt::Write;

use crate::types::EvidenceBundle;

/// Fixed system instruction describing the four-section output contract.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an automated fact-verification assistant. You will be given a structured input that contains:

- A factual claim at the top
- A list of summarized news articles that are relevant to that claim.

You must return:

**Verdict:** True or False
**Collective Summary:** Overall what the sources say
**Reasoning:** 2-4 sentence justification
**Sources Summary:** Bullet list of titles with one-line context

Only use the provided summaries. Be objective. Format your output in Markdown."#;

/// Render the claim and its evidence documents, numbered from 1.
pub fn render_prompt(bundle: &EvidenceBundle) -> String {
    let mut prompt = format!(
        "**Factual Claim:**\n{}\n\n**Relevant Articles:**\n",
        bundle.claim
    );

    for (i, doc) in bundle.documents.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            prompt,
            "\nArticle {}:\n- **Title:** {}\n- **URL:** {}\n- **Snippet:** {}\n- **Summary:** {}\n",
            i + 1,
            doc.title,
            doc.url,
            doc.snippet,
            doc.summary
        );
    }

    prompt
}
