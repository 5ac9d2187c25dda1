//! Lenient scanner for bold-header sections in synthesizer output.
//!
//! A header is `**Name:**` (or `**Name**:`). A section's value runs from the
//! end of its first header to the next header that begins a line, or to the
//! end of the text. Bold text inside a line is not a boundary.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ParsedVerdict, Verdict, VerdictText};

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"\*\*([^*\n]+?)(?::\*\*|\*\*:)").unwrap();
}

pub const VERDICT: &str = "Verdict";
pub const COLLECTIVE_SUMMARY: &str = "Collective Summary";
pub const REASONING: &str = "Reasoning";
pub const SOURCES_SUMMARY: &str = "Sources Summary";

/// True when only whitespace precedes `pos` on its line.
fn starts_line(text: &str, pos: usize) -> bool {
    let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    text[line_start..pos].trim().is_empty()
}

/// Trimmed text of the named section, or `None` when the header is absent.
pub fn extract_section(header: &str, text: &str) -> Option<String> {
    let found = HEADER.captures_iter(text).find(|cap| {
        cap.get(1)
            .map(|name| name.as_str().trim().eq_ignore_ascii_case(header))
            .unwrap_or(false)
    })?;
    let start = found.get(0)?.end();

    let end = HEADER
        .find_iter(&text[start..])
        .map(|m| start + m.start())
        .find(|&pos| starts_line(text, pos))
        .unwrap_or(text.len());

    Some(text[start..end].trim().to_string())
}

/// Bullet entries of the named section; empty when the header is absent.
pub fn extract_bullets(header: &str, text: &str) -> Vec<String> {
    let Some(section) = extract_section(header, text) else {
        return Vec::new();
    };

    section
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let rest = line.strip_prefix('*').or_else(|| line.strip_prefix('-'))?;
            if rest.starts_with(char::is_whitespace) {
                Some(rest.trim().to_string())
            } else {
                None
            }
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Scan raw synthesizer output into structured fields. Never fails.
pub fn parse_verdict(output: &VerdictText) -> ParsedVerdict {
    let text = output.raw_text.as_str();
    ParsedVerdict {
        claim: output.claim.clone(),
        verdict: extract_section(VERDICT, text).as_deref().and_then(Verdict::parse),
        collective_summary: extract_section(COLLECTIVE_SUMMARY, text),
        reasoning: extract_section(REASONING, text),
        sources_summary: extract_bullets(SOURCES_SUMMARY, text),
    }
}
