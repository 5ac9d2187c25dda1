//! HTML-to-text conversion and extractive summarization.
//!
//! Summaries are built from the page's own sentences: each sentence is scored
//! by the frequency of its content words across the page plus its overlap
//! with the title, and the best few are returned in document order.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref BODY: Selector = Selector::parse("body").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}']+").unwrap();
}

/// Elements whose text never reaches a summary.
const BOILERPLATE: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "nav", "header", "footer", "aside", "form",
];

/// Elements that break a line when text is flattened.
const BLOCKS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table",
    "section", "article", "main", "blockquote", "pre",
];

/// Paragraph text shorter than this falls back to whole-body text.
const MIN_PARAGRAPH_TEXT: usize = 200;

/// Sentences with fewer words are navigation debris, not prose.
const MIN_SENTENCE_WORDS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "it's", "more", "most", "no",
    "not", "of", "on", "one", "or", "our", "out", "said", "she", "so", "some", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "was", "we",
    "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

/// Plain text and title pulled out of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub title: Option<String>,
    pub text: String,
}

/// Convert HTML to readable text, preferring `<p>` content.
///
/// Entities are decoded by the parser, so the text is what a reader sees.
pub fn html_to_text(html: &str) -> PageText {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| collapse(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let paragraph_text = document
        .select(&PARAGRAPH)
        .filter(|p| !inside_boilerplate(*p))
        .map(|p| {
            let mut raw = String::new();
            flatten(p, &mut raw);
            collapse(&raw)
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let text = if paragraph_text.chars().count() >= MIN_PARAGRAPH_TEXT {
        paragraph_text
    } else {
        let root = document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element());
        let mut raw = String::new();
        flatten(root, &mut raw);
        raw.lines()
            .map(collapse)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    };

    PageText { title, text }
}

fn inside_boilerplate(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| BOILERPLATE.contains(&el.name()))
    })
}

/// Append the visible text under `element`, one line per block element.
fn flatten(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if BOILERPLATE.contains(&name) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCKS.contains(&name);
                if block {
                    out.push('\n');
                }
                flatten(child_ref, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn collapse(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Split text into sentences at `.`, `!` or `?` followed by whitespace, and at newlines.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let boundary = match c {
            '\n' => Some(idx),
            '.' | '!' | '?' => match chars.peek() {
                Some((_, next)) if next.is_whitespace() => Some(idx + c.len_utf8()),
                None => Some(idx + c.len_utf8()),
                _ => None,
            },
            _ => None,
        };

        if let Some(end) = boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn content_words(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Pick the `max_sentences` highest-scoring sentences, newline-joined in document order.
pub fn summarize(title: Option<&str>, text: &str, max_sentences: usize) -> String {
    let sentences: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= MIN_SENTENCE_WORDS)
        .collect();
    if sentences.is_empty() || max_sentences == 0 {
        return String::new();
    }

    let mut frequency: HashMap<String, usize> = HashMap::new();
    for sentence in &sentences {
        for word in content_words(sentence) {
            *frequency.entry(word).or_insert(0) += 1;
        }
    }
    let peak = frequency.values().copied().max().unwrap_or(1) as f64;

    let title_words: HashSet<String> = title.map(content_words).unwrap_or_default().into_iter().collect();

    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let words = content_words(sentence);
            if words.is_empty() {
                return (idx, 0.0);
            }
            let keyword: f64 = words
                .iter()
                .map(|w| frequency.get(w).copied().unwrap_or(0) as f64 / peak)
                .sum::<f64>()
                / words.len() as f64;
            let title_overlap = if title_words.is_empty() {
                0.0
            } else {
                words.iter().filter(|w| title_words.contains(*w)).count() as f64
                    / title_words.len() as f64
            };
            (idx, keyword + title_overlap)
        })
        .collect();

    // Stable sort keeps earlier sentences ahead on ties
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut chosen: Vec<usize> = scored.into_iter().take(max_sentences).map(|(idx, _)| idx).collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|idx| sentences[idx])
        .collect::<Vec<_>>()
        .join("\n")
}
