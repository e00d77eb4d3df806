// ABOUTME: Text splitting heuristics for the carousel-slides application
// ABOUTME: Turns free text into heading, subheading and body for a slide

use serde::{Deserialize, Serialize};

/// Heading used when a prompt is too short to carry its own
pub const PROMPT_HEADING: &str = "Create Carousel";

const FALLBACK_HEADING: &str = "Your Compelling Headline";
const FALLBACK_SUBHEADING: &str = "Engaging subheading that captures attention";
const FALLBACK_BODY: &str = "Your detailed content goes here with valuable insights and information.";

const OUTLINE_HEADING: &str = "Your Carousel";
const OUTLINE_SUBHEADING: &str = "A comprehensive guide";

/// The three text fields of a slide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitText {
    pub heading: String,
    pub subheading: String,
    pub content: String,
}

impl SplitText {
    pub fn new(
        heading: impl Into<String>,
        subheading: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            heading: heading.into(),
            subheading: subheading.into(),
            content: content.into(),
        }
    }
}

/// Split a prompt by word counts.
///
/// The heading takes the first 5 to 8 words, the subheading the next 8 to 15
/// and the content whatever is left. Prompts of three words or fewer become
/// the subheading under a fixed heading.
pub fn split_prompt(raw: &str) -> SplitText {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SplitText::new(PROMPT_HEADING, "", "");
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() <= 3 {
        return SplitText::new(PROMPT_HEADING, trimmed, "");
    }

    let heading_end = 8.min(5.max(words.len())).min(words.len());
    let remaining = words.len() - heading_end;
    let subheading_end = (heading_end + 15.min(8.max(remaining))).min(words.len());

    SplitText::new(
        words[..heading_end].join(" "),
        words[heading_end..subheading_end].join(" "),
        words[subheading_end..].join(" "),
    )
}

fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn looks_like_heading(line: &str) -> bool {
    line.chars().count() < 100
        && (line.contains(':')
            || line.starts_with(|c: char| c.is_ascii_uppercase())
            || line.contains('*')
            || line.split(' ').count() <= 8)
}

/// Restructure pasted content using line and sentence shapes.
///
/// The body is the input with the heading and subheading removed by plain
/// substring replacement, so text repeated elsewhere may be cut from the
/// wrong place.
pub fn restructure(raw: &str) -> SplitText {
    let sentences = sentences(raw);
    let lines = non_blank_lines(raw);

    let heading_line = lines.iter().copied().find(|line| looks_like_heading(line));

    let heading = match heading_line {
        Some(line) => line.replace(['*', ':'], "").trim().to_string(),
        None => sentences
            .first()
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    };

    let subheading = lines
        .iter()
        .find(|line| Some(**line) != heading_line)
        .map(|line| line.trim().to_string())
        .or_else(|| sentences.get(1).map(|s| s.trim().to_string()))
        .unwrap_or_default();

    let mut body = raw.to_string();
    for used in [&heading, &subheading] {
        if !used.is_empty() {
            body = body.replacen(used.as_str(), "", 1);
        }
    }
    let body = body.trim();

    SplitText::new(
        non_empty_or(heading, FALLBACK_HEADING),
        non_empty_or(subheading, FALLBACK_SUBHEADING),
        non_empty_or(body.to_string(), FALLBACK_BODY),
    )
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Break a longer text into a title slide followed by one slide per point
pub fn outline(raw: &str) -> Vec<SplitText> {
    let lines: Vec<&str> = raw
        .split(['\n', '.', '!', '?'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let heading = lines.first().copied().unwrap_or(OUTLINE_HEADING);
    let subheading = lines.get(1).copied().unwrap_or(OUTLINE_SUBHEADING);

    let mut slides = vec![SplitText::new(heading, subheading, "")];

    // Very short fragments are dropped
    let points = lines.iter().skip(2).filter(|l| l.chars().count() > 10);
    for (idx, line) in points.enumerate() {
        let mut subtitle: String = line.chars().take(50).collect();
        if line.chars().count() > 50 {
            subtitle.push_str("...");
        }
        slides.push(SplitText::new(format!("Point {}", idx + 1), subtitle, *line));
    }

    slides
}
