//! Presentation outline: the first generation step.

use crate::error::ValidationError;
use crate::llm::GenerationRequest;
use crate::repair::parse_json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest and largest deck the outline step accepts.
pub const MIN_SLIDES: usize = 5;
pub const MAX_SLIDES: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutlineSlide {
    /// Title of the slide in about 3 to 5 words
    pub title: String,
    /// Content of the slide in markdown format
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Outline {
    /// Title of the presentation in about 3 to 8 words
    pub title: String,
    /// Notes for the presentation
    pub notes: Option<Vec<String>>,
    /// List of slides
    pub slides: Vec<OutlineSlide>,
}

impl Outline {
    pub fn notes(&self) -> &[String] {
        self.notes.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Presentation Title: {}", self.title)?;
        for (i, slide) in self.slides.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "## Slide {}:", i + 1)?;
            writeln!(f, "  - Title: {}", slide.title)?;
            writeln!(f, "  - Body: {}", slide.body)?;
        }
        if !self.notes().is_empty() {
            writeln!(f)?;
            writeln!(f, "# Notes:")?;
            for note in self.notes() {
                writeln!(f, "  - {note}")?;
            }
        }
        Ok(())
    }
}

/// Caller input of the outline step.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineInput<'a> {
    pub prompt: Option<&'a str>,
    pub n_slides: usize,
    pub language: &'a str,
    pub summary: Option<&'a str>,
}

const SYSTEM_PROMPT: &str = r#"Create a presentation based on the provided prompt, number of slides, output language, and additional informational details.
Format the output in the specified JSON schema with structured markdown content.

# Steps

1. Identify key points from the provided prompt, including the topic, number of slides, output language, and additional content directions.
2. Create a concise and descriptive title reflecting the main topic, adhering to the specified language.
3. Generate a clear title for each slide.
4. Develop comprehensive content using markdown structure:
    * Use bullet points (- or *) for lists.
    * Use **bold** for emphasis, *italic* for secondary emphasis, and `code` for technical terms.
5. Provide styling and formatting information for the presentation as notes.

# Notes
- There must be exact number of slides as specified.
- Content must be generated for every slide.
- Images or Icons information provided in **Input** must be included in the **notes**.
- Notes should clearly define if it is for specific slide or for the presentation.
- Slide **body** should not contain slide **title**.
- Slide **title** should not contain "Slide 1", "Slide 2", etc.
- Slide **title** should not be in markdown format."#;

pub fn build_request(input: &OutlineInput<'_>) -> GenerationRequest {
    let user = format!(
        "**Input:**\n- Prompt: {}\n- Output Language: {}\n- Number of Slides: {}\n- Additional Information: {}",
        input.prompt.unwrap_or("None"),
        input.language,
        input.n_slides,
        input.summary.unwrap_or("None"),
    );
    GenerationRequest::for_schema::<Outline>(SYSTEM_PROMPT, user)
}

/// Parse and check an outline response against the requested slide count.
pub fn validate(raw: &str, n_slides: usize) -> Result<Outline, ValidationError> {
    let outline: Outline = parse_json(raw)?;

    if outline.title.trim().is_empty() {
        return Err(ValidationError::EmptyField("presentation title"));
    }
    if outline.slides.len() != n_slides {
        return Err(ValidationError::SlideCount {
            expected: n_slides,
            actual: outline.slides.len(),
        });
    }

    for (index, slide) in outline.slides.iter().enumerate() {
        let title = slide.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle { index });
        }
        if has_ordinal_marker(title) {
            return Err(ValidationError::OrdinalInTitle {
                index,
                title: title.to_string(),
            });
        }
        if contains_phrase(&slide.body, title) {
            return Err(ValidationError::TitleInBody {
                index,
                title: title.to_string(),
            });
        }
    }

    Ok(outline)
}

/// Whether `title` contains a "Slide 3" style marker.
fn has_ordinal_marker(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.match_indices("slide").any(|(start, word)| {
        if !starts_word(&lower, start) {
            return false;
        }
        let rest = lower[start + word.len()..]
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | ':' | '-' | '.'));
        rest.starts_with(|c: char| c.is_ascii_digit())
    })
}

/// Case-insensitive match of `phrase` as whole words inside `text`.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let text = text.to_lowercase();
    let phrase = phrase.to_lowercase();
    text.match_indices(&phrase)
        .any(|(start, found)| starts_word(&text, start) && ends_word(&text, start + found.len()))
}

fn starts_word(text: &str, start: usize) -> bool {
    !text[..start].chars().next_back().is_some_and(char::is_alphanumeric)
}

fn ends_word(text: &str, end: usize) -> bool {
    !text[end..].chars().next().is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(titles: &[&str]) -> String {
        let slides: Vec<_> = titles
            .iter()
            .map(|t| json!({"title": t, "body": "- point one\n- **42** things"}))
            .collect();
        json!({"title": "Lunar Exploration", "notes": ["Use a dark theme"], "slides": slides})
            .to_string()
    }

    #[test]
    fn accepts_exact_slide_count() {
        let raw = response(&["Intro", "History", "Missions", "Future", "Wrap Up"]);
        let outline = validate(&raw, 5).unwrap();
        assert_eq!(outline.slides.len(), 5);
        assert_eq!(outline.notes(), ["Use a dark theme".to_string()]);
    }

    #[test]
    fn rejects_wrong_slide_count() {
        let raw = response(&["Intro", "History", "Missions", "Future"]);
        assert_eq!(
            validate(&raw, 5),
            Err(ValidationError::SlideCount {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn rejects_ordinal_markers_in_titles() {
        let raw = response(&["Intro", "Slide 2: History", "Missions", "Future", "Wrap Up"]);
        assert!(matches!(
            validate(&raw, 5),
            Err(ValidationError::OrdinalInTitle { index: 1, .. })
        ));
        assert!(has_ordinal_marker("SLIDE #4"));
        assert!(has_ordinal_marker("Overview - slide 10"));
        assert!(!has_ordinal_marker("Slides that work"));
        assert!(!has_ordinal_marker("Landslide risk"));
        assert!(!has_ordinal_marker("Landslide 2020 Recovery"));

        let raw = response(&["Intro", "Landslide 2020 Recovery", "Missions", "Future", "Wrap Up"]);
        assert!(validate(&raw, 5).is_ok());
    }

    #[test]
    fn rejects_body_repeating_title() {
        let raw = json!({
            "title": "Moon",
            "notes": null,
            "slides": [
                {"title": "Intro", "body": "a"},
                {"title": "History", "body": "# History\n- Apollo"},
                {"title": "Missions", "body": "b"},
                {"title": "Future", "body": "c"},
                {"title": "Wrap Up", "body": "d"}
            ]
        })
        .to_string();

        assert!(matches!(
            validate(&raw, 5),
            Err(ValidationError::TitleInBody { index: 1, .. })
        ));
    }

    #[test]
    fn title_repeat_ignores_case() {
        let raw = json!({
            "title": "Moon",
            "slides": [
                {"title": "Intro", "body": "a"},
                {"title": "History", "body": "# history\n- Apollo"},
                {"title": "Missions", "body": "b"},
                {"title": "Future", "body": "c"},
                {"title": "Wrap Up", "body": "d"}
            ]
        })
        .to_string();

        assert!(matches!(
            validate(&raw, 5),
            Err(ValidationError::TitleInBody { index: 1, .. })
        ));
    }

    #[test]
    fn title_inside_longer_word_is_not_a_repeat() {
        let raw = json!({
            "title": "Budget Review",
            "slides": [
                {"title": "Cost", "body": "- Costs rose **12%** last quarter"},
                {"title": "Risk", "body": "- Risky suppliers"},
                {"title": "Plan", "body": "- Planned cuts"},
                {"title": "Team", "body": "- Teamwork matters"},
                {"title": "Next Steps", "body": "- Review next quarter"}
            ]
        })
        .to_string();

        assert!(validate(&raw, 5).is_ok());
        assert!(contains_phrase("Our next steps:", "Next Steps"));
        assert!(!contains_phrase("Costs rose", "Cost"));
    }

    #[test]
    fn missing_notes_are_allowed() {
        let raw = json!({
            "title": "Moon",
            "slides": [
                {"title": "A", "body": "x"}, {"title": "B", "body": "x"},
                {"title": "C", "body": "x"}, {"title": "D", "body": "x"},
                {"title": "E", "body": "x"}
            ]
        })
        .to_string();

        let outline = validate(&raw, 5).unwrap();
        assert!(outline.notes().is_empty());
    }

    #[test]
    fn request_carries_input() {
        let request = build_request(&OutlineInput {
            prompt: Some("the moon"),
            n_slides: 7,
            language: "French",
            summary: None,
        });
        assert!(request.user.contains("Prompt: the moon"));
        assert!(request.user.contains("Output Language: French"));
        assert!(request.user.contains("Number of Slides: 7"));
        assert!(request.system.contains("exact number of slides"));
        assert!(request.schema["properties"].get("slides").is_some());
    }

    #[test]
    fn display_lists_every_slide() {
        let outline = validate(&response(&["A", "B", "C", "D", "E"]), 5).unwrap();
        let text = outline.to_string();
        assert!(text.starts_with("# Presentation Title: Lunar Exploration"));
        assert!(text.contains("## Slide 5:"));
        assert!(text.contains("# Notes:"));
    }
}
