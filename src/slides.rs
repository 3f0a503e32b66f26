//! Slide content generation: the whole deck in one structured request.

use crate::content::{GraphSpec, SlideModel, SlideType};
use crate::error::ValidationError;
use crate::llm::GenerationRequest;
use crate::llm_content::{self, LlmPresentation, LlmSlideContent, RENDER_MAX_CHARS};
use crate::outline::OutlineSlide;
use crate::repair::parse_json;
use crate::structure::{check_tag, coerce_tag, slide_type_list, StructureAssignment};
use serde::Deserialize;
use serde_json::Value;

const SYSTEM_PROMPT: &str = r#"You're a professional presenter with years of experience in creating clear and engaging presentations.

Create a presentation using the provided title, slide titles and body following specified steps and guidelines.

Analyze all inputs, to construct each slide with appropriate content and format.

# Slide Types
{slide_types}

# Body Constraints Per Type
{type_notes}

# Steps
1. Analyze provided presentation title, slide titles and body.
2. Select slide type for each slide, unless a type is already given for it.
3. Output should be in json format as per given schema.
4. **Adherence to schema should be beyond all the rules mentioned in notes.**

# Notes
- Generate output in the language of the provided slides.
- Freely select type with images and icons.
- Introduction and Conclusion should have *Type 1* if graph is not assigned.
- Try to select **different types for every slides**.
- Don't select Type **3** for any slide.
- Do not include same graph twice in presentation without any changes to the other.
- Every series in a graph should have data in same unit. Example: all series should be in percentage or all series should be in number of items.
- Type **9** and **5** should be only picked if graph is available.
- **Strictly keep the text under given limit.**
- For slide content follow these rules:
    - Highlighting in markdown format should be used to emphasize numbers and data.
    - Adhere to length constraints in **body** and **description**. Focus on direct communication within character constraints than lengthy explanation.
    - **body** and **description** in slides should never exceed character limits of {render_max} characters.
    - Specify **don't include text in image** in image prompt.
    - All the numbers should be bolded with **bold** tag in body or description of slide.
    - Image prompt should clearly define how image should look like.
    - Image prompt should not ask to generate **numbers, graphs, dashboard and report**.
    - Examples of image prompts:
        - a travel agent presenting a detailed itinerary with photos of destinations, showcasing specific experiences, highlighting travel highlights
        - a person smiling while traveling, with a beautiful background scenery, such as mountains, beach, or city, golden hour lighting
    - Descriptions should be clear and to the point.
    - Descriptions should not use words like "This slide", "This presentation".
    - If **body** contains items, *choose number of items randomly between mentioned constraints.*
    - **Icon queries** must be a generic **single word noun**.
    - Provide 3 icon queries for each icon where,
        - First one should be specific like "Led bulb".
        - Second one should be more generic than first like "bulb".
        - Third one should be simplest like "light".
- A graph is a JSON object with "name", "type" (bar, line or pie), "unit" and "data" holding "categories" and "series" of {"name", "data"}.

**Follow all the length constraints provided in the schema and notes.**
**Go through notes and steps and make sure they are all followed. Rule breaks are strictly not allowed.**"#;

fn type_notes() -> String {
    SlideType::SELECTABLE
        .iter()
        .map(|t| format!("## Type {}\n{}", t.tag(), llm_content::notes(*t).trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the deck request. With a `structure`, each slide is pinned to its
/// assigned type.
pub fn build_request(
    title: &str,
    notes: &[String],
    slides: &[OutlineSlide],
    structure: Option<&StructureAssignment>,
) -> GenerationRequest {
    let system = SYSTEM_PROMPT
        .replace("{slide_types}", &slide_type_list())
        .replace("{type_notes}", &type_notes())
        .replace("{render_max}", &RENDER_MAX_CHARS.to_string());

    let mut user = format!("# Presentation Title: {title}\n\n");
    for (i, slide) in slides.iter().enumerate() {
        user.push_str(&format!("## Slide {}:\n", i + 1));
        user.push_str(&format!("  - Title: {}\n", slide.title));
        if let Some(slide_type) = structure.and_then(|s| s.get(i)) {
            user.push_str(&format!("  - Type: {slide_type}\n"));
        }
        user.push_str(&format!("  - Body: {}\n\n", slide.body));
    }

    if !notes.is_empty() {
        user.push_str("# Notes:\n");
        for note in notes {
            user.push_str(&format!("  - {note}\n"));
        }
    }

    GenerationRequest::for_schema::<LlmPresentation>(system, user)
}

#[derive(Deserialize)]
struct RawDeck {
    slides: Vec<RawSlide>,
}

#[derive(Deserialize)]
struct RawSlide {
    #[serde(rename = "type")]
    slide_type: Value,
    content: Value,
}

/// Parse and check a deck response, then convert it to strict slides.
pub fn validate(
    raw: &str,
    n_slides: usize,
    structure: Option<&StructureAssignment>,
) -> Result<Vec<SlideModel>, ValidationError> {
    let deck: RawDeck = parse_json(raw)?;

    if deck.slides.len() != n_slides {
        return Err(ValidationError::SlideCount {
            expected: n_slides,
            actual: deck.slides.len(),
        });
    }

    let mut accepted: Vec<LlmSlideContent> = Vec::with_capacity(deck.slides.len());
    for (index, slide) in deck.slides.into_iter().enumerate() {
        let slide_type = check_tag(index, coerce_tag(index, &slide.slide_type)?)?;

        if let Some(expected) = structure.and_then(|s| s.get(index)) {
            if expected != slide_type {
                return Err(ValidationError::AssignmentMismatch {
                    index,
                    expected: expected.tag(),
                    actual: slide_type.tag(),
                });
            }
        }

        if !slide_type.has_graph() && slide.content.get("graph").is_some_and(|g| !g.is_null()) {
            return Err(ValidationError::UnexpectedGraph {
                index,
                tag: slide_type.tag(),
            });
        }

        let content = LlmSlideContent::from_value(slide_type, slide.content).map_err(|e| {
            ValidationError::ContentMismatch {
                index,
                tag: slide_type.tag(),
                reason: e.to_string(),
            }
        })?;
        content.validate(index)?;
        accepted.push(content);
    }

    check_unique_graphs(accepted.iter().map(LlmSlideContent::graph))?;

    Ok(accepted
        .iter()
        .map(|content| SlideModel::new(content.to_content()))
        .collect())
}

/// No two graphs in one deck may be structurally identical.
pub fn check_unique_graphs<'a>(
    graphs: impl Iterator<Item = Option<&'a GraphSpec>>,
) -> Result<(), ValidationError> {
    let mut seen: Vec<(usize, &GraphSpec)> = Vec::new();
    for (index, graph) in graphs.enumerate() {
        let Some(graph) = graph else { continue };
        if let Some((first, _)) = seen.iter().find(|(_, other)| *other == graph) {
            return Err(ValidationError::DuplicateGraph {
                first: *first,
                second: index,
            });
        }
        seen.push((index, graph));
    }
    Ok(())
}
