//! Layout classification: one slide type per outline slide.

use crate::content::SlideType;
use crate::error::ValidationError;
use crate::llm::GenerationRequest;
use crate::outline::Outline;
use crate::repair::parse_json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Slide type assigned to each outline slide, in outline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureAssignment {
    pub slides: Vec<SlideType>,
}

impl StructureAssignment {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SlideType> {
        self.slides.get(index).copied()
    }

    pub fn tags(&self) -> Vec<u8> {
        self.slides.iter().map(|t| t.tag()).collect()
    }
}

/// What the model answers with before tags are checked.
/// Response schema of the classifier.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StructureSchema {
    /// Slide type for every slide, in order. One of 1, 2, 4, 5, 6, 7, 8, 9
    pub slides: Vec<i64>,
}

/// What the model answers with before tags are coerced and checked.
#[derive(Debug, Deserialize)]
struct RawStructure {
    slides: Vec<Value>,
}

const SYSTEM_PROMPT: &str = r#"You're a professional presentation designer with years of experience in designing clear and engaging presentations.

# Slide Types
{slide_types}

# Steps
1. Analyze provided Number of slides, Presentation title, Slides content and Slide types.
2. Select appropriate slide type for each slide.
3. Provide output in json format as per given schema.

# Notes
- Slide type should be selected based on provided content for slide and notes.
- Feel free to select slide type with images and icons.
- Introduction and Conclusion should have type **1**.
- Don't fall into patterns like always using type 2 and after type 1.
- Each presentation should have its own unique flow and rhythm.
- Do not select type **3** for any slide.
- Do not select type **5** or **9** if outline does not have table or graph-worthy data.

**Go through notes and steps and make sure they are all followed. Rule breaks are strictly not allowed.**"#;

/// Bullet list of the selectable layouts, shared by the structure and
/// content prompts.
pub fn slide_type_list() -> String {
    SlideType::SELECTABLE
        .iter()
        .map(|t| format!("- **{}**: {}", t.tag(), t.layout()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_request(outline: &Outline) -> GenerationRequest {
    let system = SYSTEM_PROMPT.replace("{slide_types}", &slide_type_list());
    let user = format!("Number of slides: {}\n\n{}", outline.slides.len(), outline);
    GenerationRequest::for_schema::<StructureSchema>(system, user)
}

/// Parse and check a classifier response for an outline of `n_slides`.
pub fn validate(raw: &str, n_slides: usize) -> Result<StructureAssignment, ValidationError> {
    let raw: RawStructure = parse_json(raw)?;

    if raw.slides.len() != n_slides {
        return Err(ValidationError::SlideCount {
            expected: n_slides,
            actual: raw.slides.len(),
        });
    }

    let slides = raw
        .slides
        .iter()
        .enumerate()
        .map(|(index, tag)| check_tag(index, coerce_tag(index, tag)?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StructureAssignment { slides })
}

/// Accept integer tags, also when the model quotes them.
pub fn coerce_tag(index: usize, value: &Value) -> Result<i64, ValidationError> {
    let tag = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    tag.ok_or_else(|| {
        ValidationError::Malformed(format!("slide {index}: type must be an integer, got {value}"))
    })
}

/// Map a raw tag to a selectable slide type.
pub fn check_tag(index: usize, tag: i64) -> Result<SlideType, ValidationError> {
    let slide_type =
        SlideType::try_from(tag).map_err(|_| ValidationError::UnknownType { index, tag })?;
    if slide_type.is_reserved() {
        return Err(ValidationError::ReservedType { index });
    }
    Ok(slide_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlineSlide;

    #[test]
    fn accepts_total_domain_valid_assignment() {
        let assignment = validate(r#"{"slides": [1, 2, 6, 7, 1]}"#, 5).unwrap();
        assert_eq!(assignment.tags(), vec![1, 2, 6, 7, 1]);
        assert_eq!(assignment.get(3), Some(SlideType::Type7));
    }

    #[test]
    fn rejects_reserved_type() {
        let err = validate(r#"{"slides": [1, 2, 3, 7, 1]}"#, 5).unwrap_err();
        assert_eq!(err, ValidationError::ReservedType { index: 2 });
        assert!(err.to_string().contains("type 3 is not permitted"));
    }

    #[test]
    fn accepts_quoted_tags() {
        let assignment = validate(r#"{"slides": ["1", "2", " 6 ", 7, "1"]}"#, 5).unwrap();
        assert_eq!(assignment.tags(), vec![1, 2, 6, 7, 1]);

        assert_eq!(
            validate(r#"{"slides": ["1", "3"]}"#, 2),
            Err(ValidationError::ReservedType { index: 1 })
        );
    }

    #[test]
    fn rejects_partial_assignment() {
        assert_eq!(
            validate(r#"{"slides": [1, 2, 6]}"#, 5),
            Err(ValidationError::SlideCount {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_tags_outside_domain() {
        assert_eq!(
            validate(r#"{"slides": [1, 12]}"#, 2),
            Err(ValidationError::UnknownType { index: 1, tag: 12 })
        );
        assert!(matches!(
            validate(r#"{"slides": [1, "two"]}"#, 2),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn assignment_serializes_as_integer_tags() {
        let assignment = validate(r#"{"slides": [1, 9]}"#, 2).unwrap();
        assert_eq!(
            serde_json::to_string(&assignment).unwrap(),
            r#"{"slides":[1,9]}"#
        );
    }

    #[test]
    fn request_lists_layouts_and_outline() {
        let outline = Outline {
            title: "Moon".to_string(),
            notes: None,
            slides: vec![OutlineSlide {
                title: "Landing".to_string(),
                body: "Apollo 11".to_string(),
            }],
        };

        let request = build_request(&outline);
        assert!(request.user.starts_with("Number of slides: 1"));
        assert!(request.user.contains("Title: Landing"));
        assert!(request.system.contains("- **9**: contains title, list of items and a graph."));
        assert!(!request.system.contains("- **3**:"));
    }
}
