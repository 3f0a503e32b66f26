//! Generation-facing slide content.
//!
//! Each layout has a loose counterpart of its strict shape: exact counts are
//! relaxed into bounded ranges, and per-item assets (image prompts, icon
//! queries) travel with the item they belong to. Accepted values convert to
//! the strict shapes with [`LlmSlideContent::to_content`], which cannot fail.

use crate::content::{
    GraphSpec, HeadingItem, SlideContent, SlideType, Type1Content, Type2Content, Type3Content,
    Type4Content, Type5Content, Type6Content, Type7Content, Type8Content, Type9Content,
};
use crate::error::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body text bounds for the text-only layouts (1 and 5).
pub const BODY_MIN_CHARS: usize = 150;
pub const BODY_MAX_CHARS: usize = 400;
/// Upper bound asked of the model for slide descriptions (6 and 8).
pub const DESCRIPTION_MAX_CHARS: usize = 400;
/// Hard ceiling the renderer expects for body and description text.
pub const RENDER_MAX_CHARS: usize = 200;
/// Icon query tiers per item: specific, generic, simplest.
pub const ICON_QUERY_TIERS: usize = 3;

const ITEM_NOTES: &str = "
- Each **Heading** must consist of **1 to 3 words**.
- Each item **Description** can be up to 10 words.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmHeadingItem {
    /// List item heading to show in slide body, 1 to 3 words
    pub heading: String,
    /// Description of list item in less than 10 words
    pub description: String,
}

impl LlmHeadingItem {
    pub fn to_content(&self) -> HeadingItem {
        HeadingItem {
            heading: self.heading.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmImageItem {
    /// List item heading to show in slide body, 1 to 3 words
    pub heading: String,
    /// Description of list item in less than 10 words
    pub description: String,
    /// Prompt used to generate image for this item
    pub image_prompt: String,
}

impl LlmImageItem {
    pub fn to_content(&self) -> HeadingItem {
        HeadingItem {
            heading: self.heading.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmIconItem {
    /// List item heading to show in slide body, 1 to 3 words
    pub heading: String,
    /// Description of list item in less than 10 words
    pub description: String,
    /// Icon queries for this item, from most specific to simplest single-word noun
    #[schemars(length(min = 1, max = 3))]
    pub icon_queries: Vec<String>,
}

impl LlmIconItem {
    pub fn to_content(&self) -> HeadingItem {
        HeadingItem {
            heading: self.heading.clone(),
            description: self.description.clone(),
        }
    }

    /// The most specific query; the strict shape carries one per item.
    pub fn primary_icon_query(&self) -> String {
        self.icon_queries.first().cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType1Content {
    /// Title of the slide
    pub title: String,
    /// Slide content summary in less than 40 words
    #[schemars(length(min = 150, max = 400))]
    pub body: String,
    /// Prompt used to generate image for this slide
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType2Content {
    /// Title of the slide
    pub title: String,
    /// List items to show in slide's body
    #[schemars(length(min = 1, max = 4))]
    pub body: Vec<LlmHeadingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType3Content {
    /// Title of the slide
    pub title: String,
    /// List items to show in slide's body
    #[schemars(length(min = 3, max = 3))]
    pub body: Vec<LlmHeadingItem>,
    /// Prompt used to generate image for this slide
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType4Content {
    /// Title of the slide
    pub title: String,
    /// List items to show in slide's body, each with its own image
    #[schemars(length(min = 1, max = 3))]
    pub body: Vec<LlmImageItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType5Content {
    /// Title of the slide
    pub title: String,
    /// Slide content summary in less than 40 words
    #[schemars(length(min = 150, max = 400))]
    pub body: String,
    /// Graph to show in slide: name, type, unit and data series
    pub graph: GraphSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType6Content {
    /// Title of the slide
    pub title: String,
    /// Slide content summary in less than 30 words
    #[schemars(length(min = 1, max = 400))]
    pub description: String,
    /// List items to show in slide's body
    #[schemars(length(min = 1, max = 3))]
    pub body: Vec<LlmHeadingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType7Content {
    /// Title of the slide
    pub title: String,
    /// List items to show in slide's body, each with its own icon
    #[schemars(length(min = 1, max = 4))]
    pub body: Vec<LlmIconItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType8Content {
    /// Title of the slide
    pub title: String,
    /// Slide content summary in less than 40 words
    #[schemars(length(min = 1, max = 400))]
    pub description: String,
    /// List items to show in slide's body, each with its own icon
    #[schemars(length(min = 1, max = 3))]
    pub body: Vec<LlmIconItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmType9Content {
    /// Title of the slide
    pub title: String,
    /// List items to show in slide's body
    #[schemars(length(min = 1, max = 3))]
    pub body: Vec<LlmHeadingItem>,
    /// Graph to show in slide: name, type, unit and data series
    pub graph: GraphSpec,
}

/// Loose content of one slide as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum LlmSlideContent {
    Type1(LlmType1Content),
    Type2(LlmType2Content),
    #[schemars(skip)]
    Type3(LlmType3Content),
    Type4(LlmType4Content),
    Type5(LlmType5Content),
    Type6(LlmType6Content),
    Type7(LlmType7Content),
    Type8(LlmType8Content),
    Type9(LlmType9Content),
}

/// Item-count bounds of a layout's body list, `None` for text bodies.
pub fn item_bounds(slide_type: SlideType) -> Option<(usize, usize)> {
    match slide_type {
        SlideType::Type1 | SlideType::Type5 => None,
        SlideType::Type2 | SlideType::Type7 => Some((1, 4)),
        SlideType::Type3 => Some((3, 3)),
        SlideType::Type4 | SlideType::Type6 | SlideType::Type8 | SlideType::Type9 => Some((1, 3)),
    }
}

/// Authoring notes for a layout, embedded in the content prompt.
pub fn notes(slide_type: SlideType) -> String {
    match item_bounds(slide_type) {
        Some((min, max)) if min == max => {
            format!("- The **Body** should include **{min} HeadingModels**.{ITEM_NOTES}")
        }
        Some((min, max)) => {
            format!("- The **Body** should include **{min} to {max} HeadingModels**.{ITEM_NOTES}")
        }
        None => format!(
            "- The **Body** should be between {BODY_MIN_CHARS} and {BODY_MAX_CHARS} characters."
        ),
    }
}

impl LlmSlideContent {
    /// Parse loose content for a known type. Missing or mistyped fields
    /// (a type 9 slide without `graph`, say) surface here.
    pub fn from_value(
        slide_type: SlideType,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match slide_type {
            SlideType::Type1 => LlmSlideContent::Type1(serde_json::from_value(value)?),
            SlideType::Type2 => LlmSlideContent::Type2(serde_json::from_value(value)?),
            SlideType::Type3 => LlmSlideContent::Type3(serde_json::from_value(value)?),
            SlideType::Type4 => LlmSlideContent::Type4(serde_json::from_value(value)?),
            SlideType::Type5 => LlmSlideContent::Type5(serde_json::from_value(value)?),
            SlideType::Type6 => LlmSlideContent::Type6(serde_json::from_value(value)?),
            SlideType::Type7 => LlmSlideContent::Type7(serde_json::from_value(value)?),
            SlideType::Type8 => LlmSlideContent::Type8(serde_json::from_value(value)?),
            SlideType::Type9 => LlmSlideContent::Type9(serde_json::from_value(value)?),
        })
    }

    pub fn slide_type(&self) -> SlideType {
        match self {
            LlmSlideContent::Type1(_) => SlideType::Type1,
            LlmSlideContent::Type2(_) => SlideType::Type2,
            LlmSlideContent::Type3(_) => SlideType::Type3,
            LlmSlideContent::Type4(_) => SlideType::Type4,
            LlmSlideContent::Type5(_) => SlideType::Type5,
            LlmSlideContent::Type6(_) => SlideType::Type6,
            LlmSlideContent::Type7(_) => SlideType::Type7,
            LlmSlideContent::Type8(_) => SlideType::Type8,
            LlmSlideContent::Type9(_) => SlideType::Type9,
        }
    }

    pub fn graph(&self) -> Option<&GraphSpec> {
        match self {
            LlmSlideContent::Type5(c) => Some(&c.graph),
            LlmSlideContent::Type9(c) => Some(&c.graph),
            _ => None,
        }
    }

    /// Check the loose bounds for the slide at `index`.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        let bounds = item_bounds(self.slide_type());
        match self {
            LlmSlideContent::Type1(c) => {
                check_title(index, &c.title)?;
                check_text(index, "body", &c.body, BODY_MIN_CHARS, BODY_MAX_CHARS)?;
                check_text(index, "image_prompt", &c.image_prompt, 1, usize::MAX)
            }
            LlmSlideContent::Type2(c) => {
                check_title(index, &c.title)?;
                check_items(index, "body", c.body.len(), bounds)
            }
            LlmSlideContent::Type3(c) => {
                check_title(index, &c.title)?;
                check_items(index, "body", c.body.len(), bounds)?;
                check_text(index, "image_prompt", &c.image_prompt, 1, usize::MAX)
            }
            LlmSlideContent::Type4(c) => {
                check_title(index, &c.title)?;
                check_items(index, "body", c.body.len(), bounds)?;
                c.body.iter().try_for_each(|item| {
                    check_text(index, "image_prompt", &item.image_prompt, 1, usize::MAX)
                })
            }
            LlmSlideContent::Type5(c) => {
                check_title(index, &c.title)?;
                check_text(index, "body", &c.body, BODY_MIN_CHARS, BODY_MAX_CHARS)?;
                check_graph(index, &c.graph)
            }
            LlmSlideContent::Type6(c) => {
                check_title(index, &c.title)?;
                check_text(index, "description", &c.description, 1, DESCRIPTION_MAX_CHARS)?;
                check_items(index, "body", c.body.len(), bounds)
            }
            LlmSlideContent::Type7(c) => {
                check_title(index, &c.title)?;
                check_items(index, "body", c.body.len(), bounds)?;
                check_icon_items(index, &c.body)
            }
            LlmSlideContent::Type8(c) => {
                check_title(index, &c.title)?;
                check_text(index, "description", &c.description, 1, DESCRIPTION_MAX_CHARS)?;
                check_items(index, "body", c.body.len(), bounds)?;
                check_icon_items(index, &c.body)
            }
            LlmSlideContent::Type9(c) => {
                check_title(index, &c.title)?;
                check_items(index, "body", c.body.len(), bounds)?;
                check_graph(index, &c.graph)
            }
        }
    }

    /// Convert to the strict rendering shape.
    pub fn to_content(&self) -> SlideContent {
        match self {
            LlmSlideContent::Type1(c) => SlideContent::Type1(Type1Content {
                title: c.title.clone(),
                body: c.body.clone(),
                image_prompts: vec![c.image_prompt.clone()],
            }),
            LlmSlideContent::Type2(c) => SlideContent::Type2(Type2Content {
                title: c.title.clone(),
                body: c.body.iter().map(LlmHeadingItem::to_content).collect(),
            }),
            LlmSlideContent::Type3(c) => SlideContent::Type3(Type3Content {
                title: c.title.clone(),
                body: c.body.iter().map(LlmHeadingItem::to_content).collect(),
                image_prompts: vec![c.image_prompt.clone()],
            }),
            LlmSlideContent::Type4(c) => SlideContent::Type4(Type4Content {
                title: c.title.clone(),
                body: c.body.iter().map(LlmImageItem::to_content).collect(),
                image_prompts: c.body.iter().map(|item| item.image_prompt.clone()).collect(),
            }),
            LlmSlideContent::Type5(c) => SlideContent::Type5(Type5Content {
                title: c.title.clone(),
                body: c.body.clone(),
                graph: c.graph.clone(),
            }),
            LlmSlideContent::Type6(c) => SlideContent::Type6(Type6Content {
                title: c.title.clone(),
                description: c.description.clone(),
                body: c.body.iter().map(LlmHeadingItem::to_content).collect(),
            }),
            LlmSlideContent::Type7(c) => SlideContent::Type7(Type7Content {
                title: c.title.clone(),
                body: c.body.iter().map(LlmIconItem::to_content).collect(),
                icon_queries: c.body.iter().map(LlmIconItem::primary_icon_query).collect(),
            }),
            LlmSlideContent::Type8(c) => SlideContent::Type8(Type8Content {
                title: c.title.clone(),
                description: c.description.clone(),
                body: c.body.iter().map(LlmIconItem::to_content).collect(),
                icon_queries: c.body.iter().map(LlmIconItem::primary_icon_query).collect(),
            }),
            LlmSlideContent::Type9(c) => SlideContent::Type9(Type9Content {
                title: c.title.clone(),
                body: c.body.iter().map(LlmHeadingItem::to_content).collect(),
                graph: c.graph.clone(),
            }),
        }
    }
}

/// One slide of the model's response, used for the request schema.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LlmSlideModel {
    /// Slide type, one of 1, 2, 4, 5, 6, 7, 8, 9
    #[serde(rename = "type")]
    pub slide_type: u8,
    pub content: LlmSlideContent,
}

/// The full response schema of the slide content step.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LlmPresentation {
    pub slides: Vec<LlmSlideModel>,
}

fn check_title(index: usize, title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle { index });
    }
    Ok(())
}

fn check_text(
    index: usize,
    field: &'static str,
    text: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = text.trim().chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::TextLength {
            index,
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

fn check_items(
    index: usize,
    field: &'static str,
    actual: usize,
    bounds: Option<(usize, usize)>,
) -> Result<(), ValidationError> {
    match bounds {
        Some((min, max)) if actual < min || actual > max => Err(ValidationError::ItemCount {
            index,
            field,
            min,
            max,
            actual,
        }),
        _ => Ok(()),
    }
}

fn check_icon_items(index: usize, items: &[LlmIconItem]) -> Result<(), ValidationError> {
    for item in items {
        check_items(
            index,
            "icon_queries",
            item.icon_queries.len(),
            Some((1, ICON_QUERY_TIERS)),
        )?;
        check_text(index, "icon_queries", &item.primary_icon_query(), 1, usize::MAX)?;
    }
    Ok(())
}

fn check_graph(index: usize, graph: &GraphSpec) -> Result<(), ValidationError> {
    if !graph.is_object() {
        return Err(ValidationError::InvalidGraph { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_text() -> String {
        "Solar capacity grew **40%** last year. ".repeat(5)
    }

    fn item(heading: &str) -> LlmHeadingItem {
        LlmHeadingItem {
            heading: heading.to_string(),
            description: "Short supporting detail".to_string(),
        }
    }

    fn icon_item(heading: &str, queries: &[&str]) -> LlmIconItem {
        LlmIconItem {
            heading: heading.to_string(),
            description: "Short supporting detail".to_string(),
            icon_queries: queries.iter().map(|q| q.to_string()).collect(),
        }
    }

    #[test]
    fn type1_converts_image_prompt_into_list() {
        let loose = LlmSlideContent::Type1(LlmType1Content {
            title: "Introduction".to_string(),
            body: body_text(),
            image_prompt: "solar panels at sunrise, no text".to_string(),
        });
        loose.validate(0).unwrap();

        match loose.to_content() {
            SlideContent::Type1(strict) => {
                assert_eq!(strict.title, "Introduction");
                assert_eq!(strict.image_prompts, vec!["solar panels at sunrise, no text"]);
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn type1_body_outside_bounds_is_rejected() {
        let loose = LlmSlideContent::Type1(LlmType1Content {
            title: "Introduction".to_string(),
            body: "Too short".to_string(),
            image_prompt: "a field".to_string(),
        });

        let err = loose.validate(2).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TextLength { index: 2, field: "body", actual: 9, .. }
        ));
    }

    #[test]
    fn type4_collects_one_image_prompt_per_item() {
        let loose = LlmSlideContent::Type4(LlmType4Content {
            title: "Sites".to_string(),
            body: vec![
                LlmImageItem {
                    heading: "North".to_string(),
                    description: "Wind farm".to_string(),
                    image_prompt: "wind turbines on a hill".to_string(),
                },
                LlmImageItem {
                    heading: "South".to_string(),
                    description: "Solar park".to_string(),
                    image_prompt: "solar park in desert".to_string(),
                },
            ],
        });
        loose.validate(0).unwrap();

        match loose.to_content() {
            SlideContent::Type4(strict) => {
                assert_eq!(strict.body.len(), 2);
                assert_eq!(strict.image_prompts.len(), 2);
                assert_eq!(strict.image_prompts[1], "solar park in desert");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn icon_layouts_keep_most_specific_query() {
        let loose = LlmSlideContent::Type8(LlmType8Content {
            title: "Efficiency".to_string(),
            description: "Three quick wins for lower bills".to_string(),
            body: vec![icon_item("Lighting", &["led bulb", "bulb", "light"])],
        });
        loose.validate(0).unwrap();

        match loose.to_content() {
            SlideContent::Type8(strict) => {
                assert_eq!(strict.description, "Three quick wins for lower bills");
                assert_eq!(strict.icon_queries, vec!["led bulb"]);
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn icon_item_without_queries_is_rejected() {
        let loose = LlmSlideContent::Type7(LlmType7Content {
            title: "Tools".to_string(),
            body: vec![icon_item("Hammer", &[])],
        });

        let err = loose.validate(1).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ItemCount { index: 1, field: "icon_queries", .. }
        ));
    }

    #[test]
    fn item_counts_follow_layout_bounds() {
        let five = (0..5).map(|i| item(&format!("Item {i}"))).collect::<Vec<_>>();
        let too_many = LlmSlideContent::Type2(LlmType2Content {
            title: "Overview".to_string(),
            body: five.clone(),
        });
        assert!(matches!(
            too_many.validate(0),
            Err(ValidationError::ItemCount { min: 1, max: 4, actual: 5, .. })
        ));

        let four = LlmSlideContent::Type2(LlmType2Content {
            title: "Overview".to_string(),
            body: five[..4].to_vec(),
        });
        assert!(four.validate(0).is_ok());

        let empty = LlmSlideContent::Type9(LlmType9Content {
            title: "Numbers".to_string(),
            body: vec![],
            graph: GraphSpec(json!({"name": "g"})),
        });
        assert!(matches!(
            empty.validate(0),
            Err(ValidationError::ItemCount { min: 1, max: 3, actual: 0, .. })
        ));
    }

    #[test]
    fn type9_requires_graph_when_parsing() {
        let value = json!({
            "title": "Numbers",
            "body": [{"heading": "Growth", "description": "Up"}]
        });
        assert!(LlmSlideContent::from_value(SlideType::Type9, value).is_err());
    }

    #[test]
    fn graph_must_be_an_object() {
        let loose = LlmSlideContent::Type5(LlmType5Content {
            title: "Numbers".to_string(),
            body: body_text(),
            graph: GraphSpec(json!("bar chart")),
        });
        assert_eq!(
            loose.validate(3),
            Err(ValidationError::InvalidGraph { index: 3 })
        );
    }

    #[test]
    fn conversion_preserves_every_required_field() {
        let graph = GraphSpec(json!({"name": "share", "unit": "%", "data": [1, 2]}));
        let slides = vec![
            LlmSlideContent::Type5(LlmType5Content {
                title: "Share".to_string(),
                body: body_text(),
                graph: graph.clone(),
            }),
            LlmSlideContent::Type6(LlmType6Content {
                title: "Plan".to_string(),
                description: "What happens next".to_string(),
                body: vec![item("Build"), item("Ship")],
            }),
            LlmSlideContent::Type9(LlmType9Content {
                title: "Split".to_string(),
                body: vec![item("Wind")],
                graph: graph.clone(),
            }),
        ];

        for loose in &slides {
            loose.validate(0).unwrap();
            let strict = loose.to_content();
            assert_eq!(strict.slide_type(), loose.slide_type());
            assert_eq!(strict.graph(), loose.graph());
        }
    }

    #[test]
    fn notes_describe_item_bounds() {
        assert!(notes(SlideType::Type2).contains("1 to 4 HeadingModels"));
        assert!(notes(SlideType::Type3).contains("**3 HeadingModels**"));
        assert!(notes(SlideType::Type1).contains("150 and 400 characters"));
    }
}
