//! Rendering-facing slide content.
//!
//! These are the shapes persistence and export consume. The model never
//! produces them directly; see [`crate::llm_content`] for the generation-facing
//! counterparts and their conversion.

use schemars::JsonSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("slide type must be between 1 and 9, got {0}")]
pub struct InvalidSlideType(pub i64);

/// One of the nine fixed slide layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum SlideType {
    /// Title, body text and one image.
    Type1,
    /// Title and a list of items.
    Type2,
    /// Title, three items and one image. Reserved, never generated.
    Type3,
    /// Title and a list of items with an image each.
    Type4,
    /// Title, body text and a graph.
    Type5,
    /// Title, description and a list of items.
    Type6,
    /// Title and a list of items with an icon each.
    Type7,
    /// Title, description and a list of items with an icon each.
    Type8,
    /// Title, a list of items and a graph.
    Type9,
}

impl SlideType {
    /// Every type the classifier and content generator may select.
    pub const SELECTABLE: [SlideType; 8] = [
        SlideType::Type1,
        SlideType::Type2,
        SlideType::Type4,
        SlideType::Type5,
        SlideType::Type6,
        SlideType::Type7,
        SlideType::Type8,
        SlideType::Type9,
    ];

    pub fn tag(self) -> u8 {
        match self {
            SlideType::Type1 => 1,
            SlideType::Type2 => 2,
            SlideType::Type3 => 3,
            SlideType::Type4 => 4,
            SlideType::Type5 => 5,
            SlideType::Type6 => 6,
            SlideType::Type7 => 7,
            SlideType::Type8 => 8,
            SlideType::Type9 => 9,
        }
    }

    pub fn is_reserved(self) -> bool {
        self == SlideType::Type3
    }

    pub fn has_graph(self) -> bool {
        matches!(self, SlideType::Type5 | SlideType::Type9)
    }

    /// Short layout description used in prompts.
    pub fn layout(self) -> &'static str {
        match self {
            SlideType::Type1 => "contains title, description and image.",
            SlideType::Type2 => "contains title and list of items.",
            SlideType::Type3 => "contains title, three items and image.",
            SlideType::Type4 => "contains title and list of items with images.",
            SlideType::Type5 => "contains title, description and a graph.",
            SlideType::Type6 => "contains title, description and list of items.",
            SlideType::Type7 => "contains title and list of items with icons.",
            SlideType::Type8 => "contains title, description and list of items with icons.",
            SlideType::Type9 => "contains title, list of items and a graph.",
        }
    }
}

impl TryFrom<i64> for SlideType {
    type Error = InvalidSlideType;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(SlideType::Type1),
            2 => Ok(SlideType::Type2),
            3 => Ok(SlideType::Type3),
            4 => Ok(SlideType::Type4),
            5 => Ok(SlideType::Type5),
            6 => Ok(SlideType::Type6),
            7 => Ok(SlideType::Type7),
            8 => Ok(SlideType::Type8),
            9 => Ok(SlideType::Type9),
            other => Err(InvalidSlideType(other)),
        }
    }
}

impl From<SlideType> for u8 {
    fn from(slide_type: SlideType) -> Self {
        slide_type.tag()
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Graph payload (series and units). Passed through untouched; its inner
/// shape belongs to the graph renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GraphSpec(pub serde_json::Value);

impl GraphSpec {
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }
}

/// A short heading and description pair shown as a list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingItem {
    pub heading: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type1Content {
    pub title: String,
    pub body: String,
    pub image_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type2Content {
    pub title: String,
    pub body: Vec<HeadingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type3Content {
    pub title: String,
    pub body: Vec<HeadingItem>,
    pub image_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type4Content {
    pub title: String,
    pub body: Vec<HeadingItem>,
    pub image_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type5Content {
    pub title: String,
    pub body: String,
    pub graph: GraphSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type6Content {
    pub title: String,
    pub description: String,
    pub body: Vec<HeadingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type7Content {
    pub title: String,
    pub body: Vec<HeadingItem>,
    pub icon_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type8Content {
    pub title: String,
    pub description: String,
    pub body: Vec<HeadingItem>,
    pub icon_queries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type9Content {
    pub title: String,
    pub body: Vec<HeadingItem>,
    pub graph: GraphSpec,
}

/// Strict content of one slide, one variant per layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlideContent {
    Type1(Type1Content),
    Type2(Type2Content),
    Type3(Type3Content),
    Type4(Type4Content),
    Type5(Type5Content),
    Type6(Type6Content),
    Type7(Type7Content),
    Type8(Type8Content),
    Type9(Type9Content),
}

impl SlideContent {
    pub fn slide_type(&self) -> SlideType {
        match self {
            SlideContent::Type1(_) => SlideType::Type1,
            SlideContent::Type2(_) => SlideType::Type2,
            SlideContent::Type3(_) => SlideType::Type3,
            SlideContent::Type4(_) => SlideType::Type4,
            SlideContent::Type5(_) => SlideType::Type5,
            SlideContent::Type6(_) => SlideType::Type6,
            SlideContent::Type7(_) => SlideType::Type7,
            SlideContent::Type8(_) => SlideType::Type8,
            SlideContent::Type9(_) => SlideType::Type9,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SlideContent::Type1(c) => &c.title,
            SlideContent::Type2(c) => &c.title,
            SlideContent::Type3(c) => &c.title,
            SlideContent::Type4(c) => &c.title,
            SlideContent::Type5(c) => &c.title,
            SlideContent::Type6(c) => &c.title,
            SlideContent::Type7(c) => &c.title,
            SlideContent::Type8(c) => &c.title,
            SlideContent::Type9(c) => &c.title,
        }
    }

    pub fn graph(&self) -> Option<&GraphSpec> {
        match self {
            SlideContent::Type5(c) => Some(&c.graph),
            SlideContent::Type9(c) => Some(&c.graph),
            _ => None,
        }
    }

    /// Parse strict content for a known type.
    pub fn from_value(
        slide_type: SlideType,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match slide_type {
            SlideType::Type1 => SlideContent::Type1(serde_json::from_value(value)?),
            SlideType::Type2 => SlideContent::Type2(serde_json::from_value(value)?),
            SlideType::Type3 => SlideContent::Type3(serde_json::from_value(value)?),
            SlideType::Type4 => SlideContent::Type4(serde_json::from_value(value)?),
            SlideType::Type5 => SlideContent::Type5(serde_json::from_value(value)?),
            SlideType::Type6 => SlideContent::Type6(serde_json::from_value(value)?),
            SlideType::Type7 => SlideContent::Type7(serde_json::from_value(value)?),
            SlideType::Type8 => SlideContent::Type8(serde_json::from_value(value)?),
            SlideType::Type9 => SlideContent::Type9(serde_json::from_value(value)?),
        })
    }
}

/// A typed slide: `{"type": n, "content": {...}}` on the wire.
///
/// The type tag is derived from the content variant, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSlideModel")]
pub struct SlideModel {
    content: SlideContent,
}

impl SlideModel {
    pub fn new(content: SlideContent) -> Self {
        Self { content }
    }

    pub fn slide_type(&self) -> SlideType {
        self.content.slide_type()
    }

    pub fn content(&self) -> &SlideContent {
        &self.content
    }

    pub fn into_content(self) -> SlideContent {
        self.content
    }
}

impl From<SlideContent> for SlideModel {
    fn from(content: SlideContent) -> Self {
        Self::new(content)
    }
}

impl Serialize for SlideModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SlideModel", 2)?;
        state.serialize_field("type", &self.slide_type())?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawSlideModel {
    #[serde(rename = "type")]
    slide_type: SlideType,
    content: serde_json::Value,
}

impl TryFrom<RawSlideModel> for SlideModel {
    type Error = serde_json::Error;

    fn try_from(raw: RawSlideModel) -> Result<Self, Self::Error> {
        SlideContent::from_value(raw.slide_type, raw.content).map(SlideModel::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slide_type_tags_round_trip_through_integers() {
        for tag in 1..=9i64 {
            let slide_type = SlideType::try_from(tag).unwrap();
            assert_eq!(i64::from(slide_type.tag()), tag);
        }
        assert_eq!(SlideType::try_from(0i64), Err(InvalidSlideType(0)));
        assert_eq!(SlideType::try_from(10i64), Err(InvalidSlideType(10)));
    }

    #[test]
    fn selectable_types_exclude_reserved() {
        assert!(!SlideType::SELECTABLE.contains(&SlideType::Type3));
        assert_eq!(SlideType::SELECTABLE.len(), 8);
        assert!(SlideType::Type3.is_reserved());
    }

    #[test]
    fn slide_model_serializes_type_and_content() {
        let slide = SlideModel::new(SlideContent::Type5(Type5Content {
            title: "Revenue".to_string(),
            body: "Revenue grew **20%**.".to_string(),
            graph: GraphSpec(json!({"name": "revenue", "unit": "%"})),
        }));

        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(value["type"], json!(5));
        assert_eq!(value["content"]["title"], json!("Revenue"));
        assert_eq!(value["content"]["graph"]["unit"], json!("%"));
    }

    #[test]
    fn slide_model_deserializes_by_tag() {
        let value = json!({
            "type": 7,
            "content": {
                "title": "Tools",
                "body": [{"heading": "Hammer", "description": "Drives nails"}],
                "icon_queries": ["hammer"]
            }
        });

        let slide: SlideModel = serde_json::from_value(value).unwrap();
        assert_eq!(slide.slide_type(), SlideType::Type7);
        assert_eq!(slide.content().title(), "Tools");
    }

    #[test]
    fn slide_model_rejects_content_of_another_type() {
        let value = json!({
            "type": 9,
            "content": {"title": "No graph", "body": []}
        });

        assert!(serde_json::from_value::<SlideModel>(value).is_err());
    }

    #[test]
    fn only_graph_types_expose_graphs() {
        let slide = SlideContent::Type2(Type2Content {
            title: "List".to_string(),
            body: vec![],
        });
        assert!(slide.graph().is_none());
        assert!(!SlideType::Type2.has_graph());
        assert!(SlideType::Type9.has_graph());
    }
}
