//! Crop recommendation.

use serde::{Deserialize, Serialize};

use super::prompts;
use crate::domain::locale::Locale;

/// Irrigated or rain-fed (dry) land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmType {
    Irrigated,
    Rainfed,
}

impl FarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmType::Irrigated => "irrigated",
            FarmType::Rainfed => "rainfed",
        }
    }
}

/// Request body for crop recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct CropRecommendationInput {
    pub location: String,
    pub farm_type: FarmType,
    pub land_size: String,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub water_source: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub previous_crop: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub crop_preference: Option<String>,
    #[serde(default)]
    pub language: Locale,
}

impl CropRecommendationInput {
    pub fn prompt(&self) -> String {
        fn or(value: &Option<String>, absent: &str) -> String {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(absent)
                .to_string()
        }

        let previous_crop = match self.previous_crop.as_deref().map(str::trim) {
            Some(crop) if !crop.is_empty() => {
                format!("{} (suggest crops that are good for rotation)", crop)
            }
            _ => "Not specified".to_string(),
        };

        prompts::render(
            prompts::CROP_RECOMMENDATION,
            &[
                ("language", self.language.display_name()),
                ("location", self.location.trim()),
                ("farm_type", self.farm_type.as_str()),
                ("land_size", self.land_size.trim()),
                ("soil_type", &or(&self.soil_type, "Not specified")),
                ("water_source", &or(&self.water_source, "Not specified")),
                ("season", &or(&self.season, "Not specified")),
                ("previous_crop", &previous_crop),
                ("budget", &or(&self.budget, "Not specified")),
                ("crop_preference", &or(&self.crop_preference, "None")),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedCrop {
    pub crop_name: String,
    pub reasoning: String,
    pub image_hint: String,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRecommendations {
    pub recommendations: Vec<RecommendedCrop>,
}

impl CropRecommendations {
    pub const MAX: usize = 3;

    /// Payload returned when the hosted model cannot be used.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps at most [`Self::MAX`] recommendations; returns how many were cut.
    pub fn truncate(&mut self) -> usize {
        let extra = self.recommendations.len().saturating_sub(Self::MAX);
        self.recommendations.truncate(Self::MAX);
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CropRecommendationInput {
        CropRecommendationInput {
            location: "Dharwad, Karnataka".to_string(),
            farm_type: FarmType::Rainfed,
            land_size: "2 acres".to_string(),
            soil_type: Some("black soil".to_string()),
            water_source: None,
            season: Some("Kharif".to_string()),
            previous_crop: None,
            budget: Some("  ".to_string()),
            crop_preference: None,
            language: Locale::En,
        }
    }

    #[test]
    fn prompt_renders_absent_fields() {
        let prompt = input().prompt();
        assert!(prompt.contains("- Soil type: black soil"));
        assert!(prompt.contains("- Water source: Not specified"));
        assert!(prompt.contains("- Budget: Not specified"));
        assert!(prompt.contains("- Crop preference: None"));
        assert!(prompt.contains("- Previous crop: Not specified"));
        assert!(prompt.contains("- Farm type: rainfed"));
    }

    #[test]
    fn prompt_adds_rotation_hint_for_previous_crop() {
        let mut input = input();
        input.previous_crop = Some("groundnut".to_string());
        assert!(input
            .prompt()
            .contains("- Previous crop: groundnut (suggest crops that are good for rotation)"));
    }

    #[test]
    fn farm_type_deserializes_lowercase() {
        let farm: FarmType = serde_json::from_str("\"irrigated\"").unwrap();
        assert_eq!(farm, FarmType::Irrigated);
        assert!(serde_json::from_str::<FarmType>("\"desert\"").is_err());
    }

    #[test]
    fn truncate_keeps_three() {
        let crop = RecommendedCrop {
            crop_name: "Jowar".to_string(),
            reasoning: "Drought tolerant".to_string(),
            image_hint: "sorghum field".to_string(),
        };
        let mut recs = CropRecommendations {
            recommendations: vec![crop; 5],
        };
        assert_eq!(recs.truncate(), 2);
        assert_eq!(recs.recommendations.len(), 3);
    }

    #[test]
    fn empty_has_no_recommendations() {
        assert!(CropRecommendations::empty().recommendations.is_empty());
    }
}
