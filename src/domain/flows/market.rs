//! Market price analysis.
//!
//! The flow runs in three steps: the model extracts `{crop, city}` from the
//! farmer's free-text question, [`lookup_market_price`] supplies a price,
//! and the model writes a sell-or-wait recommendation around that price.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::prompts;
use crate::domain::locale::Locale;

/// Request body for market analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketAnalysisInput {
    pub query: String,
    #[serde(default)]
    pub language: Locale,
}

impl MarketAnalysisInput {
    pub fn extraction_prompt(&self) -> String {
        prompts::render(prompts::MARKET_QUERY_EXTRACTION, &[("query", &self.query)])
    }

    pub fn analysis_prompt(&self, price: &MarketPrice) -> String {
        let amount = price.price.to_string();
        prompts::render(
            prompts::MARKET_ANALYSIS,
            &[
                ("language", self.language.display_name()),
                ("query", &self.query),
                ("crop", &price.crop),
                ("city", &price.city),
                ("price", &amount),
                ("unit", price.unit.label()),
            ],
        )
    }
}

/// Crop and city extracted from a free-text question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuery {
    pub crop: String,
    pub city: String,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub recommendation: String,
    pub analysis: String,
}

impl MarketAnalysis {
    /// Payload returned when the hosted model cannot be used.
    pub fn unavailable(locale: Locale) -> Self {
        let analysis = match locale {
            Locale::En => "The market analysis service is currently overloaded. Please try again in a few moments.",
            Locale::Hi => "बाजार विश्लेषण सेवा वर्तमान में ओवरलोड है। कृपया कुछ क्षण बाद पुनः प्रयास करें।",
            Locale::Kn => "ಮಾರುಕಟ್ಟೆ ವಿಶ್ಲೇಷಣೆ ಸೇವೆ ಪ್ರಸ್ತುತ ಓವರ್‌ಲೋಡ್ ಆಗಿದೆ. ದಯವಿಟ್ಟು ಕೆಲವು ಕ್ಷಣಗಳಲ್ಲಿ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
            Locale::Bn => "বাজার বিশ্লেষণ পরিষেবা বর্তমানে ওভারলোড। অনুগ্রহ করে কয়েক মুহূর্ত পরে আবার চেষ্টা করুন।",
            Locale::Bho => "बाजार विश्लेषण सेवा अबही ओवरलोड बा। कुछ देर बाद फेर से कोसिस करीं।",
        };
        Self {
            recommendation: "Service Unavailable".to_string(),
            analysis: analysis.to_string(),
        }
    }
}

/// Unit a price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    Kilogram,
    Quintal,
}

impl PriceUnit {
    pub fn label(&self) -> &'static str {
        match self {
            PriceUnit::Kilogram => "kg",
            PriceUnit::Quintal => "quintal",
        }
    }
}

/// Where a price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Listed mandi price.
    Listed,
    /// Plausible estimate for an unlisted pair.
    Estimate,
}

/// Result of the price lookup tool, in INR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketPrice {
    pub crop: String,
    pub city: String,
    pub price: u32,
    pub unit: PriceUnit,
    pub source: PriceSource,
}

const GRAINS: &[&str] = &["wheat", "rice", "cotton"];

#[rustfmt::skip]
const PRICE_TABLE: &[(&str, &[(&str, u32)])] = &[
    ("tomato", &[("pune", 28), ("mumbai", 35), ("bangalore", 25), ("delhi", 30), ("kolkata", 32), ("chennai", 27), ("lucknow", 26), ("jaipur", 29)]),
    ("onion", &[("pune", 18), ("mumbai", 22), ("bangalore", 16), ("delhi", 20), ("nashik", 15), ("indore", 17), ("kolkata", 25), ("hyderabad", 19)]),
    ("potato", &[("pune", 20), ("mumbai", 24), ("bangalore", 22), ("delhi", 18), ("kolkata", 19), ("lucknow", 15), ("agra", 14), ("shimla", 25)]),
    ("wheat", &[("delhi", 2100), ("pune", 2300), ("ludhiana", 1950), ("kanpur", 2050), ("indore", 2000), ("mumbai", 2400)]),
    ("rice", &[("kolkata", 3500), ("delhi", 3800), ("chennai", 3600), ("mumbai", 4000), ("lucknow", 3400), ("hyderabad", 3700)]),
    ("sugarcane", &[("pune", 300), ("lucknow", 315), ("kolhapur", 320), ("meerut", 310)]),
    ("cotton", &[("ahmedabad", 5500), ("mumbai", 5800), ("guntur", 5600), ("aurangabad", 5400)]),
];

/// Price lookup tool.
///
/// Crop keys are lowercased with all whitespace removed, city keys are
/// lowercased. Unlisted pairs get a stable estimate: the same pair always
/// yields the same price.
pub fn lookup_market_price(query: &MarketQuery) -> MarketPrice {
    let crop = crop_key(&query.crop);
    let city = city_key(&query.city);
    let unit = if GRAINS.contains(&crop.as_str()) {
        PriceUnit::Quintal
    } else {
        PriceUnit::Kilogram
    };

    let listed = PRICE_TABLE
        .iter()
        .find(|(name, _)| *name == crop)
        .and_then(|(_, cities)| cities.iter().find(|(name, _)| *name == city))
        .map(|(_, price)| *price);

    let (price, source) = match listed {
        Some(price) => (price, PriceSource::Listed),
        None => (estimate_price(&crop, &city, unit), PriceSource::Estimate),
    };

    MarketPrice {
        crop: query.crop.trim().to_string(),
        city: query.city.trim().to_string(),
        price,
        unit,
        source,
    }
}

fn crop_key(crop: &str) -> String {
    crop.to_lowercase().split_whitespace().collect()
}

fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Grains land in 1500..2500 INR/quintal, everything else in 10..50 INR/kg.
fn estimate_price(crop: &str, city: &str, unit: PriceUnit) -> u32 {
    let digest = Sha256::digest(format!("{}|{}", crop, city).as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    let seed = u64::from_be_bytes(seed);

    let (base, span) = match unit {
        PriceUnit::Quintal => (1500, 1000),
        PriceUnit::Kilogram => (10, 40),
    };
    base + (seed % span) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn query(crop: &str, city: &str) -> MarketQuery {
        MarketQuery {
            crop: crop.to_string(),
            city: city.to_string(),
        }
    }

    #[test]
    fn listed_vegetable_price_is_per_kg() {
        let price = lookup_market_price(&query("Tomato", "Mumbai"));
        assert_eq!(price.price, 35);
        assert_eq!(price.unit, PriceUnit::Kilogram);
        assert_eq!(price.source, PriceSource::Listed);
    }

    #[test]
    fn listed_grain_price_is_per_quintal() {
        let price = lookup_market_price(&query("wheat", "Ludhiana"));
        assert_eq!(price.price, 1950);
        assert_eq!(price.unit, PriceUnit::Quintal);
    }

    #[test]
    fn crop_key_ignores_whitespace() {
        let price = lookup_market_price(&query("Sugar Cane", "Kolhapur"));
        assert_eq!(price.price, 320);
        assert_eq!(price.source, PriceSource::Listed);
    }

    #[test]
    fn sugarcane_is_not_a_grain() {
        let price = lookup_market_price(&query("sugarcane", "pune"));
        assert_eq!(price.unit, PriceUnit::Kilogram);
    }

    #[test]
    fn unlisted_pair_gets_stable_estimate() {
        let first = lookup_market_price(&query("brinjal", "Nagpur"));
        let second = lookup_market_price(&query("Brinjal", "nagpur"));
        assert_eq!(first.source, PriceSource::Estimate);
        assert_eq!(first.price, second.price);
        assert!((10..50).contains(&first.price));
    }

    #[test]
    fn unlisted_grain_city_estimates_per_quintal() {
        let price = lookup_market_price(&query("rice", "Patna"));
        assert_eq!(price.source, PriceSource::Estimate);
        assert_eq!(price.unit, PriceUnit::Quintal);
        assert!((1500..2500).contains(&price.price));
    }

    #[test]
    fn unavailable_uses_requested_locale() {
        let hi = MarketAnalysis::unavailable(Locale::Hi);
        assert_eq!(hi.recommendation, "Service Unavailable");
        assert!(hi.analysis.starts_with("बाजार विश्लेषण सेवा"));

        let en = MarketAnalysis::unavailable(Locale::from_code("xx"));
        assert!(en.analysis.starts_with("The market analysis service"));
    }

    #[test]
    fn analysis_prompt_mentions_price_and_unit() {
        let input = MarketAnalysisInput {
            query: "Should I sell wheat in Delhi?".to_string(),
            language: Locale::Hi,
        };
        let price = lookup_market_price(&query("wheat", "Delhi"));
        let prompt = input.analysis_prompt(&price);
        assert!(prompt.contains("2100 INR per quintal"));
        assert!(prompt.contains("Hindi"));
        assert!(prompt.contains("Should I sell wheat in Delhi?"));
    }

    proptest! {
        #[test]
        fn estimates_stay_in_range(crop in "[a-z]{3,10}", city in "[a-z]{3,10}") {
            let price = lookup_market_price(&query(&crop, &city));
            match price.unit {
                PriceUnit::Quintal => prop_assert!((1500..2500).contains(&price.price) || price.source == PriceSource::Listed),
                PriceUnit::Kilogram => prop_assert!((10..50).contains(&price.price) || price.source == PriceSource::Listed),
            }
        }
    }
}
