//! Chatbot intent routing.
//!
//! The model classifies each message into a closed set of intents. Navigation
//! intents map to a dashboard route through a static table; the client shows
//! the suggestion and only navigates after the farmer confirms.

use serde::{Deserialize, Serialize};

use super::prompts;
use crate::domain::locale::Locale;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatInput {
    pub query: String,
    #[serde(default)]
    pub language: Locale,
}

impl ChatInput {
    pub fn prompt(&self) -> String {
        let intents = Intent::all()
            .iter()
            .map(|intent| format!("- {}: {}", intent.as_str(), intent.description()))
            .collect::<Vec<_>>()
            .join("\n");
        prompts::render(
            prompts::CHAT,
            &[
                ("language", self.language.display_name()),
                ("query", self.query.trim()),
                ("intents", &intents),
            ],
        )
    }
}

/// What the farmer wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    NavigateDashboard,
    NavigateCropDoctor,
    NavigateMarketAnalyst,
    NavigateSchemes,
    NavigateWeather,
    NavigateCommunity,
    NavigateShop,
    NavigateLearn,
    NavigateTracker,
    NavigateRecommender,
    NavigateProfile,
    NavigateSettings,
    QueryMarketPrices,
    QuerySchemes,
    QueryCropRecommendation,
    GeneralQuestion,
    FormFillingHelp,
    Unknown,
}

impl Intent {
    pub fn all() -> &'static [Intent] {
        &[
            Intent::NavigateDashboard,
            Intent::NavigateCropDoctor,
            Intent::NavigateMarketAnalyst,
            Intent::NavigateSchemes,
            Intent::NavigateWeather,
            Intent::NavigateCommunity,
            Intent::NavigateShop,
            Intent::NavigateLearn,
            Intent::NavigateTracker,
            Intent::NavigateRecommender,
            Intent::NavigateProfile,
            Intent::NavigateSettings,
            Intent::QueryMarketPrices,
            Intent::QuerySchemes,
            Intent::QueryCropRecommendation,
            Intent::GeneralQuestion,
            Intent::FormFillingHelp,
            Intent::Unknown,
        ]
    }

    /// Wire name, as the model emits it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::NavigateDashboard => "navigate_dashboard",
            Intent::NavigateCropDoctor => "navigate_crop_doctor",
            Intent::NavigateMarketAnalyst => "navigate_market_analyst",
            Intent::NavigateSchemes => "navigate_schemes",
            Intent::NavigateWeather => "navigate_weather",
            Intent::NavigateCommunity => "navigate_community",
            Intent::NavigateShop => "navigate_shop",
            Intent::NavigateLearn => "navigate_learn",
            Intent::NavigateTracker => "navigate_tracker",
            Intent::NavigateRecommender => "navigate_recommender",
            Intent::NavigateProfile => "navigate_profile",
            Intent::NavigateSettings => "navigate_settings",
            Intent::QueryMarketPrices => "query_market_prices",
            Intent::QuerySchemes => "query_schemes",
            Intent::QueryCropRecommendation => "query_crop_recommendation",
            Intent::GeneralQuestion => "general_question",
            Intent::FormFillingHelp => "form_filling_help",
            Intent::Unknown => "unknown",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Intent::NavigateDashboard => "wants to go to the main dashboard",
            Intent::NavigateCropDoctor => "wants to use the crop diagnosis tool",
            Intent::NavigateMarketAnalyst => "wants to check market prices",
            Intent::NavigateSchemes => "wants to find government schemes",
            Intent::NavigateWeather => "wants to check the weather forecast",
            Intent::NavigateCommunity => "wants to visit the community forum",
            Intent::NavigateShop => "wants to buy farming products",
            Intent::NavigateLearn => "wants learning materials",
            Intent::NavigateTracker => "wants to manage expenses",
            Intent::NavigateRecommender => "wants crop recommendations",
            Intent::NavigateProfile => "wants to see their profile",
            Intent::NavigateSettings => "wants to change settings",
            Intent::QueryMarketPrices => "asks a specific market price question, e.g. \"what is the price of onions?\"",
            Intent::QuerySchemes => "asks a specific question about a government scheme",
            Intent::QueryCropRecommendation => "asks for a crop recommendation",
            Intent::GeneralQuestion => "has a general agricultural question",
            Intent::FormFillingHelp => "needs help filling a form, e.g. \"how do I enter my land size?\"",
            Intent::Unknown => "intent is unclear or unrelated to the app",
        }
    }

    /// Dashboard route for navigation intents.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Intent::NavigateDashboard => Some("/dashboard"),
            Intent::NavigateCropDoctor => Some("/dashboard/crop-doctor"),
            Intent::NavigateMarketAnalyst => Some("/dashboard/market-analyst"),
            Intent::NavigateSchemes => Some("/dashboard/schemes"),
            Intent::NavigateWeather => Some("/dashboard/weather"),
            Intent::NavigateCommunity => Some("/dashboard/community"),
            Intent::NavigateShop => Some("/dashboard/shop"),
            Intent::NavigateLearn => Some("/dashboard/learn"),
            Intent::NavigateTracker => Some("/dashboard/tracker"),
            Intent::NavigateRecommender => Some("/dashboard/crop-recommender"),
            Intent::NavigateProfile => Some("/dashboard/profile"),
            Intent::NavigateSettings => Some("/dashboard/settings"),
            Intent::QueryMarketPrices
            | Intent::QuerySchemes
            | Intent::QueryCropRecommendation
            | Intent::GeneralQuestion
            | Intent::FormFillingHelp
            | Intent::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// What the model returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<ChatEntities>,
}

impl ChatReply {
    pub fn unavailable(locale: Locale) -> Self {
        let response = match locale {
            Locale::En => "Sorry, I could not understand that. Please try again.",
            Locale::Hi => "क्षमा करें, मैं समझ नहीं पाई। कृपया फिर से प्रयास करें।",
            Locale::Kn => "ಕ್ಷಮಿಸಿ, ನನಗೆ ಅರ್ಥವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
            Locale::Bn => "দুঃখিত, আমি বুঝতে পারিনি। অনুগ্রহ করে আবার চেষ্টা করুন।",
            Locale::Bho => "माफ करीं, हम समझ ना पवनी। फेर से कोसिस करीं।",
        };
        Self {
            response: response.to_string(),
            intent: Intent::Unknown,
            entities: None,
        }
    }

    /// Attaches a navigation suggestion for navigation intents.
    pub fn into_response(self) -> ChatResponse {
        let navigation = self.intent.route().map(|route| NavigationSuggestion {
            intent: self.intent,
            route: route.to_string(),
            requires_confirmation: true,
        });
        ChatResponse {
            response: self.response,
            intent: self.intent,
            entities: self.entities,
            navigation,
        }
    }
}

/// A route the client may open once the farmer confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSuggestion {
    pub intent: Intent,
    pub route: String,
    pub requires_confirmation: bool,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<ChatEntities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationSuggestion>,
}
