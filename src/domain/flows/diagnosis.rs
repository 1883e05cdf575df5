//! Crop disease diagnosis.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::search_links::{google_search_url, youtube_search_url};
use crate::domain::foundation::ValidationError;
use crate::domain::locale::Locale;

/// Request body for diagnosis. At least one of photo or description is required.
#[derive(Debug, Clone, Deserialize)]
pub struct CropDiagnosisInput {
    #[serde(default)]
    pub photo_data_uri: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Locale,
}

impl CropDiagnosisInput {
    /// Parses the attached photo, if any.
    pub fn photo(&self) -> Result<Option<PhotoDataUri>, ValidationError> {
        match self.photo_data_uri.as_deref() {
            Some(uri) if !uri.trim().is_empty() => PhotoDataUri::parse(uri).map(Some),
            _ => Ok(None),
        }
    }

    /// Description with surrounding whitespace removed; blank counts as absent.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn has_photo(&self) -> bool {
        self.photo_data_uri
            .as_deref()
            .is_some_and(|uri| !uri.trim().is_empty())
    }

    pub fn prompt(&self) -> String {
        let mut inputs = Vec::new();
        if self.has_photo() {
            inputs.push("Crop image: attached.".to_string());
        }
        if let Some(description) = self.description() {
            inputs.push(format!("Description: \"{}\"", description));
        }
        prompts::render(
            prompts::CROP_DIAGNOSIS,
            &[
                ("language", self.language.display_name()),
                ("inputs", &inputs.join("\n")),
            ],
        )
    }
}

/// A `data:<mime>;base64,<data>` image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDataUri {
    mime_type: String,
    data: String,
}

impl PhotoDataUri {
    pub fn parse(uri: &str) -> Result<Self, ValidationError> {
        const FIELD: &str = "photo_data_uri";

        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ValidationError::invalid_format(FIELD, "expected a data: URI"))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| ValidationError::invalid_format(FIELD, "expected base64 encoding"))?;

        if !mime_type.starts_with("image/") || mime_type.len() <= "image/".len() {
            return Err(ValidationError::invalid_format(FIELD, "expected an image MIME type"));
        }
        if data.is_empty() {
            return Err(ValidationError::empty_field(FIELD));
        }
        STANDARD
            .decode(data)
            .map_err(|_| ValidationError::invalid_format(FIELD, "invalid base64 data"))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without the `data:` prefix.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// What the model returns before links are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisDraft {
    pub is_plant: bool,
    pub diagnosis: String,
    #[serde(default)]
    pub solutions: String,
    #[serde(default)]
    pub documentation_search_query: Option<String>,
    #[serde(default)]
    pub youtube_search_query: Option<String>,
}

impl DiagnosisDraft {
    /// Turns suggested search queries into links. Non-plant input never carries links.
    pub fn into_diagnosis(self) -> CropDiagnosis {
        let is_plant = self.is_plant;
        let link = |query: Option<String>, build: fn(&str) -> String| {
            if !is_plant {
                return None;
            }
            query.as_deref().filter(|q| !q.is_empty()).map(build)
        };

        let documentation_link = link(self.documentation_search_query, google_search_url);
        let youtube_link = link(self.youtube_search_query, youtube_search_url);

        CropDiagnosis {
            is_plant,
            diagnosis: self.diagnosis,
            solutions: self.solutions,
            documentation_link,
            youtube_link,
        }
    }
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDiagnosis {
    pub is_plant: bool,
    pub diagnosis: String,
    pub solutions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
}

impl CropDiagnosis {
    pub fn unavailable(locale: Locale) -> Self {
        let diagnosis = match locale {
            Locale::En => "The crop diagnosis service is currently unavailable. Please try again in a few moments.",
            Locale::Hi => "फसल निदान सेवा अभी उपलब्ध नहीं है। कृपया कुछ क्षण बाद पुनः प्रयास करें।",
            Locale::Kn => "ಬೆಳೆ ರೋಗನಿರ್ಣಯ ಸೇವೆ ಪ್ರಸ್ತುತ ಲಭ್ಯವಿಲ್ಲ. ದಯವಿಟ್ಟು ಕೆಲವು ಕ್ಷಣಗಳಲ್ಲಿ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
            Locale::Bn => "ফসল রোগ নির্ণয় পরিষেবা বর্তমানে উপলব্ধ নয়। অনুগ্রহ করে কয়েক মুহূর্ত পরে আবার চেষ্টা করুন।",
            Locale::Bho => "फसल जाँच सेवा अबही उपलब्ध नइखे। कुछ देर बाद फेर से कोसिस करीं।",
        };
        Self {
            is_plant: true,
            diagnosis: diagnosis.to_string(),
            solutions: String::new(),
            documentation_link: None,
            youtube_link: None,
        }
    }
}
