//! Government scheme lookup.

use serde::{Deserialize, Serialize};

use super::prompts;
use crate::domain::locale::Locale;

/// National portal listing central and state schemes.
pub const NATIONAL_SCHEME_PORTAL: &str = "https://www.myscheme.gov.in";

#[derive(Debug, Clone, Deserialize)]
pub struct SchemeQueryInput {
    pub query: String,
    #[serde(default)]
    pub language: Locale,
}

impl SchemeQueryInput {
    pub fn prompt(&self) -> String {
        prompts::render(
            prompts::SCHEME_LOOKUP,
            &[
                ("language", self.language.display_name()),
                ("query", self.query.trim()),
            ],
        )
    }
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeDetails {
    pub scheme_name: String,
    pub answer: String,
    pub eligibility: String,
    pub application_link: String,
}

impl SchemeDetails {
    pub fn unavailable(locale: Locale) -> Self {
        let answer = match locale {
            Locale::En => "Scheme details could not be fetched right now. Please try again in a few moments.",
            Locale::Hi => "अभी योजना का विवरण प्राप्त नहीं हो सका। कृपया कुछ क्षण बाद पुनः प्रयास करें।",
            Locale::Kn => "ಈಗ ಯೋಜನೆಯ ವಿವರಗಳನ್ನು ಪಡೆಯಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಕೆಲವು ಕ್ಷಣಗಳಲ್ಲಿ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
            Locale::Bn => "এই মুহূর্তে প্রকল্পের বিবরণ আনা যায়নি। অনুগ্রহ করে কয়েক মুহূর্ত পরে আবার চেষ্টা করুন।",
            Locale::Bho => "अबही योजना के जानकारी ना मिल पावल। कुछ देर बाद फेर से कोसिस करीं।",
        };
        Self {
            scheme_name: "Service Unavailable".to_string(),
            answer: answer.to_string(),
            eligibility: String::new(),
            application_link: NATIONAL_SCHEME_PORTAL.to_string(),
        }
    }
}
