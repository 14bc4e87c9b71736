use serde::{Deserialize, Serialize};

/// Bilingual text, English and Welsh.
///
/// Every user-facing string the school publishes carries both languages.
/// Consumers pick a side with [`Localized::text`] rather than poking at
/// language-suffixed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub cy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Cy,
}

impl Localized {
    pub fn new(en: impl Into<String>, cy: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            cy: cy.into(),
        }
    }

    /// The text in the requested language, falling back to the other
    /// language when the requested side is empty.
    pub fn text(&self, language: Language) -> &str {
        let (preferred, fallback) = match language {
            Language::En => (&self.en, &self.cy),
            Language::Cy => (&self.cy, &self.en),
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_when_translation_missing() {
        let title = Localized::new("Sports Day", "");
        assert_eq!(title.text(Language::Cy), "Sports Day");
        assert_eq!(title.text(Language::En), "Sports Day");

        let title = Localized::new("Sports Day", "Diwrnod Chwaraeon");
        assert_eq!(title.text(Language::Cy), "Diwrnod Chwaraeon");
    }
}
