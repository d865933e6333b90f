//! UI language and currency preference.

use digistore_commerce::Currency;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::I18nError;
use crate::language::{Language, TextDirection};

/// Display preferences chosen by the visitor.
///
/// The RTL flag is derived from the language and never stored separately,
/// so it cannot drift out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub currency: Currency,
}

impl UiPreferences {
    pub fn new(language: Language, currency: Currency) -> Self {
        Self { language, currency }
    }

    /// Set the UI language.
    pub fn set_language(&mut self, language: Language) {
        debug!(language = %language, rtl = language.is_rtl(), "language changed");
        self.language = language;
    }

    /// Set the display currency.
    pub fn set_currency(&mut self, currency: Currency) {
        debug!(currency = %currency, "currency changed");
        self.currency = currency;
    }

    /// Set the language from a raw code, rejecting unsupported codes.
    pub fn set_language_code(&mut self, code: &str) -> Result<Language, I18nError> {
        let language =
            Language::from_code(code).ok_or_else(|| I18nError::UnsupportedLanguage(code.to_string()))?;
        self.set_language(language);
        Ok(language)
    }

    /// Set the currency from a raw code, rejecting unsupported codes.
    pub fn set_currency_code(&mut self, code: &str) -> Result<Currency, I18nError> {
        let currency =
            Currency::from_code(code).ok_or_else(|| I18nError::UnsupportedCurrency(code.to_string()))?;
        self.set_currency(currency);
        Ok(currency)
    }

    pub fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    pub fn text_direction(&self) -> TextDirection {
        self.language.direction()
    }
}
