/// Fixed strings shown to the visitor in one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleStrings {
    pub placeholder: &'static str,
    pub welcome: &'static str,
    pub reply: &'static str,
}

const ENGLISH: LocaleStrings = LocaleStrings {
    placeholder: "Start your conversation by typing hi...",
    welcome: "Welcome to our Museum! How can I assist you with ticket purchases today?",
    reply: "Thank you for your message. How many tickets would you like to purchase?",
};

const HINDI: LocaleStrings = LocaleStrings {
    placeholder: "यहां अपना संदेश लिखें...",
    welcome: "हमारे संग्रहालय में आपका स्वागत है! मैं आपकी टिकट खरीद में कैसे सहायता कर सकता हूँ?",
    reply: "आपके संदेश के लिए धन्यवाद। आप कितने टिकट खरीदना चाहेंगे?",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Hindi,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::English => "english",
            Locale::Hindi => "hindi",
        }
    }

    pub fn all() -> Vec<Locale> {
        vec![Locale::English, Locale::Hindi]
    }

    /// Button label in the language picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Hindi => "हिंदी (Hindi)",
        }
    }

    pub fn strings(&self) -> &'static LocaleStrings {
        match self {
            Locale::English => &ENGLISH,
            Locale::Hindi => &HINDI,
        }
    }
}

/// Strings for an optional locale; English covers the unset case.
pub fn strings_for(locale: Option<Locale>) -> &'static LocaleStrings {
    locale.unwrap_or(Locale::English).strings()
}
