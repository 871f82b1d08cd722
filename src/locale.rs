//! Language selection and the bilingual UI string table.
//!
//! The application is fully bilingual: every user-facing string exists in
//! both English (`en`) and Malayalam (`ml`).  [`Language`] is the process-wide
//! selection; [`LocaleStrings`] is the per-language lookup table, exposed as
//! `&'static` data via [`Language::strings`] so no caller ever allocates for
//! a label.
//!
//! Changing the language invalidates previously generated outputs — that rule
//! lives in the state controller ([`crate::app`]), not here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Supported content languages.
///
/// Serialised as the ISO-639-1 codes `"en"` / `"ml"` (config files, CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Malayalam.
    Ml,
}

impl Language {
    /// ISO-639-1 code, as used in config files and the CLI.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ml => "ml",
        }
    }

    /// English name of the language, as embedded in service prompts
    /// ("The content may be in Malayalam.").
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ml => "Malayalam",
        }
    }

    /// The UI string table for this language.
    pub fn strings(&self) -> &'static LocaleStrings {
        match self {
            Language::En => &EN,
            Language::Ml => &ML,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "ml" => Ok(Language::Ml),
            other => Err(format!("unknown language '{other}' (expected 'en' or 'ml')")),
        }
    }
}

// ---------------------------------------------------------------------------
// LocaleStrings
// ---------------------------------------------------------------------------

/// All user-facing strings for one language.
///
/// The field set mirrors the surfaces that consume it: the CLI banner, the
/// state controller's loading/error messages, and the PDF export's title and
/// column headers.
#[derive(Debug)]
pub struct LocaleStrings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub upload_title: &'static str,
    pub upload_subtitle: &'static str,
    pub upload_button: &'static str,
    pub change_image: &'static str,
    pub clear_image: &'static str,
    pub generate_quiz: &'static str,
    pub generate_audio: &'static str,
    pub download_pdf: &'static str,
    pub loading_quiz: &'static str,
    pub loading_audio: &'static str,
    pub error_quiz: &'static str,
    pub error_audio: &'static str,
    pub error_generic: &'static str,
    pub quiz_title: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    pub footer: &'static str,
}

static EN: LocaleStrings = LocaleStrings {
    title: "AI Teacher's Assistant",
    subtitle: "Instantly create quizzes or audio from any textbook page.",
    upload_title: "Upload a Textbook Page",
    upload_subtitle: "Drag & drop an image or click to select a file",
    upload_button: "Select Image",
    change_image: "Change Image",
    clear_image: "Clear",
    generate_quiz: "Generate Quiz",
    generate_audio: "Read Aloud",
    download_pdf: "Download PDF",
    loading_quiz: "Generating your quiz, please wait...",
    loading_audio: "Generating audio, this may take a moment...",
    error_quiz: "Sorry, we couldn't generate a quiz from this image. Please try another one.",
    error_audio: "Sorry, we couldn't generate audio for this image. Please try again.",
    error_generic: "An unexpected error occurred.",
    quiz_title: "Generated Quiz",
    question: "Question",
    answer: "Answer",
    footer: "Powered by Tecno",
};

static ML: LocaleStrings = LocaleStrings {
    title: "AI ടീച്ചേഴ്സ് അസിസ്റ്റന്റ്",
    subtitle: "ഏത് പാഠപുസ്തക പേജിൽ നിന്നും തൽക്ഷണം ക്വിസുകളോ ഓഡിയോയോ ഉണ്ടാക്കുക.",
    upload_title: "പാഠപുസ്തകത്തിന്റെ പേജ് അപ്‌ലോഡ് ചെയ്യുക",
    upload_subtitle:
        "ഒരു ചിത്രം ഡ്രാഗ് & ഡ്രോപ്പ് ചെയ്യുക അല്ലെങ്കിൽ ഒരു ഫയൽ തിരഞ്ഞെടുക്കാൻ ക്ലിക്കുചെയ്യുക",
    upload_button: "ചിത്രം തിരഞ്ഞെടുക്കുക",
    change_image: "ചിത്രം മാറ്റുക",
    clear_image: "മായ്ക്കുക",
    generate_quiz: "ക്വിസ് ഉണ്ടാക്കുക",
    generate_audio: "ഉറക്കെ വായിക്കുക",
    download_pdf: "PDF ഡൗൺലോഡ് ചെയ്യുക",
    loading_quiz: "നിങ്ങളുടെ ക്വിസ് തയ്യാറാക്കുന്നു, ദയവായി കാത്തിരിക്കുക...",
    loading_audio: "ഓഡിയോ തയ്യാറാക്കുന്നു, ഇതിന് കുറച്ച് സമയമെടുത്തേക്കാം...",
    error_quiz:
        "ക്ഷമിക്കണം, ഈ ചിത്രത്തിൽ നിന്ന് ഒരു ക്വിസ് ഉണ്ടാക്കാൻ കഴിഞ്ഞില്ല. ദയവായി മറ്റൊന്ന് ശ്രമിക്കുക.",
    error_audio:
        "ക്ഷമിക്കണം, ഈ ചിത്രത്തിനായി ഓഡിയോ ഉണ്ടാക്കാൻ കഴിഞ്ഞില്ല. ദയവായി വീണ്ടും ശ്രമിക്കുക.",
    error_generic: "അപ്രതീക്ഷിതമായ ഒരു പിശക് സംഭവിച്ചു.",
    quiz_title: "തയ്യാറാക്കിയ ക്വിസ്",
    question: "ചോദ്യം",
    answer: "ഉത്തരം",
    footer: "Powered by Tecno",
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
