pub mod pool;
pub mod score;
pub mod source;

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::QuestionError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Language {
    #[default]
    Catalan,
    Spanish,
    BritishEnglish,
    AmericanEnglish,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Catalan,
        Language::Spanish,
        Language::BritishEnglish,
        Language::AmericanEnglish,
    ];

    pub fn locale(self) -> &'static str {
        match self {
            Language::Catalan => "ca-ES",
            Language::Spanish => "es-ES",
            Language::BritishEnglish => "en-GB",
            Language::AmericanEnglish => "en-US",
        }
    }

    pub fn from_locale(prefix: &str) -> Result<Self, QuestionError> {
        Language::ALL
            .into_iter()
            .find(|language| language.locale().eq_ignore_ascii_case(prefix.trim()))
            .ok_or_else(|| QuestionError::UnknownLocale(prefix.to_string()))
    }
}

impl FromStr for Language {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_locale(s)
    }
}

/// Bit set of question categories. A question may carry several at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Categories(u8);

impl Categories {
    pub const NONE: Categories = Categories(0);
    pub const ART: Categories = Categories(1 << 0);
    pub const SPORTS: Categories = Categories(1 << 1);
    pub const HISTORY: Categories = Categories(1 << 2);
    pub const SCIENCE: Categories = Categories(1 << 3);
    pub const GEOGRAPHY: Categories = Categories(1 << 4);
    pub const ENTERTAINMENT: Categories = Categories(1 << 5);
    /// Every category; also the bucket every question lands in.
    pub const MIXED: Categories = Categories(0b0011_1111);

    const NAMED: [(Categories, &'static str); 6] = [
        (Categories::ART, "Art"),
        (Categories::SPORTS, "Sports"),
        (Categories::HISTORY, "History"),
        (Categories::SCIENCE, "Science"),
        (Categories::GEOGRAPHY, "Geography"),
        (Categories::ENTERTAINMENT, "Entertainment"),
    ];

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Categories) -> bool {
        self.0 & other.0 == other.0
    }

    /// The single-flag categories set in `self`.
    pub fn iter(self) -> impl Iterator<Item = Categories> {
        Categories::NAMED
            .into_iter()
            .map(|(flag, _)| flag)
            .filter(move |flag| self.contains(*flag))
    }

    /// Parses "Art", "Mixed" or a comma separated combination like
    /// "Art, Sports".
    pub fn from_name(name: &str) -> Result<Self, QuestionError> {
        let mut categories = Categories::NONE;
        for part in name.split(',').map(str::trim) {
            let flag = match part {
                "None" => Categories::NONE,
                "Mixed" => Categories::MIXED,
                _ => Categories::NAMED
                    .iter()
                    .find(|(_, flag_name)| flag_name.eq_ignore_ascii_case(part))
                    .map(|(flag, _)| *flag)
                    .ok_or_else(|| QuestionError::UnknownCategory(name.to_string()))?,
            };
            categories |= flag;
        }
        Ok(categories)
    }
}

impl BitOr for Categories {
    type Output = Categories;

    fn bitor(self, rhs: Categories) -> Categories {
        Categories(self.0 | rhs.0)
    }
}

impl BitOrAssign for Categories {
    fn bitor_assign(&mut self, rhs: Categories) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Categories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Categories::MIXED {
            return f.write_str("Mixed");
        }
        if self.is_empty() {
            return f.write_str("None");
        }
        let names = Categories::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "QuestionData")]
pub struct Question {
    statement: String,
    answers: Vec<String>,
    correct: usize,
    language: Language,
}

impl Question {
    pub fn new(
        statement: impl Into<String>,
        answers: Vec<String>,
        correct: i64,
    ) -> Result<Self, QuestionError> {
        let statement = statement.into();
        if answers.is_empty() {
            return Err(QuestionError::NoAnswers(statement));
        }
        if correct < 0 || correct as usize >= answers.len() {
            return Err(QuestionError::CorrectOutOfRange {
                statement,
                correct,
                answers: answers.len(),
            });
        }
        Ok(Self {
            statement,
            answers,
            correct: correct as usize,
            language: Language::default(),
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_correct(&self, index: usize) -> bool {
        self.correct == index
    }

    /// 'A' for the first answer, 'B' for the second...
    pub fn answer_letter(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }

    /// "A) Paris"
    pub fn lettered_answer(&self, index: usize) -> Option<String> {
        self.answers
            .get(index)
            .map(|answer| format!("{}) {}", Question::answer_letter(index), answer))
    }

    pub(crate) fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Unchecked shape of a serialized question; every decode goes through
/// [`Question::new`].
#[derive(serde::Deserialize)]
struct QuestionData {
    statement: String,
    answers: Vec<String>,
    correct: i64,
    #[serde(default)]
    language: Language,
}

impl TryFrom<QuestionData> for Question {
    type Error = QuestionError;

    fn try_from(data: QuestionData) -> Result<Self, Self::Error> {
        Ok(Question::new(data.statement, data.answers, data.correct)?.with_language(data.language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new("2 + 2?", answers(&["3", "4"]), 2).unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOutOfRange { correct: 2, answers: 2, .. }));
        assert!(Question::new("2 + 2?", answers(&["3", "4"]), -1).is_err());
    }

    #[test]
    fn rejects_empty_answer_list() {
        let err = Question::new("Anything?", Vec::new(), 0).unwrap_err();
        assert_eq!(err, QuestionError::NoAnswers("Anything?".into()));
    }

    #[test]
    fn letters_answers() {
        let question = Question::new("Capital of France?", answers(&["Rome", "Paris"]), 1).unwrap();
        assert_eq!(question.lettered_answer(1).as_deref(), Some("B) Paris"));
        assert_eq!(question.lettered_answer(2), None);
        assert!(question.is_correct(1));
    }

    #[test]
    fn decoding_checks_the_record() {
        let broken = r#"{"statement":"Broken?","answers":[],"correct":7,"language":"Catalan"}"#;
        assert!(serde_json::from_str::<Question>(broken).is_err());

        let out_of_range = r#"{"statement":"2 + 2?","answers":["3","4"],"correct":2}"#;
        assert!(serde_json::from_str::<Question>(out_of_range).is_err());

        let question = Question::new("2 + 2?", answers(&["3", "4"]), 1)
            .unwrap()
            .with_language(Language::Spanish);
        let json = serde_json::to_string(&question).unwrap();
        assert_eq!(serde_json::from_str::<Question>(&json).unwrap(), question);
    }

    #[test]
    fn parses_category_names() {
        assert_eq!(Categories::from_name("Art").unwrap(), Categories::ART);
        assert_eq!(Categories::from_name("Mixed").unwrap(), Categories::MIXED);
        assert_eq!(
            Categories::from_name("Art, Sports").unwrap(),
            Categories::ART | Categories::SPORTS
        );
        assert!(Categories::from_name("Cooking").is_err());
    }

    #[test]
    fn displays_categories() {
        assert_eq!(Categories::MIXED.to_string(), "Mixed");
        assert_eq!(Categories::HISTORY.to_string(), "History");
        assert_eq!((Categories::ART | Categories::SCIENCE).to_string(), "Art, Science");
        assert_eq!((Categories::ART | Categories::SCIENCE).iter().count(), 2);
    }

    #[test]
    fn maps_locales_both_ways() {
        for language in Language::ALL {
            assert_eq!(Language::from_locale(language.locale()).unwrap(), language);
        }
        assert!(Language::from_locale("fr-FR").is_err());
    }
}
