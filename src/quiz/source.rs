use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{QuestionError, SourceError};
use crate::quiz::{Categories, Language, Question};

/// One question ready to be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedQuestion {
    pub question: Question,
    pub language: Language,
    pub categories: Categories,
}

/// Anything that can supply the question pool at startup.
///
/// The outer error means the whole source is unusable; an inner error rejects
/// a single record.
pub trait QuestionSource {
    fn name(&self) -> String;
    fn load(&self) -> Result<Vec<Result<LoadedQuestion, QuestionError>>, SourceError>;
}

#[derive(Deserialize)]
struct QuestionFile {
    categories: Vec<CategoryQuestions>,
}

#[derive(Deserialize)]
struct CategoryQuestions {
    category: String,
    questions: Vec<QuestionRecord>,
}

#[derive(Deserialize)]
struct QuestionRecord {
    statement: String,
    correct: i64,
    answers: Vec<String>,
}

/// A JSON question file for one language:
///
/// ```json
/// {"categories": [{"category": "Art", "questions": [
///     {"statement": "Who painted Guernica?", "correct": 0, "answers": ["Picasso", "Dali"]}
/// ]}]}
/// ```
#[derive(Debug, Clone)]
pub struct JsonQuestionFile {
    name: String,
    language: Language,
    contents: String,
}

impl JsonQuestionFile {
    pub fn new(name: impl Into<String>, language: Language, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language,
            contents: contents.into(),
        }
    }

    pub fn from_path(language: Language, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), language, contents))
    }
}

impl QuestionSource for JsonQuestionFile {
    fn name(&self) -> String {
        format!("{} ({})", self.name, self.language.locale())
    }

    fn load(&self) -> Result<Vec<Result<LoadedQuestion, QuestionError>>, SourceError> {
        let file: QuestionFile = serde_json::from_str(&self.contents)?;

        let mut records = Vec::new();
        for group in file.categories {
            let categories = Categories::from_name(&group.category);
            for record in group.questions {
                let loaded = categories.clone().and_then(|categories| {
                    Ok(LoadedQuestion {
                        question: Question::new(record.statement, record.answers, record.correct)?,
                        language: self.language,
                        categories,
                    })
                });
                records.push(loaded);
            }
        }
        Ok(records)
    }
}
