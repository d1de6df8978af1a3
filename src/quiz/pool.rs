use std::collections::HashMap;
use std::rc::Rc;

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SourceError;
use crate::quiz::source::QuestionSource;
use crate::quiz::{Categories, Language, Question};

/// Every known question, indexed by language and by category.
///
/// Buckets are append-only. Category lookups match the flag set exactly: a
/// question tagged `ART | SPORTS` is found under `ART | SPORTS`, `ART`,
/// `SPORTS` and `MIXED`, but nothing is found under a combination no question
/// was ever tagged with.
#[derive(Debug)]
pub struct QuestionPool {
    by_language: HashMap<Language, Vec<Rc<Question>>>,
    by_category: HashMap<Categories, Vec<Rc<Question>>>,
}

impl Default for QuestionPool {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionPool {
    pub fn new() -> Self {
        let mut by_category = HashMap::new();
        by_category.insert(Categories::MIXED, Vec::new());
        Self {
            by_language: HashMap::new(),
            by_category,
        }
    }

    /// Stamps `language` on the question and files it. Registering an equal
    /// question twice leaves the buckets unchanged.
    pub fn register(&mut self, question: Question, language: Language, categories: Categories) {
        let question = Rc::new(question.with_language(language));

        push_unique(self.by_language.entry(language).or_default(), &question);

        if !categories.is_empty() {
            push_unique(self.by_category.entry(categories).or_default(), &question);
        }
        for flag in categories.iter() {
            push_unique(self.by_category.entry(flag).or_default(), &question);
        }
        push_unique(
            self.by_category.entry(Categories::MIXED).or_default(),
            &question,
        );
    }

    /// Registers everything `source` yields. Invalid records are skipped with
    /// a warning. Returns how many records were accepted.
    pub fn load(&mut self, source: &dyn QuestionSource) -> Result<usize, SourceError> {
        let mut accepted = 0;
        for record in source.load()? {
            match record {
                Ok(loaded) => {
                    self.register(loaded.question, loaded.language, loaded.categories);
                    accepted += 1;
                }
                Err(err) => warn!("Skipping question: {}", err),
            }
        }
        info!("Loaded {} questions from {}", accepted, source.name());
        Ok(accepted)
    }

    pub fn questions_of_category(&self, categories: Categories) -> Option<&[Rc<Question>]> {
        self.by_category.get(&categories).map(Vec::as_slice)
    }

    pub fn questions_with_language(&self, language: Language) -> Option<&[Rc<Question>]> {
        self.by_language.get(&language).map(Vec::as_slice)
    }

    /// Up to `count` distinct questions of the bucket in uniformly random
    /// order. Fewer if the bucket is smaller, none if it doesn't exist.
    pub fn sample_session<R: Rng + ?Sized>(
        &self,
        categories: Categories,
        count: usize,
        rng: &mut R,
    ) -> Vec<Rc<Question>> {
        let Some(bucket) = self.questions_of_category(categories) else {
            return Vec::new();
        };
        let mut session = bucket.to_vec();
        session.shuffle(rng);
        session.truncate(count);
        session
    }

    pub fn random_question<R: Rng + ?Sized>(
        &self,
        language: Language,
        rng: &mut R,
    ) -> Option<Rc<Question>> {
        self.questions_with_language(language)?.choose(rng).cloned()
    }

    /// Number of distinct registered questions.
    pub fn len(&self) -> usize {
        self.by_category
            .get(&Categories::MIXED)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_unique(bucket: &mut Vec<Rc<Question>>, question: &Rc<Question>) {
    if !bucket.iter().any(|known| **known == **question) {
        bucket.push(Rc::clone(question));
    }
}
