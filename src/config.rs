use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;

use crate::error::ConfigError;
use crate::quiz::Language;
use crate::speech::Voice;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Question files and the language each one is written in.
    pub question_files: Vec<(Language, PathBuf)>,
    pub session_size: usize,
    /// Pause after the correct/incorrect cue before moving on.
    pub feedback_delay: Duration,
    /// Pause between showing a text and speaking it.
    pub speak_delay: Duration,
    pub voice_rate: f32,
    pub voice_pitch: f32,
    pub menu_language: Language,
    pub tick: Duration,
    pub seed: Option<u64>,
    pub start_countdown: u32,
    pub time_low_seconds: u32,
    pub skip_intro: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_files: Vec::new(),
            session_size: 10,
            feedback_delay: Duration::from_millis(1000),
            speak_delay: Duration::from_millis(400),
            voice_rate: 1.0,
            voice_pitch: 1.0,
            menu_language: Language::BritishEnglish,
            tick: Duration::from_millis(50),
            seed: None,
            start_countdown: 3,
            time_low_seconds: 5,
            skip_intro: false,
        }
    }
}

impl Config {
    /// Reads `SENSE_QUIZ_*` variables, loading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let question_files = match lookup("SENSE_QUIZ_QUESTIONS") {
            Some(value) => parse_question_files(&value)?,
            None => defaults.question_files,
        };

        let session_size = parse_or(&lookup, "SENSE_QUIZ_SESSION_SIZE", defaults.session_size)?;
        if session_size == 0 {
            return Err(ConfigError::invalid(
                "SENSE_QUIZ_SESSION_SIZE",
                "0",
                "a quiz needs at least one question",
            ));
        }

        let voice_rate = parse_or(&lookup, "SENSE_QUIZ_VOICE_RATE", defaults.voice_rate)?;
        let voice_pitch = parse_or(&lookup, "SENSE_QUIZ_VOICE_PITCH", defaults.voice_pitch)?;
        for (var, value) in [
            ("SENSE_QUIZ_VOICE_RATE", voice_rate),
            ("SENSE_QUIZ_VOICE_PITCH", voice_pitch),
        ] {
            if !(0.1..=3.0).contains(&value) {
                return Err(ConfigError::invalid(var, &value.to_string(), "must be within 0.1..=3.0"));
            }
        }

        let menu_language = match lookup("SENSE_QUIZ_MENU_LOCALE") {
            Some(value) => Language::from_locale(&value)
                .map_err(|err| ConfigError::invalid("SENSE_QUIZ_MENU_LOCALE", &value, err))?,
            None => defaults.menu_language,
        };

        let seed = match lookup("SENSE_QUIZ_SEED") {
            Some(value) => Some(
                value
                    .trim()
                    .parse()
                    .map_err(|err| ConfigError::invalid("SENSE_QUIZ_SEED", &value, err))?,
            ),
            None => None,
        };

        let tick = millis_or(&lookup, "SENSE_QUIZ_TICK_MS", defaults.tick)?;
        if tick.is_zero() {
            return Err(ConfigError::invalid("SENSE_QUIZ_TICK_MS", "0", "must be positive"));
        }

        Ok(Self {
            question_files,
            session_size,
            feedback_delay: millis_or(&lookup, "SENSE_QUIZ_FEEDBACK_DELAY_MS", defaults.feedback_delay)?,
            speak_delay: millis_or(&lookup, "SENSE_QUIZ_SPEAK_DELAY_MS", defaults.speak_delay)?,
            voice_rate,
            voice_pitch,
            menu_language,
            tick,
            seed,
            start_countdown: parse_or(&lookup, "SENSE_QUIZ_START_COUNTDOWN", defaults.start_countdown)?,
            time_low_seconds: parse_or(&lookup, "SENSE_QUIZ_TIME_LOW_SECONDS", defaults.time_low_seconds)?,
            skip_intro: parse_or(&lookup, "SENSE_QUIZ_SKIP_INTRO", defaults.skip_intro)?,
        })
    }

    /// The voice used for menus and announcements.
    pub fn menu_voice(&self) -> Voice {
        Voice::new(self.menu_language.locale(), self.voice_rate, self.voice_pitch)
    }

    /// The voice used to read a question written in `language`.
    pub fn question_voice(&self, language: Language) -> Voice {
        Voice::new(language.locale(), self.voice_rate, self.voice_pitch)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::invalid(var, &value, err)),
        None => Ok(default),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let millis = parse_or(lookup, var, default.as_millis() as u64)?;
    Ok(Duration::from_millis(millis))
}

/// "en-US=questions/en.json,es-ES=questions/es.json"
fn parse_question_files(value: &str) -> Result<Vec<(Language, PathBuf)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (locale, path) = entry.split_once('=').ok_or_else(|| {
                ConfigError::invalid("SENSE_QUIZ_QUESTIONS", entry, "expected locale=path")
            })?;
            let language = Language::from_locale(locale)
                .map_err(|err| ConfigError::invalid("SENSE_QUIZ_QUESTIONS", entry, err))?;
            Ok((language, PathBuf::from(path.trim())))
        })
        .collect()
}
