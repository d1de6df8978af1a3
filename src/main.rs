use std::error::Error;
use std::mem;

use log::{info, warn};
use sense_quiz::console::{self, ConsoleFeedback, ConsoleScreen, ConsoleSpeaker, SpeechQueue};
use sense_quiz::quiz::source::JsonQuestionFile;
use sense_quiz::{Backends, Config, Engine, InputFrame, Language, QuestionPool};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, MissedTickBehavior};

const SAMPLE_QUESTIONS: &str = include_str!("../data/questions-en.json");

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let pool = load_pool(&config)?;

    let speech = SpeechQueue::new();
    let backends = Backends {
        speaker: Box::new(ConsoleSpeaker::new(speech.clone())),
        feedback: Box::new(ConsoleFeedback),
        screen: Box::new(ConsoleScreen::default()),
    };

    println!("Type dots or a number and press enter to tap, e.g. `...` or `3`.");
    let mut engine = Engine::new(config.clone(), pool, backends);
    engine.start();

    let started = Instant::now();
    let mut ticker = time::interval(config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = InputFrame::idle();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = started.elapsed();
                for utterance in speech.finished(now) {
                    engine.speech_finished(utterance);
                }
                engine.tick(now, mem::take(&mut pending));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, quitting");
                    break;
                };
                match console::parse_taps(&line) {
                    Some(frame) => pending = frame,
                    None => warn!("Not a tap gesture: {:?}", line),
                }
            }
        }
    }
    Ok(())
}

/// Loads every configured question file, or the bundled sample set when none
/// is configured.
fn load_pool(config: &Config) -> Result<QuestionPool, Box<dyn Error>> {
    let mut pool = QuestionPool::new();
    if config.question_files.is_empty() {
        info!("SENSE_QUIZ_QUESTIONS not set, using the bundled sample questions");
        pool.load(&JsonQuestionFile::new(
            "sample",
            Language::BritishEnglish,
            SAMPLE_QUESTIONS,
        ))?;
    }
    for (language, path) in &config.question_files {
        pool.load(&JsonQuestionFile::from_path(*language, path)?)?;
    }
    if pool.is_empty() {
        warn!("The question pool is empty, every quiz will end straight away");
    }
    Ok(pool)
}
