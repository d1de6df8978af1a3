//! A voice-guided quiz driven entirely by tap counts.
//!
//! The host owns the clock and the devices. It builds an [`Engine`] with a
//! speaker, a feedback sink and a screen, then calls [`Engine::tick`] every
//! frame with the taps it saw and [`Engine::speech_finished`] whenever the
//! speaker is done with a line.

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod game;
pub mod quiz;
pub mod scheduler;
pub mod speech;

pub use config::Config;
pub use engine::Engine;
pub use game::{Backends, InputFrame, Snapshot};
pub use quiz::pool::QuestionPool;
pub use quiz::{Categories, Language, Question};
