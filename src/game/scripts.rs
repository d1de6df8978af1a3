//! Everything the engine says.

use crate::game::phase::{CATEGORY_CHOICES, TIME_CHOICES};
use crate::quiz::Question;
use crate::speech::{Line, Script};

pub const TITLE: &str = "¡SENSE QUIZ!";
pub const PRESS_TO_START: &str = "Press anywhere to start.";
pub const CONFIRM_PROMPT: &str =
    "Are you sure? Press one time to confirm or press two times to choose again.";
pub const STARTING: &str = "Configuration is done! The quiz will start in...";
pub const NOW: &str = "¡Now!";
pub const FINISHED: &str = "You have finished the test! Let's see your results!";
pub const CLOSING: &str =
    "Thanks for playing! If you want to start again, press anywhere on the screen.";

pub fn welcome(session_size: usize) -> Script {
    Script::new(vec![
        Line::secs("\n\nWELCOME TO SENSE QUIZ. A VIDEOGAME MADE TO IMPROVE YOUR GENERAL KNOWLEDGE.", 0.5),
        Line::secs(format!("YOU WILL HAVE TO ANSWER {} QUESTIONS OF THE SELECTED CATEGORY, AND A SCORE WILL BE CALCULATED BASED ON THE PERCENTAGE OF CORRECT ANSWERS.", session_size), 1.4),
        Line::secs("CONTROLS ARE PRETTY BASIC. WHEN YOU HAVE TO CHOOSE SOMETHING, A NUMBER IS INDICATED BEFORE, SO YOU JUST HAVE TO TOUCH ANYWHERE IN THE SCREEN AS MANY TIMES AS THE NUMBER INDICATES.", 0.5),
        Line::secs("FOR EXAMPLE, IF YOU HAVE 4 AVAILABLE ANSWERS, AND YOU WANT TO CHOOSE THE LAST ONE, YOU WILL HAVE TO TOUCH THE SCREEN 4 TIMES.", 1.4),
        Line::secs("NOW THAT WE KNOW HOW IT WORKS, PRESS ANYWHERE ON THE SCREEN TO START THE GAME. \n\nGOOD LUCK!", 0.0),
    ])
}

pub fn choose_category() -> Script {
    let mut lines = vec![
        Line::secs("\n\n¡Lets configure our game!", 1.0),
        Line::secs("Please, select one of the following categories.\n", 1.4),
    ];
    lines.extend(
        CATEGORY_CHOICES
            .iter()
            .enumerate()
            .map(|(index, category)| Line::secs(format!("{}. {}.", index + 1, category), 0.8)),
    );
    Script::new(lines)
}

pub fn choose_time() -> Script {
    let mut lines = vec![Line::secs(
        "\n\nNow, you will choose how many time you will have to answer each question.\n",
        1.4,
    )];
    lines.extend(
        TIME_CHOICES
            .iter()
            .enumerate()
            .map(|(index, seconds)| Line::secs(format!("{}. {} Seconds.", index + 1, seconds), 0.8)),
    );
    Script::new(lines)
}

pub fn category_selected(category: impl std::fmt::Display) -> String {
    format!("Your quiz will consist of {} questions.", category)
}

pub fn time_selected(seconds: u32) -> String {
    format!("You will have {} seconds to answer each question.", seconds)
}

pub fn header(number: usize, remaining: u32) -> String {
    format!("Question {} - Remaining Time: {}", number, remaining)
}

/// The statement, then each answer as its letter, a short pause and the text.
pub fn question(question: &Question) -> Script {
    let mut lines = vec![Line::secs(question.statement(), 0.0)];
    for (index, answer) in question.answers().iter().enumerate() {
        lines.push(Line::secs(Question::answer_letter(index).to_string(), 0.8));
        lines.push(Line::secs(answer.as_str(), 0.0));
    }
    Script::new(lines)
}
