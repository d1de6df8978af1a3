mod support;

use sense_quiz::feedback::{FeedbackKind, TextSlot};
use sense_quiz::game::phase::{Phase, QuizStep, SetupStep, WelcomeStep};
use sense_quiz::quiz::score::ScoreBand;
use sense_quiz::{Categories, Config, InputFrame, Language, QuestionPool};

use support::{art_pool, question, test_config, Harness};

fn capital_pool() -> QuestionPool {
    let mut pool = QuestionPool::new();
    pool.register(
        question("Capital of France?", &["Rome", "Madrid", "Paris", "Berlin"], 2),
        Language::BritishEnglish,
        Categories::ART,
    );
    pool
}

/// Plays a whole quiz of Art questions, tapping `taps(n)` for question `n`.
fn play(session: usize, taps: impl Fn(usize) -> u32) -> Harness {
    let mut game = Harness::new(test_config(session), art_pool(session));
    game.setup_art_ten_seconds();
    for n in 0..session {
        game.wait_for_answer_window();
        game.step(InputFrame::taps(taps(n)));
    }
    game.run_until(|snapshot| snapshot.phase == Phase::Results && snapshot.listening);
    game
}

#[test]
fn welcome_screens_lead_to_the_category_menu() {
    let config = Config {
        skip_intro: false,
        ..test_config(4)
    };
    let mut game = Harness::new(config, art_pool(3));
    assert_eq!(game.phase(), Phase::Welcome(WelcomeStep::Title));

    game.tap(1);
    assert_eq!(game.phase(), Phase::Welcome(WelcomeStep::Briefing));
    assert!(game
        .text(TextSlot::Monologue)
        .unwrap()
        .contains("ANSWER 4 QUESTIONS"));
    game.tap(3);
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseCategory));
    assert_eq!(game.cue_count(FeedbackKind::Start), 1);
}

#[test]
fn taps_before_the_menu_is_read_are_ignored() {
    let mut game = Harness::new(test_config(10), art_pool(3));
    assert!(!game.snapshot().listening);

    game.step(InputFrame::taps(4));
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseCategory));

    game.tap(4);
    assert_eq!(
        game.phase(),
        Phase::Setup(SetupStep::ConfirmCategory(Categories::HISTORY))
    );
}

#[test]
fn setup_confirms_and_rejects_choices() {
    let mut game = Harness::new(test_config(10), art_pool(3));

    game.tap(4);
    game.tap(2);
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseCategory));
    assert_eq!(game.cue_count(FeedbackKind::Cancel), 1);

    game.tap(1);
    assert_eq!(
        game.phase(),
        Phase::Setup(SetupStep::ConfirmCategory(Categories::ART))
    );
    game.tap(1);
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseTime));

    game.tap(3);
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ConfirmTime(20)));
    game.tap(1);
    assert_eq!(game.phase(), Phase::Quiz(QuizStep::Starting));

    let snapshot = game.snapshot();
    assert_eq!(snapshot.categories, Categories::ART);
    assert_eq!(snapshot.answer_seconds, 20);
}

#[test]
fn starting_counts_down_before_the_first_question() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    let spoken = game.speech.texts();
    let three = spoken.iter().position(|t| t == "3").unwrap();
    let one = spoken.iter().position(|t| t == "1").unwrap();
    let now = spoken.iter().position(|t| t == "¡Now!").unwrap();
    let statement = spoken.iter().position(|t| t == "Capital of France?").unwrap();
    assert!(three < one && one < now && now < statement);
}

#[test]
fn question_is_shown_and_read_with_lettered_answers() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    assert_eq!(
        game.text(TextSlot::Header).as_deref(),
        Some("Question 1 - Remaining Time: 10")
    );
    assert_eq!(game.text(TextSlot::Central).as_deref(), Some("Capital of France?"));
    assert_eq!(game.text(TextSlot::Answer(2)).as_deref(), Some("C) Paris"));

    let spoken = game.speech.texts();
    let start = spoken.iter().position(|t| t == "Capital of France?").unwrap();
    assert_eq!(
        &spoken[start..start + 5],
        &["Capital of France?", "A", "Rome", "B", "Madrid"]
    );
    assert_eq!(game.speech.spoken.borrow()[start].voice.locale, "en-GB");
}

#[test]
fn correct_tap_stops_the_countdown_and_scores() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    game.idle(20);
    assert_eq!(game.snapshot().remaining_seconds, Some(9));
    game.step(InputFrame::taps(3));

    let history = game.engine.controller().history().to_vec();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].choice, Some(2));
    assert!(history[0].correct);
    assert_eq!(game.snapshot().score, 1);
    assert_eq!(game.cue_count(FeedbackKind::Correct), 1);

    // the answer window is gone for good: no late timeout, no time-low cue
    game.idle(150);
    assert_eq!(game.engine.controller().history().len(), 1);
    assert_eq!(game.cue_count(FeedbackKind::TimeLow), 0);
    assert_eq!(game.cue_count(FeedbackKind::Incorrect), 0);
}

#[test]
fn silence_times_out_exactly_once() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    game.idle(100);
    assert!(matches!(
        game.phase(),
        Phase::Quiz(QuizStep::AwaitingAnswer { .. })
    ));
    assert_eq!(game.snapshot().remaining_seconds, Some(1));
    assert_eq!(game.cue_count(FeedbackKind::TimeLow), 5);
    assert_eq!(game.cue_count(FeedbackKind::ClockTick), 4);

    game.idle(1);
    let history = game.engine.controller().history().to_vec();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].choice, None);
    assert!(!history[0].correct);
    assert_eq!(game.phase(), Phase::Quiz(QuizStep::Evaluating));

    game.idle(300);
    assert_eq!(game.engine.controller().history().len(), 1);
    assert_eq!(game.cue_count(FeedbackKind::Incorrect), 1);
    assert_eq!(game.phase(), Phase::Results);
}

#[test]
fn tap_on_the_timeout_tick_wins() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    game.idle(100);
    game.step(InputFrame::taps(3));

    let history = game.engine.controller().history().to_vec();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].choice, Some(2));
    assert_eq!(game.snapshot().score, 1);
}

#[test]
fn touch_holds_the_clock_while_taps_are_counted() {
    let mut game = Harness::new(test_config(1), capital_pool());
    game.setup_art_ten_seconds();
    game.wait_for_answer_window();

    game.idle(50);
    game.step(InputFrame::touch());
    let held = game.snapshot().remaining_seconds;

    game.idle(200);
    assert!(matches!(
        game.phase(),
        Phase::Quiz(QuizStep::AwaitingAnswer { .. })
    ));
    assert_eq!(game.snapshot().remaining_seconds, held);
    assert!(game.engine.controller().history().is_empty());

    game.step(InputFrame::taps(1));
    let history = game.engine.controller().history().to_vec();
    assert_eq!(history[0].choice, Some(0));
    assert!(!history[0].correct);
}

#[test]
fn results_read_the_score_band() {
    for (score, band) in [
        (0, ScoreBand::NotPassed),
        (6, ScoreBand::CouldDoBetter),
        (10, ScoreBand::Amazing),
    ] {
        let game = play(10, |n| if n < score { 1 } else { 2 });

        let snapshot = game.snapshot();
        assert_eq!(snapshot.score as usize, score);
        assert_eq!(snapshot.asked, 10);

        let summary = game.text(TextSlot::Monologue).unwrap();
        assert!(summary.starts_with(&format!("Your score is {} points out of 10.", score)));
        assert!(summary.contains(band.message()), "{}", summary);

        let verdict = if band.passed() {
            FeedbackKind::Approved
        } else {
            FeedbackKind::NotApproved
        };
        assert_eq!(game.cue_count(verdict), 1);
    }
}

#[test]
fn every_question_is_asked_once() {
    let game = play(4, |_| 1);
    let mut statements = game
        .engine
        .controller()
        .history()
        .iter()
        .map(|record| record.statement.clone())
        .collect::<Vec<_>>();
    statements.sort();
    statements.dedup();
    assert_eq!(statements.len(), 4);
}

#[test]
fn results_tap_restarts_at_the_category_menu() {
    let mut game = play(2, |_| 1);
    assert_eq!(game.snapshot().score, 2);

    game.tap(1);
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseCategory));
    let snapshot = game.snapshot();
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.asked, 0);
    assert!(game.engine.controller().history().is_empty());

    game.wait_listening();
    assert_eq!(game.phase(), Phase::Setup(SetupStep::ChooseCategory));
}

#[test]
fn empty_category_goes_straight_to_results() {
    let mut game = Harness::new(test_config(10), art_pool(3));
    // sports has no questions
    game.tap(3);
    game.tap(1);
    game.tap(1);
    game.tap(1);

    game.run_until(|snapshot| snapshot.phase == Phase::Results && snapshot.listening);
    let snapshot = game.snapshot();
    assert_eq!(snapshot.session_size, 0);
    assert_eq!(snapshot.asked, 0);
    assert_eq!(
        game.text(TextSlot::Monologue).unwrap(),
        format!("Your score is 0 points out of 0. {}", ScoreBand::NotPassed.message())
    );
}

#[test]
fn losing_focus_repeats_the_interrupted_line() {
    let mut game = Harness::new(test_config(10), art_pool(3));
    while game.speech.spoken.borrow().is_empty() {
        game.idle(1);
    }
    // the first menu line is still being spoken
    let before = game.speech.spoken.borrow()[0].clone();

    game.engine.focus_changed(false);
    assert_eq!(*game.speech.stops.borrow(), 1);
    game.engine.focus_changed(true);

    let spoken = game.speech.spoken.borrow().clone();
    assert_eq!(spoken.len(), 2);
    assert_eq!(spoken[1], before);
}
