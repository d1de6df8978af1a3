/// Verdict read out at the end of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    NotPassed,
    CouldDoBetter,
    DidWell,
    Amazing,
}

/// Lowest score that passes.
pub const PASS_MARK: u32 = 5;

impl ScoreBand {
    /// 0-4 not passed, 5-6 passed, 7-9 did well, 10 and above amazing.
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=4 => ScoreBand::NotPassed,
            5..=6 => ScoreBand::CouldDoBetter,
            7..=9 => ScoreBand::DidWell,
            _ => ScoreBand::Amazing,
        }
    }

    pub fn passed(self) -> bool {
        self != ScoreBand::NotPassed
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::NotPassed => {
                "Sorry, but you haven't passed the test. For sure you will make it better next time!"
            }
            ScoreBand::CouldDoBetter => {
                "Congratulations! You passed the test. But you could always do it better!"
            }
            ScoreBand::DidWell => "Great! You did it pretty well! Keep working hard!",
            ScoreBand::Amazing => "You are amazing! Congratulations on this incredible mark!",
        }
    }
}

/// "Your score is 7 points out of 10. Great! ..."
pub fn summary(score: u32, total: usize) -> String {
    format!(
        "Your score is {} points out of {}. {}",
        score,
        total,
        ScoreBand::for_score(score).message()
    )
}
