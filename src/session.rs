use crate::clock::{Clock, SystemClock};
use crate::dictionary::{DictionaryChecker, DictionaryError, WordValidity};
use crate::evaluate::{evaluate, AttemptFeedback, LetterScore};
use crate::hints::{HintError, HintLedger};
use crate::timer::{RoundTimer, TimerState, ROUND_SECONDS};
use crate::words::{Difficulty, WordBank, WordError, ROUNDS_PER_SESSION};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Attempts allowed per round.
pub const MAX_ATTEMPTS: usize = 6;

/// Placeholder letter recorded for an attempt lost to the clock.
pub const MISS_MARKER: char = '-';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("expected a {expected}-letter word, got {got} letters")]
    LengthMismatch { expected: usize, got: usize },

    #[error("\"{0}\" is not in the dictionary")]
    InvalidWord(String),

    #[error("couldn't check the word: {0}")]
    DictionaryUnavailable(String),

    #[error("the game is paused")]
    SessionPaused,

    #[error("still checking the previous guess")]
    CheckPending,

    #[error("no round is in progress")]
    NotPlaying,
}

/// Where the session is in its life.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    /// A non-final round ended; the driver acknowledges with
    /// [`GameSession::advance_round`].
    RoundOver { won: bool },
    Finished { won: bool },
}

/// One recorded guess and its per-letter feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub word: String,
    pub feedback: AttemptFeedback,
}

/// Token for an in-flight dictionary check. The generation tag lets the
/// session discard a verdict that arrives after its round is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    pub generation: u64,
    pub word: String,
}

/// What an accepted (or discarded) submission did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Attempt recorded, round continues with a fresh timer.
    Continue { feedback: AttemptFeedback },
    /// Round won; check [`GameSession::phase`] for whether the game ended.
    RoundWon {
        awarded: u32,
        feedback: AttemptFeedback,
    },
    /// Attempts exhausted; check [`GameSession::phase`] as above.
    RoundLost { feedback: AttemptFeedback },
    /// The verdict belonged to an abandoned round and was discarded.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round clock ran out; a miss was recorded and the round is over.
    RoundTimedOut,
}

/// The whole game: round/word sequencing, attempt bookkeeping, score,
/// hint and timer lifecycle. All mutation happens through the methods
/// below, driven by one event loop at a time.
pub struct GameSession {
    bank: WordBank,
    clock: Rc<dyn Clock>,
    round_budget: Duration,
    phase: Phase,
    difficulty: Option<Difficulty>,
    words: Vec<String>,
    round: usize,
    attempts: Vec<Attempt>,
    timer: RoundTimer,
    hints: HintLedger,
    score: u32,
    rounds_won: u32,
    paused: bool,
    pending: Option<PendingCheck>,
    generation: u64,
}

impl GameSession {
    pub fn new(bank: WordBank) -> Self {
        Self::with_clock(bank, Rc::new(SystemClock))
    }

    pub fn with_clock(bank: WordBank, clock: Rc<dyn Clock>) -> Self {
        Self {
            bank,
            clock,
            round_budget: Duration::from_secs(ROUND_SECONDS),
            phase: Phase::NotStarted,
            difficulty: None,
            words: Vec::new(),
            round: 0,
            attempts: Vec::new(),
            timer: RoundTimer::new(),
            hints: HintLedger::new(),
            score: 0,
            rounds_won: 0,
            paused: false,
            pending: None,
            generation: 0,
        }
    }

    /// Override the per-attempt clock budget. Takes effect at the next
    /// round start.
    pub fn set_round_seconds(&mut self, secs: u64) {
        self.round_budget = Duration::from_secs(secs);
    }

    /// Draw a fresh five-word sequence and begin round one.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<(), WordError> {
        let words = self.bank.draw_sequence(difficulty)?;
        info!("session started at {difficulty} difficulty");

        self.difficulty = Some(difficulty);
        self.words = words;
        self.round = 0;
        self.attempts.clear();
        self.score = 0;
        self.rounds_won = 0;
        self.paused = false;
        self.pending = None;
        self.generation += 1;
        self.hints.clear();
        self.hints.begin_round(0, &self.words[0]);
        self.timer = RoundTimer::with_budget(self.round_budget);
        self.timer.start(self.clock.now());
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Discard everything and return to the initial state. The next
    /// `start` draws a brand-new word sequence.
    pub fn reset(&mut self) {
        self.phase = Phase::NotStarted;
        self.difficulty = None;
        self.words.clear();
        self.round = 0;
        self.attempts.clear();
        self.score = 0;
        self.rounds_won = 0;
        self.paused = false;
        self.pending = None;
        self.generation += 1;
        self.hints.clear();
        self.timer.reset();
    }

    /// First stage of a submission: everything that can be decided without
    /// the dictionary. On success the returned token must be resolved with
    /// [`resolve_check`](Self::resolve_check) before the attempt exists.
    pub fn submit(&mut self, guess: &str) -> Result<PendingCheck, GuessError> {
        if self.phase != Phase::Playing {
            return Err(GuessError::NotPlaying);
        }
        if self.paused {
            return Err(GuessError::SessionPaused);
        }
        if self.pending.is_some() {
            return Err(GuessError::CheckPending);
        }

        let word = guess.trim().to_lowercase();
        let expected = self.current_length();
        let got = word.chars().count();
        if got != expected {
            return Err(GuessError::LengthMismatch { expected, got });
        }

        let check = PendingCheck {
            generation: self.generation,
            word,
        };
        self.pending = Some(check.clone());
        Ok(check)
    }

    /// Second stage of a submission: apply the dictionary verdict. A
    /// verdict whose generation no longer matches belongs to an abandoned
    /// round and is discarded without touching any state.
    pub fn resolve_check(
        &mut self,
        generation: u64,
        verdict: Result<WordValidity, DictionaryError>,
    ) -> Result<SubmitOutcome, GuessError> {
        let stale = self
            .pending
            .as_ref()
            .map_or(true, |p| p.generation != generation);
        if stale {
            warn!("discarding stale dictionary verdict (generation {generation})");
            return Ok(SubmitOutcome::Stale);
        }

        let word = self.pending.take().map(|p| p.word).unwrap_or_default();
        match verdict {
            Err(DictionaryError::Unavailable(reason)) => {
                Err(GuessError::DictionaryUnavailable(reason))
            }
            Ok(WordValidity::Invalid) => Err(GuessError::InvalidWord(word)),
            Ok(WordValidity::Valid) => Ok(self.apply_guess(word)),
        }
    }

    /// Both submission stages in one call, for synchronous checkers.
    pub fn submit_checked(
        &mut self,
        guess: &str,
        checker: &dyn DictionaryChecker,
    ) -> Result<SubmitOutcome, GuessError> {
        let check = self.submit(guess)?;
        let verdict = checker.check(&check.word);
        self.resolve_check(check.generation, verdict)
    }

    fn apply_guess(&mut self, word: String) -> SubmitOutcome {
        let target = self.words[self.round].clone();
        let feedback = evaluate(&target, &word);
        debug!(
            "attempt {} on round {}: {word}",
            self.attempts.len() + 1,
            self.round + 1
        );
        self.attempts.push(Attempt {
            word: word.clone(),
            feedback: feedback.clone(),
        });

        if word == target {
            let used = self.attempts.len();
            let awarded = ((MAX_ATTEMPTS - used + 1) as u32) * 100;
            self.score += awarded;
            self.rounds_won += 1;
            info!(
                "round {} won in {used} attempts for {awarded} points",
                self.round + 1
            );
            self.end_round(true);
            SubmitOutcome::RoundWon { awarded, feedback }
        } else if self.attempts.len() == MAX_ATTEMPTS {
            info!("round {} lost: attempts exhausted", self.round + 1);
            self.end_round(false);
            SubmitOutcome::RoundLost { feedback }
        } else {
            // a fresh 30 seconds for the next attempt
            self.timer.restart(self.clock.now());
            SubmitOutcome::Continue { feedback }
        }
    }

    fn end_round(&mut self, won: bool) {
        self.timer.stop();
        self.pending = None;
        self.generation += 1;
        if self.round == ROUNDS_PER_SESSION - 1 {
            // the session outcome mirrors the final round alone
            self.phase = Phase::Finished { won };
            info!("session finished: score {}", self.score);
        } else {
            self.phase = Phase::RoundOver { won };
        }
    }

    /// Move from `RoundOver` into the next round. No-op in any other phase.
    pub fn advance_round(&mut self) {
        if !matches!(self.phase, Phase::RoundOver { .. }) {
            return;
        }
        self.round += 1;
        self.attempts.clear();
        self.paused = false;
        self.hints.begin_round(self.round, &self.words[self.round]);
        self.timer = RoundTimer::with_budget(self.round_budget);
        self.timer.start(self.clock.now());
        self.phase = Phase::Playing;
        info!("round {} started", self.round + 1);
    }

    /// Drive the round clock. On expiry a synthetic all-absent miss is
    /// recorded and the round ends as a loss; one expiry, one transition.
    pub fn on_tick(&mut self) -> Option<TickOutcome> {
        if self.phase != Phase::Playing || self.paused {
            return None;
        }
        if !self.timer.poll(self.clock.now()) {
            return None;
        }

        let length = self.current_length();
        self.attempts.push(Attempt {
            word: MISS_MARKER.to_string().repeat(length),
            feedback: vec![LetterScore::Absent; length],
        });
        info!("round {} lost: time expired", self.round + 1);
        self.end_round(false);
        Some(TickOutcome::RoundTimedOut)
    }

    /// Reveal one unknown letter of the current word, spending this
    /// round's hint budget.
    pub fn request_hint(&mut self) -> Result<(usize, char), HintError> {
        if self.phase != Phase::Playing {
            return Err(HintError::NotPlaying);
        }
        if self.paused {
            return Err(HintError::SessionPaused);
        }
        let word = self.words[self.round].clone();
        let known = self.known_correct_positions();
        self.hints.grant(self.round, &word, &known)
    }

    /// Freeze the round clock. Guesses and hints are rejected until
    /// `resume`.
    pub fn pause(&mut self) {
        if self.phase == Phase::Playing && !self.paused {
            self.paused = true;
            self.timer.pause(self.clock.now());
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.timer.resume(self.clock.now());
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// 1-based round number for display.
    pub fn round_number(&self) -> usize {
        self.round + 1
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds_won(&self) -> u32 {
        self.rounds_won
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// The word being guessed, once a session has started.
    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.round).map(String::as_str)
    }

    fn current_length(&self) -> usize {
        self.current_word().map_or(0, |w| w.chars().count())
    }

    /// Hints left this round: one or zero.
    pub fn hints_remaining(&self) -> u8 {
        if self.phase == Phase::Playing && !self.hints.spent_in(self.round) {
            1
        } else {
            0
        }
    }

    /// Letters revealed by hints (or carried from the previous round),
    /// by position.
    pub fn hinted_positions(&self) -> HashMap<usize, char> {
        self.hints.revealed_in(self.round)
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining_secs(self.clock.now())
    }

    /// Elapsed fraction of the round clock, for progress displays.
    pub fn timer_progress(&self) -> f64 {
        self.timer.progress(self.clock.now())
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// Pre-filled letters for the next attempt row: the first letter is
    /// always shown, plus everything known from correct guesses and hints.
    pub fn attempt_template(&self) -> Vec<Option<char>> {
        let Some(word) = self.current_word() else {
            return Vec::new();
        };
        let chars: Vec<char> = word.chars().collect();
        let mut template = vec![None; chars.len()];
        template[0] = Some(chars[0]);
        for pos in self.known_correct_positions() {
            template[pos] = Some(chars[pos]);
        }
        for (pos, letter) in self.hints.revealed_in(self.round) {
            if pos < template.len() {
                template[pos] = Some(letter);
            }
        }
        template
    }

    fn known_correct_positions(&self) -> HashSet<usize> {
        self.attempts
            .iter()
            .flat_map(|attempt| {
                attempt
                    .feedback
                    .iter()
                    .enumerate()
                    .filter(|(_, &score)| score == LetterScore::Correct)
                    .map(|(pos, _)| pos)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use assert_matches::assert_matches;
    use std::time::SystemTime;

    struct AlwaysValid;
    impl DictionaryChecker for AlwaysValid {
        fn check(&self, _word: &str) -> Result<WordValidity, DictionaryError> {
            Ok(WordValidity::Valid)
        }
    }

    struct RejectAll;
    impl DictionaryChecker for RejectAll {
        fn check(&self, _word: &str) -> Result<WordValidity, DictionaryError> {
            Ok(WordValidity::Invalid)
        }
    }

    struct Offline;
    impl DictionaryChecker for Offline {
        fn check(&self, _word: &str) -> Result<WordValidity, DictionaryError> {
            Err(DictionaryError::Unavailable("connection refused".into()))
        }
    }

    // singleton lists make the drawn sequence deterministic:
    // easy -> [house, house, garden, garden, bicycle]
    fn test_bank() -> WordBank {
        WordBank::from_json(
            r#"{
                "easy": {
                    "5_letters": ["house"],
                    "6_letters": ["garden"],
                    "7_letters": ["bicycle"]
                }
            }"#,
        )
        .unwrap()
    }

    fn test_session() -> (GameSession, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let mut session = GameSession::with_clock(test_bank(), Rc::clone(&clock) as Rc<dyn Clock>);
        session.start(Difficulty::Easy).unwrap();
        (session, clock)
    }

    fn wrong_guess(session: &GameSession) -> String {
        "z".repeat(session.current_word().unwrap().len())
    }

    fn lose_round(session: &mut GameSession) {
        for _ in 0..MAX_ATTEMPTS {
            let guess = wrong_guess(session);
            session.submit_checked(&guess, &AlwaysValid).unwrap();
        }
    }

    fn win_round(session: &mut GameSession) {
        let word = session.current_word().unwrap().to_string();
        session.submit_checked(&word, &AlwaysValid).unwrap();
    }

    #[test]
    fn start_draws_the_difficulty_sequence() {
        let (session, _clock) = test_session();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.round_number(), 1);
        assert_eq!(session.current_word(), Some("house"));
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining_seconds(), ROUND_SECONDS);
    }

    #[test]
    fn start_fails_without_word_data() {
        let bank = WordBank::from_json(r#"{"easy": {"5_letters": ["house"]}}"#).unwrap();
        let mut session = GameSession::new(bank);
        assert_matches!(
            session.start(Difficulty::Easy),
            Err(WordError::DataUnavailable { .. })
        );
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn length_mismatch_is_rejected_without_state_change() {
        let (mut session, clock) = test_session();
        clock.advance(Duration::from_secs(10));
        assert_matches!(
            session.submit("hovercraft"),
            Err(GuessError::LengthMismatch {
                expected: 5,
                got: 10
            })
        );
        assert!(session.attempts().is_empty());
        // the round clock must not have been reset
        assert_eq!(session.remaining_seconds(), 20);
    }

    #[test]
    fn invalid_word_is_rejected_without_state_change() {
        let (mut session, clock) = test_session();
        clock.advance(Duration::from_secs(10));
        assert_matches!(
            session.submit_checked("zzzzz", &RejectAll),
            Err(GuessError::InvalidWord(w)) if w == "zzzzz"
        );
        assert!(session.attempts().is_empty());
        assert_eq!(session.remaining_seconds(), 20);
    }

    #[test]
    fn dictionary_failure_is_distinct_from_invalid() {
        let (mut session, _clock) = test_session();
        assert_matches!(
            session.submit_checked("zzzzz", &Offline),
            Err(GuessError::DictionaryUnavailable(_))
        );
        assert!(session.attempts().is_empty());
        // the rejection clears the pending slot so the player can retry
        assert!(session.submit("zzzzz").is_ok());
    }

    #[test]
    fn first_try_win_scores_six_hundred() {
        let (mut session, _clock) = test_session();
        let outcome = session.submit_checked("house", &AlwaysValid).unwrap();
        assert_matches!(outcome, SubmitOutcome::RoundWon { awarded: 600, .. });
        assert_eq!(session.score(), 600);
        assert_eq!(session.phase(), Phase::RoundOver { won: true });
    }

    #[test]
    fn third_try_win_scores_four_hundred() {
        let (mut session, _clock) = test_session();
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        let outcome = session.submit_checked("house", &AlwaysValid).unwrap();
        assert_matches!(outcome, SubmitOutcome::RoundWon { awarded: 400, .. });
    }

    #[test]
    fn sixth_try_win_scores_one_hundred() {
        let (mut session, _clock) = test_session();
        for _ in 0..5 {
            session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        }
        let outcome = session.submit_checked("house", &AlwaysValid).unwrap();
        assert_matches!(outcome, SubmitOutcome::RoundWon { awarded: 100, .. });
        assert_eq!(session.phase(), Phase::RoundOver { won: true });
    }

    #[test]
    fn exhausting_attempts_loses_the_round_without_score() {
        let (mut session, _clock) = test_session();
        for _ in 0..5 {
            session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        }
        let outcome = session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        assert_matches!(outcome, SubmitOutcome::RoundLost { .. });
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::RoundOver { won: false });
    }

    #[test]
    fn accepted_guess_restarts_the_round_clock() {
        let (mut session, clock) = test_session();
        clock.advance(Duration::from_secs(25));
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        assert_eq!(session.remaining_seconds(), ROUND_SECONDS);
    }

    #[test]
    fn timeout_records_a_synthetic_miss_and_ends_the_round() {
        let (mut session, clock) = test_session();
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();
        session.submit_checked("zzzzz", &AlwaysValid).unwrap();

        clock.advance(Duration::from_secs(ROUND_SECONDS));
        assert_eq!(session.on_tick(), Some(TickOutcome::RoundTimedOut));

        assert_eq!(session.attempts().len(), 4);
        let miss = session.attempts().last().unwrap();
        assert_eq!(miss.word, "-----");
        assert!(miss.feedback.iter().all(|&s| s == LetterScore::Absent));
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::RoundOver { won: false });

        session.advance_round();
        assert_eq!(session.round_number(), 2);
        assert!(session.attempts().is_empty());
    }

    #[test]
    fn tick_before_expiry_does_nothing() {
        let (mut session, clock) = test_session();
        clock.advance(Duration::from_secs(ROUND_SECONDS - 1));
        assert_eq!(session.on_tick(), None);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn paused_session_rejects_guesses_and_hints() {
        let (mut session, clock) = test_session();
        clock.advance(Duration::from_secs(18));
        session.pause();
        assert_matches!(session.submit("house"), Err(GuessError::SessionPaused));
        assert_matches!(session.request_hint(), Err(HintError::SessionPaused));
        // time stands still while paused, even across a long delay
        clock.advance(Duration::from_secs(1000));
        assert_eq!(session.on_tick(), None);
        assert_eq!(session.remaining_seconds(), 12);

        session.resume();
        assert_eq!(session.remaining_seconds(), 12);
        clock.advance(Duration::from_secs(5));
        assert_eq!(session.remaining_seconds(), 7);
    }

    #[test]
    fn second_submission_while_check_pending_is_rejected() {
        let (mut session, _clock) = test_session();
        let check = session.submit("house").unwrap();
        assert_matches!(session.submit("house"), Err(GuessError::CheckPending));
        // resolving the first unblocks submissions
        session
            .resolve_check(check.generation, Ok(WordValidity::Valid))
            .unwrap();
    }

    #[test]
    fn stale_verdict_from_an_abandoned_round_is_discarded() {
        let (mut session, clock) = test_session();
        let check = session.submit("house").unwrap();

        // the round times out while the check is in flight
        clock.advance(Duration::from_secs(ROUND_SECONDS));
        assert_eq!(session.on_tick(), Some(TickOutcome::RoundTimedOut));
        session.advance_round();
        let attempts_before = session.attempts().len();

        let outcome = session
            .resolve_check(check.generation, Ok(WordValidity::Valid))
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Stale);
        assert_eq!(session.attempts().len(), attempts_before);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn verdict_after_reset_is_discarded() {
        let (mut session, _clock) = test_session();
        let check = session.submit("house").unwrap();
        session.reset();
        let outcome = session
            .resolve_check(check.generation, Ok(WordValidity::Valid))
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Stale);
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn score_accumulates_and_never_decreases() {
        let (mut session, _clock) = test_session();
        win_round(&mut session); // 600
        session.advance_round();
        let mut last = session.score();
        lose_round(&mut session);
        assert!(session.score() >= last);
        last = session.score();
        session.advance_round();
        win_round(&mut session); // garden, first try
        assert!(session.score() >= last);
        assert_eq!(session.score(), 1200);
    }

    #[test]
    fn session_is_won_only_by_the_final_round() {
        // lose rounds 1-4, win round 5: reported won
        let (mut session, _clock) = test_session();
        for _ in 0..4 {
            lose_round(&mut session);
            session.advance_round();
        }
        win_round(&mut session);
        assert_eq!(session.phase(), Phase::Finished { won: true });
        assert_eq!(session.rounds_won(), 1);

        // win rounds 1-4, lose round 5: reported lost
        let (mut session, _clock) = test_session();
        for _ in 0..4 {
            win_round(&mut session);
            session.advance_round();
        }
        lose_round(&mut session);
        assert_eq!(session.phase(), Phase::Finished { won: false });
        assert_eq!(session.rounds_won(), 4);
    }

    #[test]
    fn submission_after_round_over_is_rejected() {
        let (mut session, _clock) = test_session();
        win_round(&mut session);
        assert_matches!(session.submit("house"), Err(GuessError::NotPlaying));
    }

    #[test]
    fn hint_budget_is_one_per_round() {
        let (mut session, _clock) = test_session();
        assert_eq!(session.hints_remaining(), 1);
        let (pos, letter) = session.request_hint().unwrap();
        assert!((1..5).contains(&pos));
        assert_eq!("house".chars().nth(pos), Some(letter));
        assert_eq!(session.hints_remaining(), 0);
        assert_matches!(session.request_hint(), Err(HintError::HintExhausted));
    }

    #[test]
    fn template_prefills_first_letter_and_known_positions() {
        let (mut session, _clock) = test_session();
        assert_eq!(session.attempt_template()[0], Some('h'));
        assert!(session.attempt_template()[1..].iter().all(Option::is_none));

        // "horse" vs "house": h, o, s, e correct; u unknown
        session.submit_checked("horse", &AlwaysValid).unwrap();
        let template = session.attempt_template();
        assert_eq!(template[0], Some('h'));
        assert_eq!(template[1], Some('o'));
        assert_eq!(template[2], None);
        assert_eq!(template[3], Some('s'));
        assert_eq!(template[4], Some('e'));
    }

    #[test]
    fn hinted_letter_appears_in_the_template() {
        let (mut session, _clock) = test_session();
        let (pos, letter) = session.request_hint().unwrap();
        assert_eq!(session.attempt_template()[pos], Some(letter));
        assert_eq!(session.hinted_positions().get(&pos), Some(&letter));
    }

    #[test]
    fn reset_returns_to_not_started() {
        let (mut session, _clock) = test_session();
        win_round(&mut session);
        session.reset();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.score(), 0);
        assert_eq!(session.attempts().len(), 0);
        assert_eq!(session.current_word(), None);
        assert_matches!(session.submit("house"), Err(GuessError::NotPlaying));
    }

    #[test]
    fn advance_round_outside_round_over_is_a_no_op() {
        let (mut session, _clock) = test_session();
        session.advance_round();
        assert_eq!(session.round_number(), 1);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn custom_round_budget_applies_from_start() {
        let clock = Rc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
        let mut session = GameSession::with_clock(test_bank(), Rc::clone(&clock) as Rc<dyn Clock>);
        session.set_round_seconds(10);
        session.start(Difficulty::Easy).unwrap();
        assert_eq!(session.remaining_seconds(), 10);
        clock.advance(Duration::from_secs(10));
        assert_eq!(session.on_tick(), Some(TickOutcome::RoundTimedOut));
    }
}
