use std::rc::Rc;
use std::time::{Duration, SystemTime};

use lingo::clock::{Clock, ManualClock};
use lingo::dictionary::{DictionaryChecker, DictionaryError, WordValidity};
use lingo::session::{GameSession, Phase, SubmitOutcome, TickOutcome, MAX_ATTEMPTS};
use lingo::words::{Difficulty, WordBank};

// Whole-game scenarios through the public session API.

struct AlwaysValid;
impl DictionaryChecker for AlwaysValid {
    fn check(&self, _word: &str) -> Result<WordValidity, DictionaryError> {
        Ok(WordValidity::Valid)
    }
}

// easy draws [house, house, garden, garden, bicycle]
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

fn started_session() -> (GameSession, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
    let mut session = GameSession::with_clock(test_bank(), Rc::clone(&clock) as Rc<dyn Clock>);
    session.start(Difficulty::Easy).unwrap();
    (session, clock)
}

fn wrong_guess(session: &GameSession) -> String {
    "z".repeat(session.current_word().unwrap().len())
}

#[test]
fn easy_session_scores_seven_hundred_and_is_reported_lost() {
    let (mut session, _clock) = started_session();

    // round 1: win on the first attempt -> 600
    let outcome = session.submit_checked("house", &AlwaysValid).unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::RoundWon { awarded: 600, .. }
    ));
    session.advance_round();

    // round 2: five misses, then the word on attempt six -> 100
    for _ in 0..5 {
        let guess = wrong_guess(&session);
        session.submit_checked(&guess, &AlwaysValid).unwrap();
    }
    let outcome = session.submit_checked("house", &AlwaysValid).unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::RoundWon { awarded: 100, .. }
    ));
    session.advance_round();

    // rounds 3-5: all six attempts miss, no points
    for round in 3..=5 {
        assert_eq!(session.round_number(), round);
        for _ in 0..MAX_ATTEMPTS {
            let guess = wrong_guess(&session);
            session.submit_checked(&guess, &AlwaysValid).unwrap();
        }
        if round < 5 {
            session.advance_round();
        }
    }

    assert_eq!(session.score(), 700);
    // the final round was lost, so the whole session reports lost
    assert_eq!(session.phase(), Phase::Finished { won: false });
    assert_eq!(session.rounds_won(), 2);
}

#[test]
fn word_lengths_follow_the_easy_sequence() {
    let (mut session, _clock) = started_session();
    let mut lengths = Vec::new();
    for round in 0..5 {
        lengths.push(session.current_word().unwrap().len());
        for _ in 0..MAX_ATTEMPTS {
            let guess = wrong_guess(&session);
            session.submit_checked(&guess, &AlwaysValid).unwrap();
        }
        if round < 4 {
            session.advance_round();
        }
    }
    assert_eq!(lengths, vec![5, 5, 6, 6, 7]);
}

#[test]
fn hint_carries_into_the_next_round_when_letters_coincide() {
    let (mut session, _clock) = started_session();

    // rounds one and two share the word "house", so any hint carries
    let (pos, letter) = session.request_hint().unwrap();

    for _ in 0..MAX_ATTEMPTS {
        let guess = wrong_guess(&session);
        session.submit_checked(&guess, &AlwaysValid).unwrap();
    }
    session.advance_round();

    assert_eq!(session.round_number(), 2);
    assert_eq!(session.hinted_positions().get(&pos), Some(&letter));
    // the carried letter is free: this round's budget is untouched
    assert_eq!(session.hints_remaining(), 1);
}

#[test]
fn pause_holds_the_countdown_across_a_long_break() {
    let (mut session, clock) = started_session();

    clock.advance(Duration::from_secs(18));
    session.pause();
    clock.advance(Duration::from_secs(3600));
    session.resume();

    assert_eq!(session.remaining_seconds(), 12);
    assert_eq!(session.on_tick(), None);

    clock.advance(Duration::from_secs(12));
    assert_eq!(session.on_tick(), Some(TickOutcome::RoundTimedOut));
}

#[test]
fn timeout_on_a_middle_round_moves_the_game_along() {
    let (mut session, clock) = started_session();

    // three real attempts, then the clock runs out
    for _ in 0..3 {
        let guess = wrong_guess(&session);
        session.submit_checked(&guess, &AlwaysValid).unwrap();
    }
    let score_before = session.score();

    clock.advance(Duration::from_secs(30));
    assert_eq!(session.on_tick(), Some(TickOutcome::RoundTimedOut));
    assert_eq!(session.attempts().len(), 4);
    assert_eq!(session.score(), score_before);

    session.advance_round();
    assert_eq!(session.round_number(), 2);
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn fresh_start_after_reset_draws_a_new_game() {
    let (mut session, _clock) = started_session();
    session.submit_checked("house", &AlwaysValid).unwrap();
    assert_eq!(session.score(), 600);

    session.reset();
    assert_eq!(session.phase(), Phase::NotStarted);

    session.start(Difficulty::Easy).unwrap();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.score(), 0);
    assert_eq!(session.round_number(), 1);
    assert_eq!(session.hints_remaining(), 1);
}
