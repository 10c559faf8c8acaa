//! Line-oriented terminal driver for lessons and the placement test.

use std::io::{BufRead, Write};

use lesson_core::model::{PlacementAnswer, PlacementKind, PlacementTest, Speaker};
use lesson_core::sequencer::{PairOutcome, Step};
use services::{Encouragements, LessonOutcome, LessonSession};

type PlayResult<T> = Result<T, Box<dyn std::error::Error>>;

enum Input {
    Line(String),
    Quit,
}

fn read_input(input: &mut impl BufRead, out: &mut impl Write) -> PlayResult<Input> {
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim().to_string();
    if line == "q" {
        return Ok(Input::Quit);
    }
    Ok(Input::Line(line))
}

fn flush_messages(messages: &Encouragements, out: &mut impl Write) -> PlayResult<()> {
    for message in messages.drain() {
        writeln!(out, "  * {message}")?;
    }
    Ok(())
}

/// Drive `session` from `input` until the lesson is finished or the learner quits.
///
/// Returns `None` when the learner quits; nothing is recorded in that case.
pub async fn play_lesson(
    session: &mut LessonSession,
    messages: &Encouragements,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<Option<LessonOutcome>> {
    writeln!(out, "Lesson {} (q to quit)", session.lesson_id())?;

    while !session.is_complete() {
        let progress = session.sequencer().progress();
        let step = progress.step;
        if step != Step::Conversation {
            writeln!(
                out,
                "\n[phrase {}/{}] {step}",
                progress.phrase_index + 1,
                progress.phrase_count
            )?;
        }

        let keep_going = match step {
            Step::Conversation => conversation(session, input, out)?,
            Step::PhraseBreakdown => breakdown(session, input, out)?,
            Step::MultipleChoice1 | Step::MultipleChoice2 => multiple_choice(session, input, out)?,
            Step::SentenceBuilder => sentence_builder(session, input, out)?,
            Step::VocabMatch => vocab_match(session, input, out)?,
            Step::Completion => true,
        };
        flush_messages(messages, out)?;
        if !keep_going {
            writeln!(out, "Leaving the lesson. Progress was not saved.")?;
            return Ok(None);
        }
    }

    let outcome = session.complete().await?;
    flush_messages(messages, out)?;
    if outcome.credit.newly_completed {
        writeln!(
            out,
            "\n+{} XP (total {}), {} new words, streak {}",
            outcome.credit.xp_awarded,
            outcome.credit.total_xp,
            outcome.credit.new_words.len(),
            outcome.streak.streak
        )?;
    } else {
        writeln!(
            out,
            "\nLesson replayed. Total {} XP, streak {}",
            outcome.credit.total_xp, outcome.streak.streak
        )?;
    }
    Ok(Some(outcome))
}

fn conversation(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<bool> {
    writeln!(out, "(enter: next line, s: skip)")?;
    loop {
        let seq = session.sequencer_mut();
        if seq.all_lines_revealed() {
            seq.advance();
            return Ok(true);
        }
        let Input::Line(line) = read_input(input, out)? else {
            return Ok(false);
        };
        let seq = session.sequencer_mut();
        if line == "s" {
            seq.skip_conversation();
            seq.advance();
            return Ok(true);
        }
        if let Some(revealed) = seq.reveal_next_line() {
            let who = match revealed.speaker {
                Speaker::A => "A",
                Speaker::B => "B",
            };
            writeln!(out, "{who}: {}", revealed.text)?;
        }
    }
}

fn breakdown(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<bool> {
    if let Some(phrase) = session.sequencer().current_phrase() {
        writeln!(out, "{}", phrase.text())?;
        writeln!(out, "  = {}", phrase.translation())?;
        for entry in phrase.breakdown() {
            writeln!(out, "  {} : {}", entry.word, entry.meaning)?;
        }
    }
    writeln!(out, "(enter to continue)")?;
    if matches!(read_input(input, out)?, Input::Quit) {
        return Ok(false);
    }
    session.sequencer_mut().advance();
    Ok(true)
}

fn multiple_choice(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<bool> {
    let seq = session.sequencer();
    let Some(question) = seq
        .step()
        .question_index()
        .and_then(|i| seq.current_phrase()?.question(i))
    else {
        return Ok(false);
    };
    writeln!(out, "{}", question.prompt())?;
    for (i, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}) {option}", i + 1)?;
    }

    loop {
        let Input::Line(line) = read_input(input, out)? else {
            return Ok(false);
        };
        let Some(choice) = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            writeln!(out, "Enter an option number.")?;
            continue;
        };
        let seq = session.sequencer_mut();
        if seq.select_option(choice) {
            writeln!(out, "Correct!")?;
            seq.advance();
            return Ok(true);
        }
        seq.clear_selection();
        writeln!(out, "Not quite, try again.")?;
    }
}

fn sentence_builder(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<bool> {
    if let Some(phrase) = session.sequencer().current_phrase() {
        writeln!(out, "Build: {}", phrase.translation())?;
    }
    loop {
        writeln!(out, "Words: {}", session.word_bank().join(" | "))?;
        let Input::Line(line) = read_input(input, out)? else {
            return Ok(false);
        };

        let seq = session.sequencer_mut();
        while seq.pop_word().is_some() {}
        let mut missing = None;
        for word in line.split_whitespace() {
            if !seq.push_word(word) {
                missing = Some(word.to_string());
                break;
            }
        }
        if let Some(word) = missing {
            while seq.pop_word().is_some() {}
            writeln!(out, "'{word}' is not in the word bank.")?;
            continue;
        }

        match seq.submit_sentence() {
            Some(feedback) if feedback.correct => {
                writeln!(out, "Correct!")?;
                seq.advance();
                return Ok(true);
            }
            Some(feedback) => writeln!(out, "Not quite. Answer: {}", feedback.expected)?,
            None => writeln!(out, "Type the words in order.")?,
        }
    }
}

fn vocab_match(
    session: &mut LessonSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<bool> {
    if let Some(board) = session.vocab_board() {
        writeln!(out, "English:     {}", board.english.join(" | "))?;
        writeln!(out, "Translation: {}", board.translations.join(" | "))?;
    }
    writeln!(out, "(match as: english = translation)")?;

    loop {
        let Input::Line(line) = read_input(input, out)? else {
            return Ok(false);
        };
        let Some((english, translation)) = line.split_once('=') else {
            writeln!(out, "Use: english = translation")?;
            continue;
        };
        match session
            .sequencer_mut()
            .confirm_pair(english.trim(), translation.trim())
        {
            PairOutcome::Matched { transition } => {
                writeln!(out, "Matched!")?;
                if transition.is_some() {
                    return Ok(true);
                }
            }
            PairOutcome::AlreadyMatched => writeln!(out, "Already matched.")?,
            PairOutcome::Mismatch => writeln!(out, "Those don't go together.")?,
            PairOutcome::Pending | PairOutcome::Cleared => {}
            PairOutcome::NotInVocabStep => return Ok(true),
        }
    }
}

/// Ask every placement question. Returns `None` if the learner quits.
pub fn ask_placement(
    test: &PlacementTest,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> PlayResult<Option<Vec<PlacementAnswer>>> {
    let mut answers = Vec::with_capacity(test.len());
    for (index, question) in test.questions().iter().enumerate() {
        writeln!(out, "\nQuestion {}/{}: {}", index + 1, test.len(), question.prompt)?;
        if let Some(hint) = &question.hint {
            writeln!(out, "  ({hint})")?;
        }
        let answer = match &question.kind {
            PlacementKind::Choice { options, .. } => {
                for (i, option) in options.iter().enumerate() {
                    writeln!(out, "  {}) {option}", i + 1)?;
                }
                let Input::Line(line) = read_input(input, out)? else {
                    return Ok(None);
                };
                let choice = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .unwrap_or(usize::MAX);
                PlacementAnswer::Choice(choice)
            }
            PlacementKind::WordBank { words, .. } => {
                writeln!(out, "  Words: {}", words.join(" | "))?;
                let Input::Line(line) = read_input(input, out)? else {
                    return Ok(None);
                };
                PlacementAnswer::Words(line.split_whitespace().map(str::to_owned).collect())
            }
        };
        answers.push(answer);
    }
    Ok(Some(answers))
}
