//! Terminal rendering and interactive play.

use std::io::{BufRead, Write};

use quizgen_core::{Grammar, Quiz, QuizSession, ScoreReport};

/// Print every question, with the answer key when `with_answers` is set.
pub fn write_preview<W: Write>(out: &mut W, quiz: &Quiz, with_answers: bool) -> std::io::Result<()> {
    writeln!(out, "{}", quiz.label())?;
    for (i, question) in quiz.questions.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Q{}: {}", i + 1, question.question_text)?;
        for (letter, text) in &question.options {
            writeln!(out, "   {letter}) {text}")?;
        }
        if with_answers {
            let correct = question.correct_answer.as_deref().unwrap_or("(unknown)");
            writeln!(out, "   Answer: {correct}")?;
            writeln!(out, "   Hint: {}", question.hint)?;
            writeln!(out, "   Explanation: {}", question.explanation)?;
        }
    }
    Ok(())
}

/// Ask each question of the selected quiz, one answer per input line, then
/// submit. Blank lines leave a question unanswered.
pub fn play<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: R,
    out: &mut W,
) -> anyhow::Result<ScoreReport> {
    let Some(quiz) = session.current() else {
        anyhow::bail!("no quiz selected");
    };
    let grammar = Grammar::for_type(quiz.spec.question_type);
    let len = quiz.len();

    let mut lines = input.lines();
    for index in 0..len {
        write!(out, "Your answer to Q{}: ", index + 1)?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };
        if let Some(answer) = normalize_answer(grammar, &line) {
            session.answer(index, answer)?;
        }
    }

    Ok(session.submit()?)
}

/// Choice answers are read the same way the parser reads the answer key.
/// Anything that is not a recognizable letter is kept as typed.
fn normalize_answer(grammar: &Grammar, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(
        grammar
            .answer_letter(line)
            .unwrap_or_else(|| line.to_string()),
    )
}

pub fn write_score<W: Write>(out: &mut W, report: &ScoreReport) -> std::io::Result<()> {
    writeln!(out)?;
    for result in &report.results {
        let mark = if result.is_correct { "correct" } else { "wrong" };
        writeln!(
            out,
            "Q{}: {mark} (yours: {}, answer: {})",
            result.index + 1,
            result.given.as_deref().unwrap_or("-"),
            result.correct.as_deref().unwrap_or("(unknown)")
        )?;
    }
    writeln!(
        out,
        "Score: {}/{} ({:.1}%)",
        report.score, report.total, report.percentage
    )
}
