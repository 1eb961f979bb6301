//! Console decision source for `--interactive` runs

use banmal_core::{tags, Decision, DecisionRequest, DecisionSource, Error};
use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};
use std::sync::{Mutex, PoisonError};

/// A parsed menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    AcceptFinal,
    Keep,
    Custom,
    Delete,
    Skip,
}

/// Parse one line of operator input
///
/// A trailing `a` on a two-letter answer applies the choice to every later
/// occurrence (`ea`, `ka`, `ca`).
pub fn parse_choice(input: &str) -> Option<(Choice, bool)> {
    let input = input.trim().to_lowercase();
    let (choice, persist) = match input.strip_suffix('a') {
        Some(rest) if !rest.is_empty() => (rest, true),
        _ => (input.as_str(), false),
    };

    let choice = match choice {
        "e" => Choice::AcceptFinal,
        "k" => Choice::Keep,
        "c" => Choice::Custom,
        "d" => Choice::Delete,
        "s" => Choice::Skip,
        _ => return None,
    };
    Some((choice, persist))
}

/// Asks an operator on a terminal
///
/// Prompts go to `output` so that stdout stays free for results.
pub struct ConsoleDecisionSource<R, W> {
    io: Mutex<(R, W)>,
}

impl ConsoleDecisionSource<BufReader<Stdin>, Stderr> {
    /// Read answers from stdin, prompt on stderr
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsoleDecisionSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> banmal_core::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::DecisionSource(
            "input closed before a decision was made".into(),
        ));
    }
    Ok(line.trim().to_string())
}

fn write_context<W: Write>(output: &mut W, request: &DecisionRequest<'_>) -> io::Result<()> {
    let token = request.token;
    writeln!(output)?;
    writeln!(
        output,
        "[Interactive Check] Ambiguous token: '{}' ({}) confidence={:.4}",
        token.surface, token.tag, token.confidence
    )?;
    writeln!(output, "Sentence: \"{}\"", request.sentence)?;

    let context: Vec<String> = request
        .window
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let pair = format!("{}/{}", t.surface, t.tag);
            if i == request.window_index {
                format!("[{pair}]")
            } else {
                pair
            }
        })
        .collect();
    writeln!(output, "Context: ... {} ...", context.join(" "))?;
    if request.proposed_tag != token.tag {
        writeln!(output, "Automatic rules suggest: {}", request.proposed_tag)?;
    }
    Ok(())
}

fn write_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Options:")?;
    writeln!(output, "  [e] Change to {}", tags::FINAL_ENDING)?;
    writeln!(output, "  [k] Keep (don't change)")?;
    writeln!(output, "  [c] Custom tag")?;
    writeln!(output, "  [d] Delete clause")?;
    writeln!(output, "  [s] Skip (don't ask again for this token)")?;
    writeln!(output, "  Add 'a' to apply to all (e.g. 'ea', 'ka', 'ca')")?;
    write!(output, "Choice: ")?;
    output.flush()
}

impl<R, W> DecisionSource for ConsoleDecisionSource<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn decide(&self, request: &DecisionRequest<'_>) -> banmal_core::Result<Decision> {
        let mut guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *guard;

        write_context(output, request)?;
        loop {
            write_menu(output)?;
            let answer = read_answer(input)?;

            let Some((choice, persist)) = parse_choice(&answer) else {
                writeln!(output, "Invalid choice.")?;
                continue;
            };

            let decision = match choice {
                Choice::AcceptFinal => Decision::Retag {
                    tag: tags::FINAL_ENDING.to_string(),
                    persist,
                },
                Choice::Keep => Decision::Keep { persist },
                Choice::Delete => Decision::DeleteClause,
                Choice::Skip => Decision::Skip { persist: true },
                Choice::Custom => {
                    write!(output, "Enter new tag (e.g. JX, MAG): ")?;
                    output.flush()?;
                    let tag = read_answer(input)?.to_uppercase();
                    if tag.is_empty() {
                        writeln!(output, "Invalid tag.")?;
                        continue;
                    }
                    Decision::Retag { tag, persist }
                }
            };
            return Ok(decision);
        }
    }
}
