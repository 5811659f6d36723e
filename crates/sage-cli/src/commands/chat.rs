//! Interactive session.
//!
//! Each line is a separate single-turn consultation; nothing from earlier
//! questions is sent with later ones.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context as LineContext, Editor, Helper};
use sage_core::SageError;
use sage_core::consultation::ErrorKind;
use sage_core::persona::Persona;

use super::{Context, personas, print_result, print_warning};

const COMMANDS: [&str; 5] = ["/persona", "/personas", "/help", "/quit", "/exit"];

/// A line starting with `/`.
#[derive(Debug, PartialEq, Eq)]
enum SlashCommand {
    Persona(Option<String>),
    Personas,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<SlashCommand> {
    let line = line.trim();
    if !line.starts_with('/') {
        return None;
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string);

    Some(match name {
        "/persona" => SlashCommand::Persona(arg),
        "/personas" => SlashCommand::Personas,
        "/help" => SlashCommand::Help,
        "/quit" | "/exit" => SlashCommand::Quit,
        other => SlashCommand::Unknown(other.to_string()),
    })
}

/// rustyline helper providing completion, highlighting and hints for slash commands.
struct CliHelper {
    commands: Vec<String>,
    persona_keys: Vec<String>,
}

impl CliHelper {
    fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
            persona_keys: keys.into_iter().map(str::to_string).collect(),
        }
    }

    /// Start offset and replacements for the text before the cursor.
    ///
    /// Command names complete while the first word is typed; persona keys
    /// complete after `/persona `.
    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        if line.starts_with('/') && !line.contains(' ') {
            let commands = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .cloned()
                .collect();
            return (0, commands);
        }

        if let Some(rest) = line.strip_prefix("/persona ") {
            let start = line.len() - rest.trim_start().len();
            let typed = &line[start..];
            let keys = self
                .persona_keys
                .iter()
                .filter(|key| key.to_lowercase().starts_with(&typed.to_lowercase()))
                .cloned()
                .collect();
            return (start, keys);
        }

        (0, vec![])
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &LineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &LineContext<'_>) -> Option<String> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let typed = &line[start..pos];

        candidates
            .into_iter()
            .find(|candidate| candidate.starts_with(typed) && candidate.len() > typed.len())
            .map(|candidate| candidate[typed.len()..].to_string())
    }
}

impl Validator for CliHelper {}

fn banner(model: &str) -> String {
    format!("🤖 Expert consultation ({model})")
}

fn print_help() {
    println!("{}", "Type a question and press Enter.".dimmed());
    println!("  {}  switch expert (A, B, C or D)", "/persona <KEY>".bright_cyan());
    println!("  {}        list experts", "/personas".bright_cyan());
    println!("  {}            show this help", "/help".bright_cyan());
    println!("  {}            leave", "/quit".bright_cyan());
}

pub async fn run(context: &Context, persona_key: &str) -> Result<ExitCode> {
    let catalog = context.service.catalog();
    let mut current: &Persona = catalog
        .lookup_str(persona_key)
        .ok_or_else(|| SageError::not_found("persona", persona_key))?;

    let mut editor: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    let keys = catalog.keys();
    editor.set_helper(Some(CliHelper::new(keys.iter().map(|key| key.as_ref()))));

    println!("{}", banner(context.service.model()).bold());
    print_help();

    loop {
        let prompt = format!("[{}] > ", current.label());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }

        match parse_command(&line) {
            Some(SlashCommand::Quit) => break,
            Some(SlashCommand::Help) => print_help(),
            Some(SlashCommand::Personas) => {
                for persona in catalog.iter() {
                    personas::print_entry(persona);
                }
            }
            Some(SlashCommand::Persona(None)) => {
                print_warning("Usage: /persona <KEY>");
            }
            Some(SlashCommand::Persona(Some(key))) => match catalog.lookup_str(&key) {
                Some(persona) => {
                    current = persona;
                    println!("{} {}", "Switched to".dimmed(), current.label().bold());
                }
                None => {
                    let err = SageError::not_found("persona", key);
                    eprintln!("{} {}", "Error:".red().bold(), err);
                }
            },
            Some(SlashCommand::Unknown(name)) => {
                print_warning(&format!("Unknown command {name}. Type /help."));
            }
            None if line.trim().is_empty() => {
                print_warning(ErrorKind::EmptyQuery.user_message());
            }
            None => {
                let result = context.consult(current.key.as_ref(), &line).await;
                print_result(&mut std::io::stdout(), Some(current), &result)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_command("What is regression?"), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_persona_command_with_and_without_argument() {
        assert_eq!(
            parse_command("/persona  c "),
            Some(SlashCommand::Persona(Some("c".to_string())))
        );
        assert_eq!(parse_command("/persona"), Some(SlashCommand::Persona(None)));
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse_command("/personas"), Some(SlashCommand::Personas));
        assert_eq!(parse_command(" /help"), Some(SlashCommand::Help));
        assert_eq!(parse_command("/exit"), Some(SlashCommand::Quit));
        assert_eq!(
            parse_command("/plan now"),
            Some(SlashCommand::Unknown("/plan".to_string()))
        );
    }

    fn helper() -> CliHelper {
        CliHelper::new(["A", "B", "C", "D"])
    }

    #[test]
    fn test_command_names_complete_from_the_start() {
        let (start, candidates) = helper().candidates("/pe");
        assert_eq!(start, 0);
        assert_eq!(candidates, vec!["/persona", "/personas"]);
    }

    #[test]
    fn test_persona_keys_complete_after_persona_command() {
        let (start, candidates) = helper().candidates("/persona ");
        assert_eq!(start, "/persona ".len());
        assert_eq!(candidates, vec!["A", "B", "C", "D"]);

        let (start, candidates) = helper().candidates("/persona  c");
        assert_eq!(start, "/persona  ".len());
        assert_eq!(candidates, vec!["C"]);
    }

    #[test]
    fn test_questions_have_no_completions() {
        assert_eq!(helper().candidates("What is /persona"), (0, vec![]));
        assert_eq!(helper().candidates("/personas "), (0, vec![]));
    }

    #[test]
    fn test_banner_names_the_model() {
        assert!(banner("gpt-4o-mini").contains("gpt-4o-mini"));
    }
}
