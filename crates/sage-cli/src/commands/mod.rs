pub mod ask;
pub mod chat;
pub mod personas;

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use sage_core::config::ConsultationSettings;
use sage_core::consultation::ConsultationResult;
use sage_core::persona::Persona;
use sage_interaction::{ConsultationService, OpenAIChatClient};

/// Everything a command needs to run consultations.
pub struct Context {
    pub service: ConsultationService<OpenAIChatClient>,
    pub credentials: Option<String>,
}

impl Context {
    pub fn from_settings(settings: ConsultationSettings) -> Result<Self> {
        let client = OpenAIChatClient::from_settings(&settings)?;
        let service = ConsultationService::new(client).with_model(settings.model);

        Ok(Self {
            service,
            credentials: settings.credentials,
        })
    }

    pub async fn consult(&self, persona_key: &str, query: &str) -> ConsultationResult {
        self.service
            .consult(persona_key, query, self.credentials.as_deref())
            .await
    }
}

/// Writes a result the way both `ask` and `chat` show it.
///
/// Answers go to `out`; failures go to stderr.
pub fn print_result<W: Write>(
    out: &mut W,
    persona: Option<&Persona>,
    result: &ConsultationResult,
) -> io::Result<()> {
    match (result, persona) {
        (ConsultationResult::Success { text }, Some(persona)) => {
            writeln!(out, "{}", "─".repeat(60).dimmed())?;
            writeln!(out, "{}", format!("💬 Answer from {}", persona.name).bold())?;
            writeln!(out)?;
            writeln!(out, "{text}")?;
        }
        (ConsultationResult::Success { text }, None) => writeln!(out, "{text}")?,
        (ConsultationResult::Failure { .. }, _) => {
            eprintln!("{} {}", "Error:".red().bold(), result);
        }
    }
    Ok(())
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.yellow());
}
