use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use sage_core::consultation::{ConsultationRequest, ErrorKind};

use super::{Context, print_result, print_warning};

pub async fn run(
    context: &Context,
    persona_key: &str,
    question: &str,
    json: bool,
) -> Result<ExitCode> {
    let mut stdout = std::io::stdout();
    let answered = execute(context, persona_key, question, json, &mut stdout).await?;

    Ok(if answered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns whether an answer was produced.
///
/// Blank questions are refused here, before the service is involved.
async fn execute<W: Write>(
    context: &Context,
    persona_key: &str,
    question: &str,
    json: bool,
    out: &mut W,
) -> Result<bool> {
    let request = ConsultationRequest::new(persona_key, question);
    if request.is_blank() {
        print_warning(ErrorKind::EmptyQuery.user_message());
        return Ok(false);
    }

    let result = context
        .service
        .consult_request(&request, context.credentials.as_deref())
        .await;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        let persona = context.service.catalog().lookup_str(persona_key);
        print_result(out, persona, &result)?;
    }

    Ok(result.is_success())
}
