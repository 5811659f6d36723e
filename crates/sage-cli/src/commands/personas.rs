use colored::Colorize;
use sage_core::persona::{Persona, PersonaCatalog};

/// Characters of the instruction shown next to each persona.
const SUMMARY_CHARS: usize = 50;

pub fn list() {
    println!("{}", "👥 Experts".bold());
    for persona in PersonaCatalog::builtin().iter() {
        print_entry(persona);
    }
}

pub fn print_entry(persona: &Persona) {
    println!("{}", format!("{}. {}", persona.key, persona.name).bright_cyan());
    println!("   {}", persona.summary(SUMMARY_CHARS).dimmed());
}
