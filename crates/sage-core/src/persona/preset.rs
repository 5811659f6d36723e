//! Default persona presets.
//!
//! Instructions are kept short to limit prompt tokens on every request.

use super::model::{Persona, PersonaKey};

/// Returns the built-in expert personas in declaration order:
/// - **A**: Data Scientist
/// - **B**: Software Engineer
/// - **C**: Marketing Specialist
/// - **D**: Financial Analyst
pub fn get_default_presets() -> Vec<Persona> {
    vec![
        Persona::new(
            PersonaKey::A,
            "Data Scientist",
            concat!(
                "You are a data scientist, well versed in data analysis, machine learning ",
                "and statistics. Explain with data and statistical evidence."
            ),
        ),
        Persona::new(
            PersonaKey::B,
            "Software Engineer",
            concat!(
                "You are a software engineer, well versed in programming, system design ",
                "and architecture. Explain with code examples and concrete implementation ",
                "approaches."
            ),
        ),
        Persona::new(
            PersonaKey::C,
            "Marketing Specialist",
            concat!(
                "You are a marketing specialist, well versed in branding, digital marketing ",
                "and strategy. Propose practical measures that take market trends into account."
            ),
        ),
        Persona::new(
            PersonaKey::D,
            "Financial Analyst",
            concat!(
                "You are a financial analyst, well versed in financial analysis, investment ",
                "decisions and budget management. Explain with figures and financial ",
                "indicators, weighing risk against return."
            ),
        ),
    ]
}
