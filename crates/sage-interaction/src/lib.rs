//! Consultation service and the OpenAI chat backend.

pub mod consultation;
pub mod openai_chat_client;

pub use consultation::ConsultationService;
pub use openai_chat_client::OpenAIChatClient;
