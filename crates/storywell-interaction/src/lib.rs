pub mod gemini_assistant;

pub use gemini_assistant::GeminiAssistant;
