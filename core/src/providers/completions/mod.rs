mod groq;

pub use groq::GroqCompletionModel;
