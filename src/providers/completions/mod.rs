mod gemini;

pub use gemini::GeminiCompletionModel;
