mod gemini;

pub use gemini::GeminiEmbeddingModel;
