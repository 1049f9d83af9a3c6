pub mod gemini;
pub mod openai;
pub mod schema;

pub use gemini::Gemini;
pub use openai::OpenAi;
pub use schema::StructuredOutput;
