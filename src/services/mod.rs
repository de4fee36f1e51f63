// 服务模块
// 提供核心业务逻辑服务

pub mod dedup;
pub mod engine;
pub mod generator;
pub mod grader;
pub mod llama;
pub mod parser;
pub mod prompt;

pub use dedup::{cosine_similarity, deduplicate, SIMILARITY_THRESHOLD};
pub use engine::QuizEngine;
pub use generator::QuestionGenerator;
pub use grader::{AnswerGrader, CORRECTNESS_THRESHOLD};
pub use llama::{
    EmbeddingProvider,
    GenerativeModel,
    LlamaClient,
    LlamaConfig,
    REQUEST_TIMEOUT,
};
pub use parser::parse_questions;
pub use prompt::QuizPrompt;
