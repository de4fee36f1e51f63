//! 本地化 AI 出题判分引擎
//!
//! 输入一段学习材料，经 提示词构建 → 模型推理 → 输出解析 → 语义去重
//! 产出一组题目；判分按题型分支，简答题由模型辅助给出部分得分。
//! 题目与结果的持久化由调用方负责，引擎本身不落库。

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{EngineError, Result};
pub use models::{Difficulty, GradingResult, Question, QuestionType};
pub use services::{AnswerGrader, QuestionGenerator, QuizEngine};
