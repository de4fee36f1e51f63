//! 引擎门面模块
//! 对外暴露出题与判分两个入口，内部无共享可变状态，可被并发调用

use crate::error::Result;
use crate::models::{GradingResult, Question};
use crate::services::generator::QuestionGenerator;
use crate::services::grader::AnswerGrader;
use crate::services::llama::{EmbeddingProvider, GenerativeModel};
use std::sync::Arc;

/// 出题判分引擎
pub struct QuizEngine {
    generator: QuestionGenerator,
    grader: AnswerGrader,
}

impl QuizEngine {
    pub fn new(model: Arc<dyn GenerativeModel>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            generator: QuestionGenerator::new(model.clone(), embedder),
            grader: AnswerGrader::new(model),
        }
    }

    /// 生成题目集合，结果数量可能少于请求值
    pub async fn generate_questions(
        &self,
        context: &str,
        num_questions: usize,
        question_type: &str,
        difficulty: &str,
    ) -> Result<Vec<Question>> {
        self.generator
            .generate(context, num_questions, question_type, difficulty)
            .await
    }

    /// 对单题的提交答案判分
    pub async fn grade_answer(
        &self,
        question: &Question,
        submitted_answer: &str,
    ) -> Result<GradingResult> {
        self.grader.grade(question, submitted_answer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, QuestionType};
    use async_trait::async_trait;

    struct FakeModel {
        response: String,
    }

    #[async_trait]
    impl GenerativeModel for FakeModel {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
            Ok(Some(self.response.clone()))
        }
    }

    struct ConstantEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    #[tokio::test]
    async fn test_engine_generates_then_grades() {
        let batch = r#"```json
[{"question": "地球绕太阳公转。", "type": "TrueFalse", "options": null,
  "difficulty": "Easy", "marks": 1, "hints": [],
  "explanation": "公转周期约一年", "correct_answer": "True"}]
```"#;
        let engine = QuizEngine::new(
            Arc::new(FakeModel {
                response: batch.to_string(),
            }),
            Arc::new(ConstantEmbedder),
        );

        let questions = engine
            .generate_questions("天文材料", 1, "TrueFalse", "Easy")
            .await
            .unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_type, QuestionType::TrueFalse);
        assert_eq!(questions[0].difficulty, Difficulty::Easy);

        let result = engine.grade_answer(&questions[0], "true").await.unwrap();
        assert!(result.is_correct);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.question_id, questions[0].id);
    }
}
