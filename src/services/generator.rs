//! 出题编排模块
//! 串联提示词构建 → 模型推理 → 输出解析 → 语义去重

use crate::error::{EngineError, Result};
use crate::models::{Question, QuestionType};
use crate::services::dedup;
use crate::services::llama::{EmbeddingProvider, GenerativeModel};
use crate::services::parser;
use crate::services::prompt::QuizPrompt;
use log::info;
use std::sync::Arc;

/// 题目生成器
pub struct QuestionGenerator {
    model: Arc<dyn GenerativeModel>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl QuestionGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { model, embedder }
    }

    /// 基于材料生成一组题目
    ///
    /// 题型名在入口处归一化，未知题型报 `UnsupportedType`；
    /// 生成失败即终止，不自动重试。去重后返回数量可能少于请求值，
    /// 调用方需要容忍。
    pub async fn generate(
        &self,
        context: &str,
        num_questions: usize,
        question_type: &str,
        difficulty: &str,
    ) -> Result<Vec<Question>> {
        let canonical = QuestionType::parse(question_type)
            .ok_or_else(|| EngineError::UnsupportedType(question_type.to_string()))?;

        info!(
            "generating {} {} questions (difficulty: {})",
            num_questions,
            canonical.canonical_name(),
            difficulty
        );

        let prompt = QuizPrompt::generation(context, num_questions, canonical, difficulty);
        let response = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| EngineError::Generation(e.to_string()))?;
        let raw = match response {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(EngineError::Generation("no valid response".to_string())),
        };

        let candidates = parser::parse_questions(&raw, canonical)
            .map_err(|e| EngineError::Generation(e.to_string()))?;
        info!("parsed {} candidate questions", candidates.len());

        let questions =
            dedup::deduplicate(candidates, num_questions, self.embedder.as_ref()).await?;
        if questions.len() < num_questions {
            info!(
                "returning {} of {} requested questions after deduplication",
                questions.len(),
                num_questions
            );
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeModel {
        response: Option<String>,
    }

    #[async_trait]
    impl GenerativeModel for FakeModel {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
            Ok(self.response.clone())
        }
    }

    /// 按调用顺序返回互相正交的向量
    struct OrthogonalEmbedder {
        counter: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for OrthogonalEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            let index = self.counter.fetch_add(1, Ordering::SeqCst);
            let mut v = vec![0.0; 8];
            v[index % 8] = 1.0;
            Ok(v)
        }
    }

    struct ConstantEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Err(anyhow!("embedding server unreachable"))
        }
    }

    fn generator(response: Option<&str>, embedder: Arc<dyn EmbeddingProvider>) -> QuestionGenerator {
        QuestionGenerator::new(
            Arc::new(FakeModel {
                response: response.map(String::from),
            }),
            embedder,
        )
    }

    fn fenced_true_false_batch() -> String {
        r#"```json
[
  {"question": "水在标准大气压下 100 摄氏度沸腾。", "type": "TrueFalse",
   "options": null, "difficulty": "Easy", "marks": 1, "hints": [],
   "explanation": "标准大气压下水的沸点是 100 摄氏度", "correct_answer": "True"},
  {"question": "冰的密度大于液态水。", "type": "TrueFalse",
   "options": null, "difficulty": "Easy", "marks": 1, "hints": [],
   "explanation": "冰会浮在水面上", "correct_answer": "False"},
  {"question": "声音在真空中传播。", "type": "TrueFalse",
   "options": null, "difficulty": "Medium", "marks": 1, "hints": [],
   "explanation": "声音传播需要介质", "correct_answer": "False"}
]
```"#
            .to_string()
    }

    #[tokio::test]
    async fn test_generate_end_to_end() {
        let gen = generator(
            Some(&fenced_true_false_batch()),
            Arc::new(OrthogonalEmbedder {
                counter: AtomicUsize::new(0),
            }),
        );
        let questions = gen.generate("材料", 3, "true_false", "Easy").await.unwrap();

        assert_eq!(questions.len(), 3);
        assert!(questions
            .iter()
            .all(|q| q.question_type == QuestionType::TrueFalse));
        assert_eq!(questions[0].correct_answer, "True");
    }

    #[tokio::test]
    async fn test_generate_may_return_fewer_after_dedup() {
        let gen = generator(Some(&fenced_true_false_batch()), Arc::new(ConstantEmbedder));
        let questions = gen.generate("材料", 3, "TrueFalse", "Easy").await.unwrap();

        // 三道题嵌入相同，只留第一道
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].text,
            "水在标准大气压下 100 摄氏度沸腾。"
        );
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_before_model_call() {
        let gen = generator(None, Arc::new(ConstantEmbedder));
        let err = gen.generate("材料", 1, "essay", "Easy").await.unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_no_model_response_is_generation_error() {
        let gen = generator(None, Arc::new(ConstantEmbedder));
        let err = gen
            .generate("材料", 1, "TrueFalse", "Easy")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));
    }

    #[tokio::test]
    async fn test_empty_model_response_is_generation_error() {
        let gen = generator(Some("   \n"), Arc::new(ConstantEmbedder));
        let err = gen
            .generate("材料", 1, "TrueFalse", "Easy")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));
    }

    #[tokio::test]
    async fn test_parser_failure_is_wrapped_as_generation_error() {
        let gen = generator(Some("the model rambled instead"), Arc::new(ConstantEmbedder));
        let err = gen
            .generate("材料", 1, "TrueFalse", "Easy")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_generation() {
        let gen = generator(Some(&fenced_true_false_batch()), Arc::new(FailingEmbedder));
        let err = gen
            .generate("材料", 3, "TrueFalse", "Easy")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Deduplication(_)));
    }
}
