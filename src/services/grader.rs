//! 判分模块
//! 按题型分支的判分状态机；简答题由模型辅助给出部分得分
//!
//! 任何判分失败都必须以错误上抛，绝不静默记零分，
//! 否则会污染用户的成绩记录。

use crate::error::{EngineError, Result};
use crate::models::{GradingResult, Question, QuestionType};
use crate::services::llama::GenerativeModel;
use crate::services::parser::strip_code_fence;
use crate::services::prompt::QuizPrompt;
use log::{debug, info};
use serde::Deserialize;
use std::sync::Arc;

/// 简答题判为"正确"所需的得分率阈值
pub const CORRECTNESS_THRESHOLD: f64 = 0.8;

/// 模型返回的简答题评分（可能附带的 percentage 字段仅供参考，忽略）
#[derive(Debug, Deserialize)]
struct ModelVerdict {
    is_correct: bool,
    score: f64,
}

/// 答案判分器
pub struct AnswerGrader {
    model: Arc<dyn GenerativeModel>,
}

impl AnswerGrader {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// 对提交答案判分
    pub async fn grade(&self, question: &Question, submitted_answer: &str) -> Result<GradingResult> {
        match question.question_type {
            QuestionType::MultipleChoice => Self::grade_multiple_choice(question, submitted_answer),
            QuestionType::TrueFalse => Ok(Self::grade_true_false(question, submitted_answer)),
            QuestionType::ShortAnswer => self.grade_short_answer(question, submitted_answer).await,
        }
    }

    /// 选择题：提交内容是整数则按下标比对，否则与正确选项文本精确比对
    fn grade_multiple_choice(question: &Question, submitted_answer: &str) -> Result<GradingResult> {
        let correct_index: usize = question.correct_answer.trim().parse().map_err(|_| {
            EngineError::Grading(format!(
                "question {} has a non-numeric correct_answer",
                question.id
            ))
        })?;
        let correct_option = question.options.get(correct_index).ok_or_else(|| {
            EngineError::Grading(format!(
                "question {} correct_answer index {} out of range",
                question.id, correct_index
            ))
        })?;

        let is_correct = match submitted_answer.trim().parse::<i64>() {
            Ok(submitted_index) => submitted_index == correct_index as i64,
            Err(_) => submitted_answer == correct_option,
        };

        Ok(Self::scored(question, is_correct))
    }

    /// 判断题：双方归一化后大小写不敏感比对
    fn grade_true_false(question: &Question, submitted_answer: &str) -> GradingResult {
        let is_correct = submitted_answer
            .trim()
            .eq_ignore_ascii_case(question.correct_answer.trim());

        Self::scored(question, is_correct)
    }

    /// 简答题：模型辅助判分
    ///
    /// score 采信模型给出的部分得分（截断到 [0, marks]），
    /// is_correct 不采信模型判断，统一按得分率阈值重新计算。
    async fn grade_short_answer(
        &self,
        question: &Question,
        submitted_answer: &str,
    ) -> Result<GradingResult> {
        if question.marks <= 0.0 {
            return Err(EngineError::Grading(format!(
                "question {} has non-positive marks",
                question.id
            )));
        }

        let prompt = QuizPrompt::grading(
            &question.text,
            &question.correct_answer,
            submitted_answer,
            question.marks,
        );

        let response = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| EngineError::Grading(e.to_string()))?;
        let raw = match response {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(EngineError::Grading("no valid response".to_string())),
        };

        let body = strip_code_fence(&raw);
        let verdict: ModelVerdict = serde_json::from_str(body.trim())
            .map_err(|e| EngineError::Grading(format!("unparsable grading response: {}", e)))?;

        let score = verdict.score.clamp(0.0, question.marks);
        let is_correct = score / question.marks >= CORRECTNESS_THRESHOLD;

        if verdict.is_correct != is_correct {
            debug!(
                "model verdict is_correct={} overridden to {} (score {}/{})",
                verdict.is_correct, is_correct, score, question.marks
            );
        }
        info!(
            "graded short answer for question {}: score {}/{}",
            question.id, score, question.marks
        );

        Ok(GradingResult {
            question_id: question.id.clone(),
            is_correct,
            score,
            explanation: question.explanation.clone(),
        })
    }

    fn scored(question: &Question, is_correct: bool) -> GradingResult {
        GradingResult {
            question_id: question.id.clone(),
            is_correct,
            score: if is_correct { question.marks } else { 0.0 },
            explanation: question.explanation.clone(),
        }
    }
}
