//! 模型输出解析模块
//! 将生成模型返回的半结构化文本解析为校验过的题目列表
//!
//! 解析策略是"整体严格、逐项宽松"：输出整体不是 JSON 数组时直接报错，
//! 单个候选题目不合法则静默丢弃，靠剩余题目保住整批结果。

use crate::error::{EngineError, Result};
use crate::models::{Difficulty, Question, QuestionType};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// 模型输出中的候选题目（宽松反序列化，缺字段不立即报错）
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: String,
    #[serde(rename = "type", default)]
    question_type: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    marks: Option<f64>,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    correct_answer: Option<Value>,
}

/// 剥离 Markdown 代码围栏
///
/// 优先取第一个 ```json 开栏到最后一个 ``` 闭栏之间的内容，
/// 退而求其次匹配无语言标注的围栏，都没有则原样返回。
pub(crate) fn strip_code_fence(raw: &str) -> String {
    for pattern in [r"(?s)```json\s*(.*)```", r"(?s)```\s*(.*)```"] {
        if let Some(cap) = Regex::new(pattern).unwrap().captures(raw) {
            return cap[1].trim().to_string();
        }
    }
    raw.trim().to_string()
}

/// 清除模型输出中混入的控制字符（换页符等会破坏 JSON 解码）
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// 解析模型输出为题目列表
///
/// 整体不是 JSON 数组时返回 `Parse` 错误；
/// 所有元素都被丢弃时返回 `NoValidQuestions`。
pub fn parse_questions(raw: &str, expected_type: QuestionType) -> Result<Vec<Question>> {
    let body = strip_control_chars(&strip_code_fence(raw));

    let value: Value =
        serde_json::from_str(body.trim()).map_err(|e| EngineError::Parse(e.to_string()))?;
    let elements = value
        .as_array()
        .ok_or_else(|| EngineError::Parse("expected a JSON array of questions".to_string()))?;

    let mut questions = Vec::with_capacity(elements.len());
    for element in elements {
        match validate_candidate(element, expected_type) {
            Some(question) => questions.push(question),
            None => debug!("dropped invalid question candidate: {}", element),
        }
    }

    if questions.is_empty() {
        return Err(EngineError::NoValidQuestions);
    }

    Ok(questions)
}

/// 校验单个候选题目，不合法返回 None
fn validate_candidate(element: &Value, expected_type: QuestionType) -> Option<Question> {
    let raw: RawQuestion = serde_json::from_value(element.clone()).ok()?;

    let text = raw.question.trim();
    if text.is_empty() {
        return None;
    }

    // 元素自带的 type 标注与请求题型不符时丢弃，缺失则沿用请求题型
    if let Some(tag) = raw.question_type.as_deref() {
        if QuestionType::parse(tag) != Some(expected_type) {
            return None;
        }
    }

    let marks = raw.marks.unwrap_or(1.0);
    if !marks.is_finite() || marks <= 0.0 {
        return None;
    }

    let answer = answer_to_string(raw.correct_answer.as_ref()?)?;
    let options = raw.options.unwrap_or_default();

    let (options, correct_answer) = match expected_type {
        QuestionType::MultipleChoice => {
            if options.len() < 2 {
                return None;
            }
            // correct_answer 必须是落在选项范围内的下标
            let index: usize = answer.trim().parse().ok()?;
            if index >= options.len() {
                return None;
            }
            (options, index.to_string())
        }
        QuestionType::TrueFalse => {
            let canonical = match answer.trim().to_lowercase().as_str() {
                "true" => "True".to_string(),
                "false" => "False".to_string(),
                _ => return None,
            };
            (Vec::new(), canonical)
        }
        QuestionType::ShortAnswer => {
            if answer.trim().is_empty() {
                return None;
            }
            (Vec::new(), answer)
        }
    };

    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .unwrap_or(Difficulty::Medium);

    Some(Question {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        question_type: expected_type,
        options,
        difficulty,
        marks,
        hints: raw.hints,
        explanation: raw.explanation,
        correct_answer,
        created_at: chrono::Utc::now(),
    })
}

/// correct_answer 可能是字符串、数字或布尔值，统一转成规范字符串
fn answer_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        _ => None,
    }
}
