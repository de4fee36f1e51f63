//! 数据模型模块
//! 题目与判分结果的值对象定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
}

impl QuestionType {
    /// 解析题型名称，大小写不敏感，兼容历史别名
    /// （multiple_choice / multiplechoice / short_answer / true_false / true-or-false 等）
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' ' | '/'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "multiplechoice" => Some(Self::MultipleChoice),
            "shortanswer" => Some(Self::ShortAnswer),
            "truefalse" | "trueorfalse" => Some(Self::TrueFalse),
            _ => None,
        }
    }

    /// 规范名称，用于提示词和对外展示
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "MultipleChoice",
            Self::ShortAnswer => "ShortAnswer",
            Self::TrueFalse => "TrueFalse",
        }
    }
}

/// 难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 解析难度名称，大小写不敏感
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// 题目数据结构
///
/// 由生成流程创建后即不可变，判分不会修改题目。
/// `correct_answer` 的规范表示：选择题为正确选项的下标字符串（从 0 起），
/// 判断题为 "True"/"False"，简答题为判分用的参考答案。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    /// 选择题的选项列表（至少 2 项），其余题型为空
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    /// 本题满分，必须为正数
    pub marks: f64,
    pub hints: Vec<String>,
    /// 判分后展示给用户的解析
    pub explanation: String,
    pub correct_answer: String,
    pub created_at: DateTime<Utc>,
}

/// 单次判分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub question_id: String,
    pub is_correct: bool,
    /// 得分，始终落在 [0, marks] 区间内
    pub score: f64,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_type_names() {
        assert_eq!(
            QuestionType::parse("MultipleChoice"),
            Some(QuestionType::MultipleChoice)
        );
        assert_eq!(
            QuestionType::parse("ShortAnswer"),
            Some(QuestionType::ShortAnswer)
        );
        assert_eq!(QuestionType::parse("TrueFalse"), Some(QuestionType::TrueFalse));
    }

    #[test]
    fn test_parse_legacy_type_aliases() {
        assert_eq!(
            QuestionType::parse("multiple_choice"),
            Some(QuestionType::MultipleChoice)
        );
        assert_eq!(
            QuestionType::parse("multiplechoice"),
            Some(QuestionType::MultipleChoice)
        );
        assert_eq!(
            QuestionType::parse("SHORT_ANSWER"),
            Some(QuestionType::ShortAnswer)
        );
        assert_eq!(QuestionType::parse("true_false"), Some(QuestionType::TrueFalse));
        assert_eq!(
            QuestionType::parse("true-or-false"),
            Some(QuestionType::TrueFalse)
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        assert_eq!(QuestionType::parse("essay"), None);
        assert_eq!(QuestionType::parse(""), None);
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("impossible"), None);
    }
}
