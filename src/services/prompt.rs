//! 出题与判分提示词工程
//! 纯字符串构造，无副作用

use crate::models::QuestionType;

/// 提示词构造器
pub struct QuizPrompt;

impl QuizPrompt {
    /// 构建出题提示词
    ///
    /// 要求模型只返回一个包在 ```json 代码围栏内的 JSON 数组，
    /// 每道题一个对象，字段形状随题型变化。
    pub fn generation(
        context: &str,
        num_questions: usize,
        question_type: QuestionType,
        difficulty: &str,
    ) -> String {
        let (type_label, type_requirement, options_shape, answer_shape) = match question_type {
            QuestionType::MultipleChoice => (
                "multiple-choice",
                "Each question must have exactly 4 options, with exactly one correct option. \
                 Distractors must be plausible but clearly wrong on careful reading",
                r#"["option 0", "option 1", "option 2", "option 3"]"#,
                r#"the zero-based index of the correct option, as a string (e.g. "2")"#,
            ),
            QuestionType::TrueFalse => (
                "true/false",
                "Each question must be a single factual statement that is unambiguously \
                 true or false according to the study material",
                "null",
                r#""True" or "False""#,
            ),
            QuestionType::ShortAnswer => (
                "short-answer",
                "Each question must be answerable in a few sentences. The correct_answer \
                 field holds a concise reference answer used later for grading",
                "null",
                "a concise reference answer string",
            ),
        };

        format!(
            r#"You are an expert exam question designer. Generate exactly {num_questions} {type_label} questions based on the study material below.

## Study Material:
{context}

## Difficulty Level: {difficulty}

## Requirements:
1. Every question must be answerable from the study material alone
2. Questions must not repeat or trivially rephrase one another
3. {type_requirement}
4. Marks must reflect difficulty: a harder question is worth more marks
5. Provide 1-2 short hints and a brief explanation per question

## Output format:
Return ONLY a JSON array wrapped in a ```json fenced code block, one object per question:
{{
  "question": "the question text",
  "type": "{canonical}",
  "options": {options_shape},
  "difficulty": "{difficulty}",
  "marks": 2,
  "hints": ["hint"],
  "explanation": "why the correct answer is correct",
  "correct_answer": {answer_shape}
}}

Output only the fenced JSON array, no other text."#,
            num_questions = num_questions,
            type_label = type_label,
            context = context,
            difficulty = difficulty,
            type_requirement = type_requirement,
            canonical = question_type.canonical_name(),
            options_shape = options_shape,
            answer_shape = answer_shape,
        )
    }

    /// 构建简答题判分提示词
    ///
    /// 附带参考答案、题干、学生答案与满分，供模型分配部分得分。
    pub fn grading(
        question_text: &str,
        reference_answer: &str,
        submitted_answer: &str,
        max_marks: f64,
    ) -> String {
        format!(
            r#"You are a strict but fair examiner grading a free-text exam answer.

## Question:
{question_text}

## Reference Answer:
{reference_answer}

## Student Answer:
{submitted_answer}

## Maximum Marks: {max_marks}

## Grading rules:
1. Award partial credit: the score may be any number between 0 and {max_marks}
2. Judge meaning, not wording; the student does not need to match the reference verbatim
3. Award no marks for content unrelated to the question

Return ONLY a JSON object of the form {{"is_correct": <boolean>, "score": <number>}}. No other text."#,
            question_text = question_text,
            reference_answer = reference_answer,
            submitted_answer = submitted_answer,
            max_marks = max_marks,
        )
    }
}
