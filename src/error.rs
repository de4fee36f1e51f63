//! 引擎错误类型
//! 所有失败都以带类型的错误上抛，判分过程绝不静默降级为零分

use thiserror::Error;

/// 引擎错误枚举
#[derive(Debug, Error)]
pub enum EngineError {
    /// 请求了未知题型
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),

    /// 模型无响应，或解析/校验后没有可用题目
    #[error("question generation failed: {0}")]
    Generation(String),

    /// 模型输出整体不是合法 JSON 数组
    #[error("failed to parse model output: {0}")]
    Parse(String),

    /// 所有候选题目都未通过校验
    #[error("no valid questions parsed")]
    NoValidQuestions,

    /// 去重阶段嵌入计算失败，整次生成终止
    #[error("deduplication failed: {0}")]
    Deduplication(anyhow::Error),

    /// 判分失败（模型无响应或评分 JSON 不可解析）
    #[error("grading failed: {0}")]
    Grading(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
