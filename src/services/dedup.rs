//! 语义去重模块
//! 基于嵌入向量余弦相似度的贪心去重，而非文本精确匹配

use crate::error::{EngineError, Result};
use crate::models::Question;
use crate::services::llama::EmbeddingProvider;
use log::debug;

/// 判定两道题为近重复的余弦相似度阈值
pub const SIMILARITY_THRESHOLD: f32 = 0.9;

/// 余弦相似度
///
/// 零向量或维度不一致时返回 0，不产生 NaN。
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, na, nb) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(d, aa, bb), (x, y)| {
            (d + x * y, aa + x * x, bb + y * y)
        });

    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

/// 贪心去重，保持输入顺序
///
/// 逐个计算候选题的嵌入，与已接受题目的最大相似度达到阈值则丢弃，
/// 凑满 `target_count` 道后提前结束。返回数量可能少于目标值，
/// 这不是错误；嵌入计算失败则整次去重终止，不返回部分结果。
pub async fn deduplicate(
    candidates: Vec<Question>,
    target_count: usize,
    embedder: &dyn EmbeddingProvider,
) -> Result<Vec<Question>> {
    let mut accepted: Vec<Question> = Vec::new();
    let mut accepted_embeddings: Vec<Vec<f32>> = Vec::new();

    for candidate in candidates {
        if accepted.len() >= target_count {
            break;
        }

        let embedding = embedder
            .embed(&candidate.text)
            .await
            .map_err(EngineError::Deduplication)?;

        let max_similarity = accepted_embeddings
            .iter()
            .map(|prior| cosine_similarity(prior, &embedding))
            .fold(f32::NEG_INFINITY, f32::max);

        if !accepted_embeddings.is_empty() && max_similarity >= SIMILARITY_THRESHOLD {
            debug!(
                "dropped near-duplicate question (similarity {:.3}): {}",
                max_similarity, candidate.text
            );
            continue;
        }

        accepted.push(candidate);
        accepted_embeddings.push(embedding);
    }

    Ok(accepted)
}
