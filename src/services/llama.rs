//! Llama.cpp 推理服务模块
//! 通过 HTTP 访问本地 llama-server，提供文本生成与向量嵌入能力

use anyhow::{Error, Result};
use async_trait::async_trait;
use reqwest;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 单次模型请求超时
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Llama 服务配置
#[derive(Debug, Clone)]
pub struct LlamaConfig {
    pub server_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop_tokens: Vec<String>,
}

impl Default for LlamaConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            stop_tokens: Vec::new(),
        }
    }
}

/// 文本生成模型接口
///
/// 返回 `Ok(None)` 表示模型没有给出响应；请求失败为 `Err`。
/// 单次调用失败即终止，不做重试。
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

/// 文本嵌入接口，同一提供方返回的向量维度固定
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Completion 请求
#[derive(Debug, Serialize)]
struct CompletionRequest {
    prompt: String,
    n_predict: u32,
    temperature: f32,
    stop: Vec<String>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_prompt: Option<bool>,
}

/// Completion 响应
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// llama-server 客户端
#[derive(Clone)]
pub struct LlamaClient {
    config: LlamaConfig,
    http_client: reqwest::Client,
}

impl LlamaClient {
    /// 创建新的客户端实例
    pub fn new(config: LlamaConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &LlamaConfig {
        &self.config
    }

    /// 健康检查
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.config.server_url);

        match self.http_client.get(&url).send().await {
            Ok(resp) => resp.status() == 200,
            Err(_) => false,
        }
    }

    /// 推理补全，模型输出为空时返回 None
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/completion", self.config.server_url);

        let completion_request = CompletionRequest {
            prompt: prompt.to_string(),
            n_predict: self.config.max_tokens,
            temperature: self.config.temperature,
            stop: self.config.stop_tokens.clone(),
            stream: false,
            cache_prompt: Some(true),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&completion_request)
            .send()
            .await?
            .json::<CompletionResponse>()
            .await?;

        if response.content.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(response.content))
        }
    }

    /// 获取文本嵌入向量
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embedding", self.config.server_url);

        #[derive(Serialize)]
        struct EmbedRequest {
            content: String,
        }

        let response = self
            .http_client
            .post(&url)
            .json(&EmbedRequest {
                content: text.to_string(),
            })
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        if let Some(embedding) = response["embedding"].as_array() {
            let mut result = Vec::with_capacity(embedding.len());
            for v in embedding {
                if let Some(f) = v.as_f64() {
                    result.push(f as f32);
                }
            }
            Ok(result)
        } else {
            Err(Error::msg("Failed to parse embedding response"))
        }
    }
}

#[async_trait]
impl GenerativeModel for LlamaClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self.complete(prompt).await
    }
}

#[async_trait]
impl EmbeddingProvider for LlamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }
}
