//! 文本生成服务客户端
//!
//! `Generator` 是翻译服务依赖的唯一外部接口：输入完整提示词，返回模型的原始输出。
//! `OllamaClient` 通过 Ollama 的 `/api/chat` 接口实现它。

use crate::error::{Result, TranslationError};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, TranslationConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 文本生成服务
#[async_trait]
pub trait Generator: Send + Sync {
    /// 发送提示词，返回未经处理的模型输出
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Ollama 对话接口客户端
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP客户端，用于API调用
    client: Client,
    chat_url: String,
    model: String,
}

impl OllamaClient {
    /// 创建新的客户端
    ///
    /// # 示例
    ///
    /// ```rust
    /// use markdown_relay_translator::{OllamaClient, TranslationConfig};
    ///
    /// let client = OllamaClient::new(&TranslationConfig::default());
    /// assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
    /// ```
    pub fn new(config: &TranslationConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create configured client: {}, using default", e);
                Client::new()
            });

        Self {
            client,
            chat_url: format!("{}/api/chat", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

fn classify(error: reqwest::Error) -> TranslationError {
    if error.is_timeout() {
        TranslationError::Timeout(error.to_string())
    } else if error.is_connect() {
        TranslationError::Connection(error.to_string())
    } else {
        TranslationError::Http(error)
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        debug!("发送翻译请求到: {} (模型 {})", self.chat_url, self.model);

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            return Err(TranslationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(classify)?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            TranslationError::Parse(format!("{}: {}", e, preview))
        })?;

        Ok(parsed.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_tolerates_trailing_slash() {
        let config = TranslationConfig {
            base_url: "http://172.20.0.5:11434/".into(),
            ..TranslationConfig::default()
        };
        assert_eq!(OllamaClient::new(&config).chat_url(), "http://172.20.0.5:11434/api/chat");
    }

    #[test]
    fn chat_request_serializes_single_user_message() {
        let request = ChatRequest {
            model: "qwen3:32b".into(),
            messages: vec![ChatMessage { role: "user".into(), content: "hi".into() }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stream"], false);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transient_error() {
        let config = TranslationConfig {
            base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
            ..TranslationConfig::default()
        };
        let err = OllamaClient::new(&config).generate("hello").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
