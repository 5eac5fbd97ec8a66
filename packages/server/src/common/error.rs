//! Root causes of pipeline failures.
//!
//! Domain code wraps these with `anyhow::Context`; the webhook handler
//! renders the whole chain into the response message.

use gemini_client::GeminiError;
use notion_client::NotionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required credential missing from the property store
    #[error("{key} が設定されていません")]
    Configuration { key: &'static str },

    /// Upstream answered with a non-success status
    #[error("{operation}に失敗しました。ステータスコード: {status}, レスポンス: {body}")]
    UpstreamHttp {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Upstream answered 200 with an unexpected payload
    #[error("{0}")]
    MalformedResponse(String),

    /// No response at all
    #[error("{0}")]
    Transport(String),
}

impl PipelineError {
    pub fn from_notion(operation: &'static str, err: NotionError) -> Self {
        match err {
            NotionError::Api { status, body } => Self::UpstreamHttp {
                operation,
                status,
                body,
            },
            NotionError::Parse(msg) => Self::MalformedResponse(format!(
                "{operation}のレスポンスを解析できません: {msg}"
            )),
            NotionError::Network(e) => {
                Self::Transport(format!("{operation}中に通信エラーが発生しました: {e}"))
            }
        }
    }

    pub fn from_gemini(err: GeminiError) -> Self {
        match err {
            GeminiError::Api { status, body } => Self::UpstreamHttp {
                operation: "Gemini APIの呼び出し",
                status,
                body,
            },
            GeminiError::EmptyResponse => {
                Self::MalformedResponse("Geminiからのレスポンスが不正です".to_string())
            }
            GeminiError::Parse(msg) => {
                Self::MalformedResponse(format!("Geminiからのレスポンスが不正です: {msg}"))
            }
            GeminiError::Network(e) => {
                Self::Transport(format!("Gemini APIとの通信に失敗しました: {e}"))
            }
        }
    }
}
