//! Blocking client for an OpenAI-compatible chat-completions endpoint
//! (DeepSeek by default), used as the document-quality oracle.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{QualityAssessor, Verdict, extract_score};
use crate::rules::strategy::DocCategory;

const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;

const SYSTEM_ROLE: &str = "你是一个专业的教育数据管理文件评审专家。";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct LlmAssessor {
    api_key: String,
    api_base: String,
    model: String,
}

impl LlmAssessor {
    /// Build from `DATACULT_API_KEY` / `DATACULT_API_BASE` /
    /// `DATACULT_MODEL`. No key means the assessor is administratively
    /// disabled and the caller falls back per contract.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("DATACULT_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            api_base: std::env::var("DATACULT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            model: std::env::var("DATACULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }

    fn call(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_ROLE.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let resp = client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(format!("API error ({status}): {body}").into());
        }

        let response: ChatResponse = resp.json()?;
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "API returned no choices".into())
    }
}

impl QualityAssessor for LlmAssessor {
    fn assess(
        &self,
        text: &str,
        category: DocCategory,
        max_score: f64,
    ) -> Result<Verdict, Box<dyn std::error::Error>> {
        let prompt = rubric_prompt(category, text, max_score);
        let reply = self.call(&prompt)?;
        let score = extract_score(&reply, max_score);
        Ok(Verdict {
            score,
            analysis: reply,
        })
    }
}

/// Category-specific rubric. Management documents are judged on 规范性/
/// 专业性/完整性/特色化, practice-guidance documents on 规范性/完整性/
/// 可操作性/实用性; both rubrics demand a plain-text reply ending in the
/// labelled 总评分 line the score extractor keys on.
fn rubric_prompt(category: DocCategory, content: &str, max_score: f64) -> String {
    match category {
        DocCategory::Management => format!(
            "请根据以下标准评价这份数据管理制度类文件的质量，满分{max_score}分。\n\n\
             评分维度（每个维度0-5分，共4个维度）：\n\
             1. 规范性：文件结构、语言是否符合行业标准与教育规范，内容是否符合相关法律法规和政策。\n\
             2. 专业性：是否使用准确的专业术语和技术方法，能否有效指导学校数据管理工作。\n\
             3. 完整性：是否涵盖数据采集、存储、管理、保护、使用、共享、销毁等完整环节。\n\
             4. 特色化：是否结合学校实际情况，具有校本特色和创新性，能否解决学校具体问题。\n\n\
             文件内容：\n{content}\n\n\
             请给出评分和简要分析。注意：请使用纯文本格式回复，不要使用任何markdown语法。\n\n\
             输出格式：\n规范性：X分\n专业性：X分\n完整性：X分\n特色化：X分\n总评分：X分\n\
             分析：（用一段话简要说明文件的优点和不足，50-100字）"
        ),
        DocCategory::Practice => format!(
            "请根据以下标准评价这份数据实践指导类文件的质量，满分{max_score}分。\n\n\
             评分维度（每个维度0-5分，共4个维度）：\n\
             1. 规范性：文件结构、语言是否符合行业标准与教育规范，术语使用是否准确。\n\
             2. 完整性：是否涵盖数据采集、存储、管理、共享、使用等完整环节，并提供完整的操作步骤。\n\
             3. 可操作性：是否提供具体、清晰、易执行的实施步骤和操作指南。\n\
             4. 实用性：是否能解决实际工作中的具体问题，指导效果是否显著。\n\n\
             文件内容：\n{content}\n\n\
             请给出评分和简要分析。注意：请使用纯文本格式回复，不要使用任何markdown语法。\n\n\
             输出格式：\n规范性：X分\n完整性：X分\n可操作性：X分\n实用性：X分\n总评分：X分\n\
             分析：（用一段话简要说明文件的优点和不足，50-100字）"
        ),
    }
}
