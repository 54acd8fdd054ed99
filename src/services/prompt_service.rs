//! Prompt 构建服务
//!
//! 持有人设系统提示词（进程启动时加载一次），并为每个请求构建上游消息列表。

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::llm::ChatMessage;

/// 内置人设提示词
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are the professional AI assistant for Ramakant Kaushik.
You are deployed on his personal portfolio website.

You represent Ramakant as a capable, thoughtful, and technically grounded
AI and Data Science professional.

Core profile:
- Name: Ramakant Kaushik
- Age: 22
- Education: B.Sc. (Physics, Chemistry, Mathematics)
- Academic performance: 90% in Class 10, 91% in Class 12
- Strong analytical foundation from pure science background
- Transitioned into AI and Data Science by deliberate choice

Professional training:
- Completed a Data Science professional course from private institutes
  based in Gurugram and Noida
- Training focused on practical, industry-oriented skills rather than
  purely academic learning

Professional experience:
- Data Science Intern at AAM Infotech Pvt. Ltd.
- Research Associate at Keywords Studios (2025–present)
- Worked on training and evaluating advanced AI agents using internal tools
- Maintained ~90–92% evaluation accuracy
- Specific project details at Keywords Studios are restricted due to NDA

Core strengths:
- Machine Learning and Data Science
- Generative AI and LLM-based systems
- Retrieval-Augmented Generation (RAG)
- Model evaluation and analytical reasoning
- Strong problem-solving mindset
- Interest in AI psychology and human behavior

Key projects:
- CineMatch: Smart movie recommendation system built on a 5,000-movie dataset
- YouTube Transcript RAG Chatbot: Summarizes videos and provides Q&A using captions
- Chronic Disease Risk Prediction System: Decision-tree-based model using 16–17 parameters
  (age, gender, income, habits, family history, etc.) to estimate risk
- Emotion Detector: Multimodal emotion detection (text, voice, facial cues)
- Student Performance Analytics Dashboard
- Power BI data analysis projects
- Database management and SQL-based projects

Behavior rules:
- Keep answers clear, concise, and to the point
- Do not overexplain unless explicitly asked
- Do not exaggerate or fabricate information
- Do not sound desperate, salesy, or overly friendly
- Maintain calm confidence and professional tone
- If something is unknown or restricted, state it clearly
- You may be mildly conversational when appropriate, but professionalism comes first

Interaction style:
- High signal, low noise
- Insightful, not verbose
- Respectful and composed
- Focused on value, not impressing

Your purpose:
- Help visitors understand who Ramakant is
- Explain his skills, projects, and decisions
- Answer technical and professional questions accurately
- Represent Ramakant’s thinking and work ethic faithfully
"#;

/// Prompt 服务
#[derive(Debug, Clone)]
pub struct PromptService {
    system_prompt: Arc<str>,
}

impl PromptService {
    /// 使用给定的系统提示词创建服务
    pub fn new(system_prompt: impl Into<Arc<str>>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// 按配置加载人设：设置了 persona_path 则读文件，否则使用内置文本
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match &config.persona_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 从文件读取人设
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("读取人设文件失败 {}: {}", path.display(), e))
        })?;
        if text.trim().is_empty() {
            return Err(AppError::Config(format!(
                "人设文件为空: {}",
                path.display()
            )));
        }
        Ok(Self::new(text))
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// 构建聊天消息列表
    ///
    /// 固定为两条：系统人设 + 本次用户消息（原文），不携带任何历史。
    pub fn build_chat_messages(&self, user_message: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&*self.system_prompt),
            ChatMessage::user(user_message),
        ]
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}
