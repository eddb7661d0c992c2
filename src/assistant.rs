// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chat assistant that answers questions about the user's money.
//!
//! [`RuleAssistant`] answers a few keyword questions offline. [`GeminiAssistant`]
//! forwards the question to Google's Gemini API and falls back to the rules
//! when the call fails.

use crate::models::{Category, Transaction, TransactionType};
use crate::utils::{fmt_amount, http_client};
use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct ChatContext<'a> {
    pub user_name: &'a str,
    pub transactions: &'a [Transaction],
}

pub trait Assistant {
    fn reply(&self, ctx: &ChatContext<'_>, message: &str) -> Result<String>;
}

pub fn greeting(user_name: &str) -> String {
    format!(
        "สวัสดีคุณ {} มีอะไรให้ AI Budget ช่วยเหลือเรื่องการเงินวันนี้ไหมครับ? (เช่น \"สรุปยอดเดือนนี้\", \"ฉันใช้เงินค่าอาหารไปเท่าไหร่\")",
        user_name
    )
}

fn total_where<F>(txs: &[Transaction], pred: F) -> Decimal
where
    F: Fn(&Transaction) -> bool,
{
    txs.iter()
        .filter(|t| pred(t))
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleAssistant;

impl Assistant for RuleAssistant {
    fn reply(&self, ctx: &ChatContext<'_>, message: &str) -> Result<String> {
        let msg = message.to_lowercase();
        let txs = ctx.transactions;
        let text = if msg.contains("สรุป") || msg.contains("ยอดรวม") {
            let total = total_where(txs, |t| t.r#type == TransactionType::Expense);
            format!("ยอดรายจ่ายรวมทั้งหมดของคุณอยู่ที่ {} บาทครับ", fmt_amount(&total))
        } else if msg.contains("อาหาร") {
            let total = total_where(txs, |t| t.category == Category::Food);
            format!("คุณใช้จ่ายค่าอาหารไปทั้งหมด {} บาทครับ", fmt_amount(&total))
        } else if msg.contains("หุ้น") || msg.contains("ลงทุน") {
            let total = total_where(txs, |t| t.category == Category::Investment);
            format!("พอร์ตการลงทุนของคุณมีมูลค่าต้นทุนรวม {} บาท", fmt_amount(&total))
        } else {
            "ผมสามารถช่วยสรุปรายรับรายจ่าย หรือวิเคราะห์พอร์ตหุ้นให้คุณได้ ลองถามเจาะจงดูนะครับ"
                .to_string()
        };
        Ok(text)
    }
}

#[derive(Serialize)]
struct ContextRow<'a> {
    date: String,
    item: &'a str,
    category: &'static str,
    amount: Decimal,
    r#type: TransactionType,
    symbol: Option<&'a str>,
}

pub fn system_prompt(ctx: &ChatContext<'_>) -> Result<String> {
    let rows: Vec<ContextRow<'_>> = ctx
        .transactions
        .iter()
        .map(|t| ContextRow {
            date: t.date.to_string(),
            item: &t.item,
            category: t.category.label(),
            amount: t.amount,
            r#type: t.r#type,
            symbol: t.note.as_deref(),
        })
        .collect();
    let data = serde_json::to_string(&rows)?;
    Ok(format!(
        "You are a helpful financial AI assistant for a user named {}.\n\
         Language: Thai (ภาษาไทย).\n\
         Context: The user has the following transaction history: {}.\n\
         Goal: Answer questions about their finances, summarize spending, or give advice based on the data.\n\
         Keep answers concise and friendly.",
        ctx.user_name, data
    ))
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(resp: GenerateResponse) -> Option<String> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

pub struct GeminiAssistant {
    api_key: String,
    model: String,
}

impl GeminiAssistant {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Built from `GEMINI_API_KEY` / `GEMINI_MODEL`, if a key is set.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(key, model))
    }

    fn generate(&self, ctx: &ChatContext<'_>, message: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", ENDPOINT, self.model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt(ctx)? }] },
            "contents": [{ "role": "user", "parts": [{ "text": message }] }],
        });
        let resp = http_client()?
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .context("Gemini request failed")?
            .error_for_status()?;
        let parsed: GenerateResponse = resp.json().context("Unexpected Gemini response")?;
        extract_text(parsed).ok_or_else(|| anyhow!("Gemini returned no text"))
    }
}

impl Assistant for GeminiAssistant {
    fn reply(&self, ctx: &ChatContext<'_>, message: &str) -> Result<String> {
        match self.generate(ctx, message) {
            Ok(text) => Ok(text),
            Err(err) => {
                tracing::warn!(error = %err, model = %self.model, "live assistant failed, using rules");
                RuleAssistant.reply(ctx, message)
            }
        }
    }
}
