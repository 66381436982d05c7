use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a content auditor
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Invalid contact pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Outcome of a text audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Blocked,
    /// Reserved for manual review queues
    Pending,
    /// Reserved for soft warnings shown to the sender
    Warning,
}

/// Machine-readable detail of an audit decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AuditDetail {
    ContactInfo { pattern: String },
    MoneyTransaction { keywords: Vec<String> },
    SensitiveKeywords { keywords: Vec<String> },
    SpamDetected,
    Passed,
}

impl AuditDetail {
    pub fn category(&self) -> &'static str {
        match self {
            AuditDetail::ContactInfo { .. } => "contact_info",
            AuditDetail::MoneyTransaction { .. } => "money_transaction",
            AuditDetail::SensitiveKeywords { .. } => "sensitive_keywords",
            AuditDetail::SpamDetected => "spam_detected",
            AuditDetail::Passed => "passed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub status: AuditStatus,
    /// Message suitable for showing to the sender; empty when passed
    pub reason: String,
    pub detail: AuditDetail,
}

/// Patterns, keyword lists and thresholds used by [`ContentAuditor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRules {
    #[serde(default = "default_contact_patterns")]
    pub contact_patterns: Vec<String>,
    #[serde(default = "default_sensitive_keywords")]
    pub sensitive_keywords: Vec<String>,
    #[serde(default = "default_money_keywords")]
    pub money_keywords: Vec<String>,
    /// Texts must be longer than this many characters to count as spam
    #[serde(default = "default_spam_min_length")]
    pub spam_min_length: usize,
    /// Share of the text taken by its most frequent character
    #[serde(default = "default_spam_char_ratio")]
    pub spam_char_ratio: f64,
}

impl Default for AuditRules {
    fn default() -> Self {
        Self {
            contact_patterns: default_contact_patterns(),
            sensitive_keywords: default_sensitive_keywords(),
            money_keywords: default_money_keywords(),
            spam_min_length: default_spam_min_length(),
            spam_char_ratio: default_spam_char_ratio(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_contact_patterns() -> Vec<String> {
    strings(&[
        r"(?:wechat|weixin|微信)\s*(?:id|号)?\s*[:：]?\s*[a-zA-Z0-9_-]{6,20}",
        r"[a-zA-Z0-9_-]{6,20}\s*(?:wechat|weixin|微信)",
        // No word boundary: the handle usually follows CJK text directly
        r"wx\s*[:：]?\s*[a-zA-Z0-9_-]{6,20}",
        r"[a-zA-Z0-9_-]{6,20}\s*wx",
        r"(?:phone|tel|mobile|手机|电话)\s*(?:number|号)?\s*[:：]?\s*1[3-9]\d{9}",
        r"1[3-9]\d{9}",
        r"qq\s*(?:号\s*[:：]?|[:：])\s*\d{5,11}",
    ])
}

fn default_sensitive_keywords() -> Vec<String> {
    strings(&[
        "有偿",
        "陪聊",
        "包养",
        "援交",
        "一夜情",
        "转账",
        "红包",
        "打钱",
        "付款",
        "收款",
        "低俗",
        "色情",
        "约炮",
        "paid chat",
        "paid companion",
        "sugar daddy",
        "escort",
        "one night stand",
        "hookup",
        "transfer",
        "red packet",
        "send money",
        "payment",
        "collect payment",
        "vulgar",
        "porn",
    ])
}

fn default_money_keywords() -> Vec<String> {
    strings(&[
        "转账",
        "打钱",
        "付款",
        "收款",
        "红包",
        "支付宝",
        "微信支付",
        "银行卡",
        "账号",
        "transfer",
        "send money",
        "payment",
        "collect payment",
        "red packet",
        "alipay",
        "wechat pay",
        "bank card",
        "account number",
    ])
}

fn default_spam_min_length() -> usize { 50 }
fn default_spam_char_ratio() -> f64 { 0.4 }

const CONTACT_RISK: f64 = 50.0;
const SENSITIVE_RISK: f64 = 10.0;
const MONEY_RISK: f64 = 30.0;
const MAX_RISK: f64 = 100.0;

/// Chat message auditor
///
/// Checks run in a fixed order: contact details, keywords, then the
/// repeated-character spam heuristic. The first hit decides the outcome.
#[derive(Debug, Clone)]
pub struct ContentAuditor {
    contact_patterns: Vec<Regex>,
    sensitive_keywords: Vec<String>,
    money_keywords: Vec<String>,
    spam_min_length: usize,
    spam_char_ratio: f64,
}

impl ContentAuditor {
    /// Compile the rules; every contact pattern matches case-insensitively
    pub fn new(rules: &AuditRules) -> Result<Self, ModerationError> {
        let contact_patterns = rules
            .contact_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ModerationError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            contact_patterns,
            sensitive_keywords: lowercase_all(&rules.sensitive_keywords),
            money_keywords: lowercase_all(&rules.money_keywords),
            spam_min_length: rules.spam_min_length,
            spam_char_ratio: rules.spam_char_ratio,
        })
    }

    /// Audit a chat message
    pub fn audit(&self, text: &str) -> AuditOutcome {
        if let Some(regex) = self.contact_patterns.iter().find(|re| re.is_match(text)) {
            tracing::debug!("Message blocked: contact info ({})", regex.as_str());
            return AuditOutcome {
                status: AuditStatus::Blocked,
                reason: "Sharing contact details in chat is not allowed".to_string(),
                detail: AuditDetail::ContactInfo {
                    pattern: regex.as_str().to_string(),
                },
            };
        }

        let lowered = text.to_lowercase();
        let found: Vec<String> = self
            .sensitive_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .cloned()
            .collect();

        if !found.is_empty() {
            tracing::debug!("Message blocked: keywords {:?}", found);
            let money = found.iter().any(|keyword| self.money_keywords.contains(keyword));
            return if money {
                AuditOutcome {
                    status: AuditStatus::Blocked,
                    reason: "Content involving money transactions is not allowed".to_string(),
                    detail: AuditDetail::MoneyTransaction { keywords: found },
                }
            } else {
                AuditOutcome {
                    status: AuditStatus::Blocked,
                    reason: "Content contains sensitive words".to_string(),
                    detail: AuditDetail::SensitiveKeywords { keywords: found },
                }
            };
        }

        if self.is_spam(text) {
            tracing::debug!("Message blocked: spam heuristic");
            return AuditOutcome {
                status: AuditStatus::Blocked,
                reason: "Content looks like spam".to_string(),
                detail: AuditDetail::SpamDetected,
            };
        }

        AuditOutcome {
            status: AuditStatus::Passed,
            reason: String::new(),
            detail: AuditDetail::Passed,
        }
    }

    /// True when a long text is dominated by a single character
    pub fn is_spam(&self, text: &str) -> bool {
        let length = text.chars().count();
        if length <= self.spam_min_length {
            return false;
        }

        let mut counts: HashMap<char, usize> = HashMap::new();
        for ch in text.chars() {
            *counts.entry(ch).or_insert(0) += 1;
        }

        let most_frequent = counts.values().copied().max().unwrap_or(0);
        most_frequent as f64 / length as f64 > self.spam_char_ratio
    }

    /// Every contact-like substring, in pattern order. For logging only.
    pub fn extract_contact_info(&self, text: &str) -> Vec<String> {
        self.contact_patterns
            .iter()
            .flat_map(|regex| regex.find_iter(text).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Risk score (0-100) summing every signal the text trips
    pub fn risk_score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();

        let contact_hits = self
            .contact_patterns
            .iter()
            .filter(|regex| regex.is_match(text))
            .count();
        let sensitive_hits = count_keywords(&self.sensitive_keywords, &lowered);
        let money_hits = count_keywords(&self.money_keywords, &lowered);

        let score = contact_hits as f64 * CONTACT_RISK
            + sensitive_hits as f64 * SENSITIVE_RISK
            + money_hits as f64 * MONEY_RISK;

        score.min(MAX_RISK)
    }
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

fn count_keywords(keywords: &[String], lowered: &str) -> usize {
    keywords.iter().filter(|k| lowered.contains(k.as_str())).count()
}
