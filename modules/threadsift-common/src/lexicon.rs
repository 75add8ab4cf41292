//! Fixed keyword rule tables for sentiment, topic, and thread detection.
//!
//! Named, enumerable tables so rules can be tested and replaced without
//! touching control flow. None of this is a learned model; matching is
//! case-insensitive substring containment throughout.

/// Words counted toward a positive sentiment verdict.
pub const POSITIVE_WORDS: &[&str] = &[
    "great", "awesome", "excellent", "amazing", "love", "good", "best",
    "brilliant", "fantastic", "insightful", "helpful", "useful", "excited",
];

/// Words counted toward a negative sentiment verdict.
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "worst", "wrong", "broken", "fail",
    "useless", "disappointing", "scam", "garbage",
];

/// Sentiment words strong enough to mark a post discussion-worthy on their own.
pub const STRONG_SENTIMENT_WORDS: &[&str] = &[
    "amazing", "love", "hate", "terrible", "brilliant", "worst", "awful",
];

/// A topic classification rule: first matching rule in [`TOPIC_RULES`] wins.
#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    /// Technical topics make a post actionable even without a URL.
    pub technical: bool,
    /// Flat bonus added to the priority score for high-value topics.
    pub priority_bonus: f64,
    pub relevance: f64,
    pub learning_value: f64,
}

/// Topic rules in match-priority order. A post matching none is `General`.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        label: "AI/ML",
        keywords: &["ai", "machine learning", "ml", "llm", "neural", "gpt", "deep learning"],
        technical: true,
        priority_bonus: 20.0,
        relevance: 0.9,
        learning_value: 0.85,
    },
    TopicRule {
        label: "Programming",
        keywords: &["programming", "code", "coding", "software", "developer", "rust", "python", "javascript"],
        technical: true,
        priority_bonus: 15.0,
        relevance: 0.85,
        learning_value: 0.8,
    },
    TopicRule {
        label: "Web3",
        keywords: &["crypto", "blockchain", "web3", "bitcoin", "ethereum"],
        technical: true,
        priority_bonus: 5.0,
        relevance: 0.7,
        learning_value: 0.6,
    },
    TopicRule {
        label: "Business",
        keywords: &["startup", "founder", "business", "marketing", "product", "revenue", "saas"],
        technical: false,
        priority_bonus: 10.0,
        relevance: 0.75,
        learning_value: 0.65,
    },
    TopicRule {
        label: "Science",
        keywords: &["science", "research", "study", "physics", "biology"],
        technical: false,
        priority_bonus: 10.0,
        relevance: 0.8,
        learning_value: 0.75,
    },
    TopicRule {
        label: "Design",
        keywords: &["design", "ui", "ux", "typography", "figma"],
        technical: false,
        priority_bonus: 5.0,
        relevance: 0.7,
        learning_value: 0.6,
    },
];

/// Label assigned when no topic rule matches.
pub const GENERAL_TOPIC: &str = "General";

/// Relevance/learning-value used when no topic signal is present.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Classify a post's text against [`TOPIC_RULES`], first match wins.
pub fn classify_topic(text: &str) -> Option<&'static TopicRule> {
    let lower = text.to_lowercase();
    TOPIC_RULES.iter().find(|rule| {
        rule.keywords
            .iter()
            .any(|kw| contains_keyword(&lower, kw))
    })
}

/// Substring match with word-ish boundaries for short keywords, so "ai"
/// doesn't fire inside "maintain". Multi-word keywords match as substrings.
fn contains_keyword(lower_text: &str, keyword: &str) -> bool {
    if keyword.contains(' ') || keyword.len() > 4 {
        return lower_text.contains(keyword);
    }
    lower_text
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == keyword)
}

/// A templated key-insight rule: fires when the post's topic matches and the
/// text contains the trigger word.
#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub topic: &'static str,
    pub trigger: &'static str,
    pub insight: &'static str,
}

pub const INSIGHT_RULES: &[InsightRule] = &[
    InsightRule { topic: "AI/ML", trigger: "future", insight: "AI future implications" },
    InsightRule { topic: "AI/ML", trigger: "tool", insight: "AI tooling to evaluate" },
    InsightRule { topic: "AI/ML", trigger: "model", insight: "Model development insight" },
    InsightRule { topic: "Programming", trigger: "tip", insight: "Practical coding tip" },
    InsightRule { topic: "Programming", trigger: "performance", insight: "Performance technique" },
    InsightRule { topic: "Business", trigger: "growth", insight: "Growth strategy note" },
    InsightRule { topic: "Business", trigger: "pricing", insight: "Pricing signal" },
    InsightRule { topic: "Science", trigger: "finding", insight: "Research finding to follow up" },
];

/// Literal continuation markers for thread detection (matched case-insensitively).
/// The numbering patterns ("1/5", "part 2") are matched by regex in the
/// thread reconstructor; together with these they form the full marker set.
pub const CONTINUATION_MARKERS: &[&str] = &[
    "thread", "🧵", "continued", "follow up", "follow-up", "update",
];

/// Regex source for "N/M" thread numbering (e.g. "1/5").
pub const NUMBERING_PATTERN: &str = r"\b\d{1,3}/\d{1,3}\b";

/// Regex source for "part N" numbering.
pub const PART_PATTERN: &str = r"(?i)\bpart\s+\d+\b";
