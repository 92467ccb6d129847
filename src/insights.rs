//! Keyword insights over a chat log

use crate::state_machine::{Message, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const POSITIVE_WORDS: [&str; 5] = ["bahagia", "senang", "gembira", "positif", "baik"];
const NEGATIVE_WORDS: [&str; 5] = ["sedih", "marah", "kecewa", "negatif", "buruk"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positif,
    Negatif,
    Netral,
}

/// Compare distinct positive and negative words; ties are neutral
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let words: HashSet<&str> = lowered.split_whitespace().collect();

    let positive = POSITIVE_WORDS.iter().filter(|w| words.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| words.contains(*w)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positif,
        std::cmp::Ordering::Less => Sentiment::Negatif,
        std::cmp::Ordering::Equal => Sentiment::Netral,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Kecemasan,
    Depresi,
    Stres,
    Tidur,
    Relasi,
    Lainnya,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Kecemasan,
        Topic::Depresi,
        Topic::Stres,
        Topic::Tidur,
        Topic::Relasi,
        Topic::Lainnya,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Kecemasan => &["cemas", "khawatir", "takut"],
            Topic::Depresi => &["sedih", "depresi", "putus asa"],
            Topic::Stres => &["stres", "tertekan", "overwhelmed"],
            Topic::Tidur => &["tidur", "insomnia", "lelah"],
            Topic::Relasi => &["hubungan", "teman", "keluarga"],
            Topic::Lainnya => &[],
        }
    }
}

/// First topic, in declaration order, with a keyword inside the text
pub fn extract_topic(text: &str) -> Topic {
    let lowered = text.to_lowercase();
    Topic::ALL
        .into_iter()
        .find(|topic| topic.keywords().iter().any(|k| lowered.contains(k)))
        .unwrap_or(Topic::Lainnya)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positif")]
    pub positif: u32,
    #[serde(rename = "Negatif")]
    pub negatif: u32,
    #[serde(rename = "Netral")]
    pub netral: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: Topic,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationInsights {
    pub sentiments: SentimentCounts,
    /// Topics that occur at least once, in topic order
    pub topics: Vec<TopicCount>,
    /// Messages per day from first to last, gaps filled with zero.
    /// Restored history has no timestamp and is not counted.
    pub usage: Vec<DailyUsage>,
}

pub fn conversation_insights(log: &[Message]) -> ConversationInsights {
    let mut sentiments = SentimentCounts::default();
    let mut topic_counts: BTreeMap<usize, u32> = BTreeMap::new();

    for message in log.iter().filter(|m| m.role == Role::User) {
        match analyze_sentiment(&message.text) {
            Sentiment::Positif => sentiments.positif += 1,
            Sentiment::Negatif => sentiments.negatif += 1,
            Sentiment::Netral => sentiments.netral += 1,
        }
        let topic = extract_topic(&message.text);
        let slot = Topic::ALL.iter().position(|t| *t == topic).unwrap_or(Topic::ALL.len() - 1);
        *topic_counts.entry(slot).or_default() += 1;
    }

    let topics = topic_counts
        .into_iter()
        .map(|(slot, count)| TopicCount {
            topic: Topic::ALL[slot],
            count,
        })
        .collect();

    ConversationInsights {
        sentiments,
        topics,
        usage: daily_usage(log),
    }
}

fn daily_usage(log: &[Message]) -> Vec<DailyUsage> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for at in log.iter().filter_map(|m| m.timestamp) {
        *per_day.entry(at.date_naive()).or_default() += 1;
    }

    let (Some(&first), Some(&last)) = (per_day.keys().next(), per_day.keys().next_back()) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|date| DailyUsage {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
