// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::TicketPriority;

/// 按优先级从高到低排列的关键词表，命中的第一档即为结果
const TIERS: [(TicketPriority, &[&str]); 3] = [
    (
        TicketPriority::Urgent,
        &["outage", "critical", "down", "urgent", "broken"],
    ),
    (
        TicketPriority::High,
        &["error", "fail", "slow", "no internet"],
    ),
    (
        TicketPriority::Low,
        &["question", "inquiry", "how to", "request"],
    ),
];

/// 优先级分类器
///
/// 对标题和描述做不区分大小写的子串匹配。匹配是纯子串，
/// 所以 "download" 会命中 "down"。
pub struct PriorityClassifier;

impl PriorityClassifier {
    /// 根据标题和描述计算优先级，未命中任何关键词时返回 Medium
    pub fn classify(title: &str, description: &str) -> TicketPriority {
        let content = format!("{} {}", title, description).to_lowercase();

        TIERS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| content.contains(kw)))
            .map(|(priority, _)| *priority)
            .unwrap_or(TicketPriority::Medium)
    }
}
