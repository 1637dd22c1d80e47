// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

/// 最少活跃工单优先的坐席选择
///
/// # 参数
///
/// * `eligible` - 类别下的坐席ID，按ID升序
/// * `active_counts` - 稀疏的活跃工单数，缺失的坐席视为 0
///
/// # 返回值
///
/// 活跃工单最少的坐席；并列时取 `eligible` 中靠前的那个。
/// 没有可选坐席时返回 `None`。
pub fn select_least_loaded(eligible: &[i32], active_counts: &HashMap<i32, u64>) -> Option<i32> {
    let mut best: Option<(i32, u64)> = None;

    for &agent_id in eligible {
        let load = active_counts.get(&agent_id).copied().unwrap_or(0);
        match best {
            Some((_, best_load)) if load >= best_load => {}
            _ => best = Some((agent_id, load)),
        }
    }

    best.map(|(agent_id, _)| agent_id)
}

#[cfg(test)]
#[path = "assignment_selector_test.rs"]
mod tests;
