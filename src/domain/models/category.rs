// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 工单类别
///
/// 目录数据由外部维护，本系统只读。坐席与类别是多对多关系，
/// 分配算法只在类别的坐席集合内挑选。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    /// 该类别下的子类别
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// 子类别，只属于一个类别
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}
