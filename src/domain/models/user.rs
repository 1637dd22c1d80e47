// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 用户角色枚举
///
/// 请求者提交工单，坐席处理工单，管理员拥有全局权限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// 请求者，工单的创建人
    #[default]
    Requester,
    /// 坐席，被分配到类别并处理工单
    Agent,
    /// 管理员
    Administrator,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserRole::Requester => write!(f, "requester"),
            UserRole::Agent => write!(f, "agent"),
            UserRole::Administrator => write!(f, "administrator"),
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requester" | "user" => Ok(UserRole::Requester),
            "agent" => Ok(UserRole::Agent),
            "administrator" | "admin" => Ok(UserRole::Administrator),
            _ => Err(()),
        }
    }
}

/// 用户实体
///
/// 身份系统的只读投影，本系统不负责用户的创建与凭证签发。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 当前调用者
///
/// 由认证中间件解析得到，所有生命周期操作都以它作为授权依据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: i32,
    pub role: UserRole,
}

impl Caller {
    pub fn new(id: i32, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Administrator
    }

    pub fn is_agent(&self) -> bool {
        self.role == UserRole::Agent
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}
