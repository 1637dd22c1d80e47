// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::Category;
use crate::domain::repositories::category_repository::CategoryRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::api::ApiPath;
use axum::{extract::Extension, Json};
use std::sync::Arc;

/// 列出全部类别及子类别，任何已认证用户可读
pub async fn list_categories(
    Extension(repo): Extension<Arc<dyn CategoryRepository>>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = repo.list_all().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    Extension(repo): Extension<Arc<dyn CategoryRepository>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Category>, AppError> {
    match repo.find_by_id(id).await? {
        Some(category) => Ok(Json(category)),
        None => Err(RepositoryError::NotFound.into()),
    }
}
