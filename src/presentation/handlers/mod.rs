// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod category_handler;
pub mod dashboard_handler;
pub mod note_handler;
pub mod ticket_handler;
pub mod transfer_handler;
