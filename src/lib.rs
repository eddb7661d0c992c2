// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod db;
pub mod logging;
pub mod models;
pub mod period;
pub mod prices;
pub mod session;
pub mod summary;
pub mod utils;
pub mod valuation;
