// SPDX-License-Identifier: GPL-3.0-or-later

pub mod application;
pub mod args;
pub mod buildlog;
pub mod catalog;
pub mod compilation_database;
pub mod config;
pub mod configuration;
pub mod context;
pub mod output;
pub mod paths;
pub mod settings;
