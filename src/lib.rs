pub mod action;
pub mod admin;
pub mod app;
pub mod async_task;
pub mod classify;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod main_lib;
pub mod navigator;
pub mod record;
pub mod screenshot;
pub mod store;
pub mod tree;
pub mod ui;
