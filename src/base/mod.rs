//! Core components, types, and utilities for the gen-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System prompts for LLM interactions.
//! - Message blocks sent back to the chat platform.
//! - Common types and result handling.

pub mod blocks;
pub mod config;
pub mod prompts;
pub mod types;
