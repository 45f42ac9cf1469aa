//! # Social Media Autopilot Telegram Bot
//!
//! A Telegram bot that walks users through a menu (niche selection, content
//! upload, YouTube to Reel, settings, analytics) and answers with canned
//! captions and hashtags for the user's niche.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod logging;
pub mod menu;
pub mod niche;
pub mod profile_store;
pub mod staging;
pub mod suggestions;
pub mod youtube;
