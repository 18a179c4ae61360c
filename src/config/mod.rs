//! Configuration module
//!
//! This module contains all configuration-related functionality:
//! provider settings, display options and default behaviour.

pub mod config;
