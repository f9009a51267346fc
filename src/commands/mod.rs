//! CLI Commands Module
//!
//! This module contains all CLI subcommand implementations. Every
//! command operates on the Code Scanning analyses of one repository.

pub mod delete;
pub mod list;
pub mod upload;
pub mod view;
