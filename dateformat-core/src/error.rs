// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for the date-format benchmark suite.
//!
//! Formatting itself never fails once a handle exists; every error here is
//! raised while building patterns, instants or configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Debug, Error)]
pub enum DateFormatError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Invalid instant '{value}': {reason}")]
    InvalidInstant { value: String, reason: String },

    #[error("Unknown strategy: {name}")]
    UnknownStrategy { name: String },

    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Configuration validation error: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while compiling a format pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Pattern cannot be empty")]
    Empty,

    #[error("Pattern '{pattern}' contains an unrecognised specifier")]
    InvalidSpecifier { pattern: String },
}

/// Configuration values that parsed but are out of range.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias using DateFormatError.
pub type DateFormatResult<T> = Result<T, DateFormatError>;
