//! Config-level validation coordinator.
//!
//! Runs every check over a whole [`Config`] and collects the results into a
//! structured report that the transaction system uses to decide whether to
//! allow or block a save:
//! - binding and profile header checks (`core/validator.rs`)
//! - profile name uniqueness and default-profile lookup
//! - per-profile conflict detection
//! - cursor detection, window and playback tuning ranges
//!
//! # Example
//! ```
//! use overlay_hotkeys::config::validator::ConfigValidator;
//! use overlay_hotkeys::core::Config;
//!
//! let report = ConfigValidator::new().validate(&Config::default());
//!
//! if report.has_errors() {
//!     println!("Validation failed - cannot save");
//! } else {
//!     println!("{} conflict(s)", report.conflicts.len());
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::core::validator::{validate_binding, validate_process_name, validate_profile_header};
use crate::core::{actions, detect_conflicts, Config, Conflict};
use crate::cursor::MIN_INTERVAL_MS;

/// Validation severity level
///
/// Determines how the transaction system handles the issue:
/// - **Error**: Blocks the save
/// - **Warning**: Allowed, but logged and shown to the user
/// - **Info**: Informational only
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Error => write!(f, "error"),
            ValidationLevel::Warning => write!(f, "warning"),
            ValidationLevel::Info => write!(f, "info"),
        }
    }
}

/// A single validation issue found in the config
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Profile the issue belongs to, if any
    pub profile: Option<String>,
    /// Index of the binding within that profile (0-based)
    pub binding_index: Option<usize>,
    pub validation_level: ValidationLevel,
    /// Human-readable description of the issue
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.profile, self.binding_index) {
            (Some(profile), Some(index)) => write!(f, "[{} #{}] ", profile, index)?,
            (Some(profile), None) => write!(f, "[{}] ", profile)?,
            _ => {}
        }
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// A conflict inside one profile
#[derive(Clone, Debug)]
pub struct ProfileConflict {
    pub profile: String,
    pub conflict: Conflict,
}

/// Complete validation report for a config
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// All validation issues (errors, warnings, info)
    pub issues: Vec<ValidationIssue>,
    /// Signature conflicts, grouped per profile
    pub conflicts: Vec<ProfileConflict>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the report contains any Error-level issues
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.validation_level == ValidationLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues_at(ValidationLevel::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues_at(ValidationLevel::Warning).count()
    }

    pub fn issues_at(&self, level: ValidationLevel) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.validation_level == level)
    }

    fn push(
        &mut self,
        level: ValidationLevel,
        profile: Option<&str>,
        binding_index: Option<usize>,
        message: String,
        suggestion: Option<String>,
    ) {
        self.issues.push(ValidationIssue {
            profile: profile.map(str::to_string),
            binding_index,
            validation_level: level,
            message,
            suggestion,
        });
    }

    /// Adds an Error-level issue to the report
    pub fn add_error(&mut self, profile: Option<&str>, binding_index: Option<usize>, message: String) {
        self.push(ValidationLevel::Error, profile, binding_index, message, None);
    }

    /// Adds a Warning-level issue to the report
    pub fn add_warning(
        &mut self,
        profile: Option<&str>,
        binding_index: Option<usize>,
        message: String,
        suggestion: Option<String>,
    ) {
        self.push(ValidationLevel::Warning, profile, binding_index, message, suggestion);
    }

    /// Adds an Info-level issue to the report
    pub fn add_info(&mut self, profile: Option<&str>, binding_index: Option<usize>, message: String) {
        self.push(ValidationLevel::Info, profile, binding_index, message, None);
    }
}

/// Runs every config check
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates a complete config.
    pub fn validate(&self, config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.check_profiles(config, &mut report);
        self.check_cursor_detection(config, &mut report);
        self.check_window(config, &mut report);
        self.check_playback(config, &mut report);

        report
    }

    fn check_profiles(&self, config: &Config, report: &mut ValidationReport) {
        if config.profiles.is_empty() {
            report.add_warning(
                None,
                None,
                "Config has no profiles".to_string(),
                Some("the built-in default profile is used instead".to_string()),
            );
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (index, profile) in config.profiles.iter().enumerate() {
            let name = profile.name.as_str();

            if let Err(e) = validate_profile_header(profile) {
                report.add_error(Some(name), None, e.to_string());
            }

            let key = profile.name.trim().to_lowercase();
            if !key.is_empty() {
                if let Some(first) = seen.insert(key, index) {
                    report.add_error(
                        Some(name),
                        None,
                        format!("Duplicate profile name (also profile #{})", first),
                    );
                }
            }

            for (i, binding) in profile.bindings.iter().enumerate() {
                if let Err(e) = validate_binding(binding) {
                    report.add_error(Some(name), Some(i), e.to_string());
                    continue;
                }
                if !actions::is_builtin(&binding.action) {
                    report.add_warning(
                        Some(name),
                        Some(i),
                        format!("Unknown action '{}'", binding.action),
                        Some("it only works if a plugin registers it".to_string()),
                    );
                }
                if !binding.is_bound() {
                    report.add_info(Some(name), Some(i), format!("'{}' has no key assigned", binding.action));
                }
            }

            for (signature, bindings) in detect_conflicts(profile.bindings.iter()) {
                let names: Vec<&str> = bindings.iter().map(|b| b.action.as_str()).collect();
                report.add_warning(
                    Some(name),
                    None,
                    format!("{} is bound to {}", signature, names.join(", ")),
                    Some(format!("only '{}' will fire", names[0])),
                );
                report.conflicts.push(ProfileConflict {
                    profile: profile.name.clone(),
                    conflict: Conflict {
                        signature,
                        conflicting_bindings: bindings.into_iter().cloned().collect(),
                    },
                });
            }
        }

        if let Some(default) = &config.default_profile {
            if config.profile(default).is_none() {
                report.add_warning(
                    None,
                    None,
                    format!("Default profile '{}' does not exist", default),
                    Some("the first profile is used instead".to_string()),
                );
            }
        }
    }

    fn check_cursor_detection(&self, config: &Config, report: &mut ValidationReport) {
        let settings = &config.cursor_detection;

        for process in &settings.process_whitelist {
            if let Err(e) = validate_process_name(process) {
                report.add_error(None, None, format!("Cursor detection whitelist: {}", e));
            }
        }

        if settings.enabled && settings.normalized_whitelist().is_empty() {
            report.add_warning(
                None,
                None,
                "Cursor detection is enabled but the process whitelist is empty".to_string(),
                Some("add the game's executable name".to_string()),
            );
        }

        if settings.interval_ms < MIN_INTERVAL_MS {
            report.add_info(
                None,
                None,
                format!(
                    "Cursor detection interval {}ms is raised to {}ms",
                    settings.interval_ms, MIN_INTERVAL_MS
                ),
            );
        }
    }

    fn check_window(&self, config: &Config, report: &mut ValidationReport) {
        let window = &config.window;
        let in_unit = |v: f64| v > 0.0 && v <= 1.0;

        for (field, value) in [
            ("opacity", window.opacity),
            ("minOpacity", window.min_opacity),
            ("clickThroughOpacity", window.click_through_opacity),
        ] {
            if !in_unit(value) {
                report.add_warning(
                    None,
                    None,
                    format!("window.{} = {} is outside (0, 1]", field, value),
                    Some("it is clamped when applied".to_string()),
                );
            }
        }

        if window.opacity_step <= 0.0 {
            report.add_warning(
                None,
                None,
                format!("window.opacityStep = {} has no effect", window.opacity_step),
                None,
            );
        }
    }

    fn check_playback(&self, config: &Config, report: &mut ValidationReport) {
        let playback = &config.playback;

        if playback.min_rate <= 0.0 || playback.min_rate > playback.max_rate {
            report.add_error(
                None,
                None,
                format!(
                    "playback rate range {}..{} is invalid",
                    playback.min_rate, playback.max_rate
                ),
            );
        }

        if playback.rate_step <= 0.0 {
            report.add_warning(
                None,
                None,
                format!("playback.rateStep = {} has no effect", playback.rate_step),
                None,
            );
        }

        if playback.seek_seconds <= 0.0 {
            report.add_warning(
                None,
                None,
                format!("playback.seekSeconds = {} has no effect", playback.seek_seconds),
                None,
            );
        }
    }
}
