use crate::testrun::Outcome;
use clap::ValueEnum;
use colored::*;
use std::env;
use std::io::IsTerminal;

/// Percentages at or above this render green.
pub const GOOD_COVERAGE: f64 = 80.0;
/// Percentages at or above this (and below [`GOOD_COVERAGE`]) render yellow.
pub const FAIR_COVERAGE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }
}

/// Colors report values according to a [`FormattingConfig`].
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// `12.5%`, colored by coverage band.
    pub fn percent(&self, pct: f64) -> String {
        let text = format!("{:.1}%", pct);
        if !self.enabled {
            return text;
        }
        if pct >= GOOD_COVERAGE {
            text.green().to_string()
        } else if pct >= FAIR_COVERAGE {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    pub fn outcome(&self, outcome: Outcome) -> String {
        let text = match outcome {
            Outcome::Passed => "PASS",
            Outcome::Failed => "FAIL",
            Outcome::Skipped => "SKIP",
            Outcome::Unknown => "????",
        };
        if !self.enabled {
            return text.to_string();
        }
        match outcome {
            Outcome::Passed => text.green().to_string(),
            Outcome::Failed => text.red().bold().to_string(),
            Outcome::Skipped => text.yellow().to_string(),
            Outcome::Unknown => text.dimmed().to_string(),
        }
    }

    pub fn header(&self, text: &str) -> String {
        if self.enabled {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_color_modes() {
        assert!(ColorMode::Always.should_use_color());
        assert!(!ColorMode::Never.should_use_color());
        assert!(!Palette::new(FormattingConfig::new(ColorMode::Never)).enabled());
    }

    #[test]
    fn test_plain_palette_has_no_escapes() {
        let palette = Palette::plain();
        assert_eq!(palette.percent(66.66), "66.7%");
        assert_eq!(palette.outcome(Outcome::Failed), "FAIL");
        assert_eq!(palette.header("Coverage"), "Coverage");
    }
}
