//! Shell settings
//!
//! Defaults can be overridden from the environment:
//!
//! ```text
//! RPN_VERBOSE     show the cause of wrapped errors (any value)
//! RPN_PROMPT      interactive prompt
//! RPN_HISTORY     history file
//! RPN_RC          startup file
//! RPN_IFMT        input format tag
//! RPN_OFMT        output format tag
//! RPN_PRECISION   output rounding precision
//! ```

use crate::machine::Format;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PROMPT: &str = "> ";
pub const HISTORY_FILE: &str = ".rpn_history";
pub const RC_FILE: &str = ".rpnrc";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verbose: bool,
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub rc_file: Option<PathBuf>,
    pub input_format: Format,
    pub output_format: Format,
    pub precision: Option<i64>,
}

/// Home directory
pub fn dirs_home() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs_home();
        Config {
            verbose: false,
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: home.as_ref().map(|h| h.join(HISTORY_FILE)),
            rc_file: home.as_ref().map(|h| h.join(RC_FILE)),
            input_format: Format::default(),
            output_format: Format::default(),
            precision: None,
        }
    }
}

impl Config {
    /// Defaults overridden from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Defaults overridden by `lookup`; bad values are warned about and skipped
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if lookup("RPN_VERBOSE").is_some() {
            config.verbose = true;
        }
        if let Some(prompt) = lookup("RPN_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(path) = lookup("RPN_HISTORY") {
            config.history_file = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("RPN_RC") {
            config.rc_file = Some(PathBuf::from(path));
        }
        if let Some(tag) = lookup("RPN_IFMT") {
            match Format::from_tag(&tag) {
                Some(format) => config.input_format = format,
                None => warn!("RPN_IFMT: no such format {:?}", tag),
            }
        }
        if let Some(tag) = lookup("RPN_OFMT") {
            match Format::from_tag(&tag) {
                Some(format) => config.output_format = format,
                None => warn!("RPN_OFMT: no such format {:?}", tag),
            }
        }
        if let Some(text) = lookup("RPN_PRECISION") {
            match text.trim().parse::<i64>() {
                Ok(precision) => config.precision = Some(precision),
                Err(_) => warn!("RPN_PRECISION: bad precision {:?}", text),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_with(&[]);
        assert!(!config.verbose);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.input_format, Format::Float);
        assert_eq!(config.precision, None);
    }

    #[test]
    fn overrides() {
        let config = config_with(&[
            ("RPN_VERBOSE", "1"),
            ("RPN_PROMPT", "rpn> "),
            ("RPN_OFMT", "c"),
            ("RPN_PRECISION", "3"),
            ("RPN_RC", "/tmp/rc"),
        ]);
        assert!(config.verbose);
        assert_eq!(config.prompt, "rpn> ");
        assert_eq!(config.output_format, Format::Complex);
        assert_eq!(config.precision, Some(3));
        assert_eq!(config.rc_file, Some(PathBuf::from("/tmp/rc")));
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = config_with(&[("RPN_IFMT", "x"), ("RPN_PRECISION", "many")]);
        assert_eq!(config.input_format, Format::Float);
        assert_eq!(config.precision, None);
    }
}
