use std::path::PathBuf;

use crate::config::AnalyticsConfig;

/// Command-line arguments split into `--key value` flags and positionals.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub flags: Vec<(String, String)>,
    pub positional: Vec<String>,
}

impl CliArgs {
    pub fn from_env() -> Self {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::parse(&args)
    }

    // Accepts both `--key=value` and `--key value`.
    pub fn parse(args: &[String]) -> Self {
        let mut out = Self::default();
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            let Some(key) = arg.strip_prefix("--") else {
                out.positional.push(arg.clone());
                continue;
            };
            if let Some((k, v)) = key.split_once('=') {
                out.flags.push((k.to_string(), v.trim().to_string()));
            } else if let Some(next) = iter.next_if(|n| !n.starts_with("--")) {
                out.flags.push((key.to_string(), next.trim().to_string()));
            } else {
                out.flags.push((key.to_string(), String::new()));
            }
        }
        out
    }

    /// Last non-empty value given for `key`.
    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// `--data` and `--out` take precedence over the environment.
    pub fn apply_overrides(&self, cfg: &mut AnalyticsConfig) {
        if let Some(path) = self.flag("data") {
            cfg.data_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = self.flag("out") {
            cfg.output_dir = PathBuf::from(dir);
        }
    }
}
