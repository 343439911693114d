use std::env;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
pub const MAX_DEPTH_ENV: &str = "RANGE_LANG_MAX_DEPTH";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Nested function calls allowed before analysis gives up.
    pub max_call_depth: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl AnalysisOptions {
    pub fn from_flag_or_env(flag: Option<usize>) -> Self {
        let env_value = env::var(MAX_DEPTH_ENV).ok();
        Self::resolve(flag, env_value.as_deref())
    }

    fn resolve(flag: Option<usize>, env_value: Option<&str>) -> Self {
        let max_call_depth = flag
            .or_else(|| env_value.and_then(|raw| raw.trim().parse().ok()))
            .unwrap_or(DEFAULT_MAX_CALL_DEPTH);
        Self { max_call_depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        assert_eq!(AnalysisOptions::resolve(Some(8), Some("99")).max_call_depth, 8);
        assert_eq!(AnalysisOptions::resolve(None, Some(" 99 ")).max_call_depth, 99);
    }

    #[test]
    fn invalid_environment_falls_back_to_default() {
        assert_eq!(
            AnalysisOptions::resolve(None, Some("lots")).max_call_depth,
            DEFAULT_MAX_CALL_DEPTH
        );
        assert_eq!(
            AnalysisOptions::resolve(None, Some("")).max_call_depth,
            DEFAULT_MAX_CALL_DEPTH
        );
        assert_eq!(AnalysisOptions::resolve(None, None), AnalysisOptions::default());
    }
}
