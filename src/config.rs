use std::env;
use std::str::FromStr;

/// Entering/leaving variable selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PivotRule {
    /// Most improving reduced cost, first occurrence on ties; minimum ratio, first row on ties.
    Dantzig,
    /// First improving column by variable index; minimum ratio, smallest basic index on ties.
    Bland,
}

impl Default for PivotRule {
    fn default() -> Self {
        PivotRule::Dantzig
    }
}

impl FromStr for PivotRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dantzig" => Ok(PivotRule::Dantzig),
            "bland" => Ok(PivotRule::Bland),
            other => Err(format!("unknown pivot rule `{}`", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub pivot_rule: PivotRule,
    /// Consecutive degenerate pivots after which Bland's rule takes over; `None` never switches.
    pub degenerate_pivot_limit: Option<usize>,
    /// Stop branching below nodes whose relaxation cannot beat the incumbent.
    pub incumbent_pruning: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_rule: PivotRule::Dantzig,
            degenerate_pivot_limit: Some(50),
            incumbent_pruning: true,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pivot_rule(mut self, pivot_rule: PivotRule) -> Self {
        self.pivot_rule = pivot_rule;
        self
    }

    pub fn with_degenerate_pivot_limit(mut self, limit: Option<usize>) -> Self {
        self.degenerate_pivot_limit = limit;
        self
    }

    pub fn with_incumbent_pruning(mut self, incumbent_pruning: bool) -> Self {
        self.incumbent_pruning = incumbent_pruning;
        self
    }

    /// Reads `LP_PIVOT_RULE`, `LP_DEGENERATE_PIVOT_LIMIT` (0 disables the switch) and
    /// `LP_INCUMBENT_PRUNING`; anything missing or unparsable keeps its default.
    pub fn from_env() -> Self {
        let default = Self::default();

        let pivot_rule = env::var("LP_PIVOT_RULE")
            .ok()
            .and_then(|s| s.parse::<PivotRule>().ok())
            .unwrap_or(default.pivot_rule);

        let degenerate_pivot_limit = env::var("LP_DEGENERATE_PIVOT_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .map(|limit| if limit == 0 { None } else { Some(limit) })
            .unwrap_or(default.degenerate_pivot_limit);

        let incumbent_pruning = env::var("LP_INCUMBENT_PRUNING")
            .ok()
            .and_then(|s| s.trim().parse::<bool>().ok())
            .unwrap_or(default.incumbent_pruning);

        Self {
            pivot_rule,
            degenerate_pivot_limit,
            incumbent_pruning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pivot_rules() {
        assert_eq!("Bland".parse::<PivotRule>(), Ok(PivotRule::Bland));
        assert_eq!(" dantzig ".parse::<PivotRule>(), Ok(PivotRule::Dantzig));
        assert!("steepest".parse::<PivotRule>().is_err());
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = SolverConfig::new()
            .with_pivot_rule(PivotRule::Bland)
            .with_degenerate_pivot_limit(None)
            .with_incumbent_pruning(false);
        assert_eq!(config.pivot_rule, PivotRule::Bland);
        assert_eq!(config.degenerate_pivot_limit, None);
        assert!(!config.incumbent_pruning);
    }

    #[test]
    fn reads_environment_with_fallbacks() {
        //single test so no other test observes these variables mid-change
        env::set_var("LP_PIVOT_RULE", "BLAND");
        env::set_var("LP_DEGENERATE_PIVOT_LIMIT", "0");
        env::set_var("LP_INCUMBENT_PRUNING", "false");
        let config = SolverConfig::from_env();
        assert_eq!(config.pivot_rule, PivotRule::Bland);
        assert_eq!(config.degenerate_pivot_limit, None);
        assert!(!config.incumbent_pruning);

        env::set_var("LP_PIVOT_RULE", "steepest");
        env::set_var("LP_DEGENERATE_PIVOT_LIMIT", "abc");
        env::set_var("LP_INCUMBENT_PRUNING", "nope");
        assert_eq!(SolverConfig::from_env(), SolverConfig::default());

        env::set_var("LP_DEGENERATE_PIVOT_LIMIT", " 7 ");
        assert_eq!(SolverConfig::from_env().degenerate_pivot_limit, Some(7));

        env::remove_var("LP_PIVOT_RULE");
        env::remove_var("LP_DEGENERATE_PIVOT_LIMIT");
        env::remove_var("LP_INCUMBENT_PRUNING");
        let config = SolverConfig::from_env();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.degenerate_pivot_limit, Some(50));
        assert!(config.incumbent_pruning);
    }
}
