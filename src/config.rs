use crate::data::aggregate::DEFAULT_FEATURED_ROLE;
use crate::data::loader::DataSource;

/// Dataset published with the original salary survey dashboard.
pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/SirNaito/ipda-streamlit-dashboard/refs/heads/main/dados-imersao-final.csv";

/// Environment variable overriding the data source.
pub const SOURCE_ENV: &str = "SALARY_DASHBOARD_SOURCE";
/// Environment variable overriding the role charted per country.
pub const ROLE_ENV: &str = "SALARY_DASHBOARD_ROLE";

// ---------------------------------------------------------------------------
// Start-up configuration
// ---------------------------------------------------------------------------

/// Settings resolved once at start-up. Only the application shell reads
/// these; the data layer takes everything as arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub featured_role: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Url(DEFAULT_SOURCE_URL.to_string()),
            featured_role: DEFAULT_FEATURED_ROLE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment. A `.env` file in
    /// the working directory is read first.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {e}");
            }
        }
        Self::resolve(
            std::env::args().nth(1),
            std::env::var(SOURCE_ENV).ok(),
            std::env::var(ROLE_ENV).ok(),
        )
    }

    /// Precedence: positional argument, then environment, then defaults.
    /// Blank values count as unset.
    pub fn resolve(arg: Option<String>, source_env: Option<String>, role_env: Option<String>) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let defaults = Self::default();

        let source = non_blank(arg)
            .or_else(|| non_blank(source_env))
            .map(|s| DataSource::parse(&s))
            .unwrap_or(defaults.source);
        let featured_role = non_blank(role_env)
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.featured_role);

        Self {
            source,
            featured_role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let cfg = DashboardConfig::resolve(None, None, None);
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.source, DataSource::Url(DEFAULT_SOURCE_URL.to_string()));
        assert_eq!(cfg.featured_role, "Data Scientist");
    }

    #[test]
    fn test_argument_wins_over_env() {
        let cfg = DashboardConfig::resolve(
            Some("local.csv".into()),
            Some("https://example.com/other.csv".into()),
            None,
        );
        assert_eq!(cfg.source, DataSource::File(PathBuf::from("local.csv")));
    }

    #[test]
    fn test_env_source_and_role() {
        let cfg = DashboardConfig::resolve(
            None,
            Some("https://example.com/other.csv".into()),
            Some(" Data Engineer ".into()),
        );
        assert_eq!(cfg.source, DataSource::Url("https://example.com/other.csv".into()));
        assert_eq!(cfg.featured_role, "Data Engineer");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let cfg = DashboardConfig::resolve(Some("  ".into()), Some(String::new()), Some(" ".into()));
        assert_eq!(cfg, DashboardConfig::default());
    }
}
