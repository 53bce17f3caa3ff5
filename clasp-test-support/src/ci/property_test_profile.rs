//! Property-test run profile read from the environment.
//!
//! Suites call [`ProptestRunProfile::load`] with their own defaults so CI can
//! raise case counts or enable forking without touching test code.

use std::{env, str::FromStr};

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const CLASP_PBT_FORK_ENV_KEY: &str = "CLASP_PBT_FORK";

/// Resolved property-test settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, keeping the defaults for unset or
    /// malformed values.
    ///
    /// # Examples
    /// ```
    /// use clasp_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, |raw| {
                raw.parse::<CaseCount>().map(|count| count.0)
            }),
            fork: override_or(CLASP_PBT_FORK_ENV_KEY, default_fork, parse_switch),
        }
    }

    /// Cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub fn fork(&self) -> bool { self.fork }
}

struct CaseCount(u32);

impl FromStr for CaseCount {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().parse::<u32>() {
            Ok(0) => Err("case count must be positive"),
            Ok(count) => Ok(Self(count)),
            Err(_) => Err("case count is not an unsigned integer"),
        }
    }
}

fn parse_switch(raw: &str) -> Result<bool, &'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true/false, yes/no, on/off or 1/0"),
    }
}

fn override_or<T>(key: &'static str, default: T, parse: impl Fn(&str) -> Result<T, &'static str>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(env = key, raw = %raw, reason, "ignoring property-test override");
        default
    })
}
