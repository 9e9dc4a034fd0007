//! Built-in advisory and "latest version" tables.
//!
//! These are static lookup data, swapped out by injecting another
//! `VulnerabilitySource` or latest-version map. They are not a curated
//! advisory feed.

use std::collections::HashMap;

use crate::domain::entities::dependency::VulnerabilityRecord;
use crate::domain::value_objects::{AdvisorySeverity, Ecosystem};

struct AdvisoryDef {
    ecosystem: Ecosystem,
    package: &'static str,
    affected_range: &'static str,
    advisory_id: &'static str,
    severity: AdvisorySeverity,
    description: &'static str,
    fixed_in: Option<&'static str>,
}

static ADVISORIES: &[AdvisoryDef] = &[
    AdvisoryDef {
        ecosystem: Ecosystem::Npm,
        package: "lodash",
        affected_range: "<4.17.21",
        advisory_id: "GHSA-35jh-r3h4-6jhm",
        severity: AdvisorySeverity::High,
        description: "Command injection via template",
        fixed_in: Some("4.17.21"),
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Npm,
        package: "minimist",
        affected_range: "<1.2.6",
        advisory_id: "GHSA-xvch-5gv4-984h",
        severity: AdvisorySeverity::Critical,
        description: "Prototype pollution",
        fixed_in: Some("1.2.6"),
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Npm,
        package: "axios",
        affected_range: "<1.6.0",
        advisory_id: "GHSA-wf5p-g6vw-rhxx",
        severity: AdvisorySeverity::Moderate,
        description: "Cross-site request forgery",
        fixed_in: Some("1.6.0"),
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Npm,
        package: "event-stream",
        affected_range: "3.3.6",
        advisory_id: "GHSA-mh6f-8j2x-4483",
        severity: AdvisorySeverity::Critical,
        description: "Malicious package",
        fixed_in: None,
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Go,
        package: "golang.org/x/net",
        affected_range: "<0.17.0",
        advisory_id: "GO-2023-2102",
        severity: AdvisorySeverity::High,
        description: "HTTP/2 rapid reset can cause excessive work",
        fixed_in: Some("0.17.0"),
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Go,
        package: "github.com/gin-gonic/gin",
        affected_range: "<1.9.1",
        advisory_id: "GO-2023-1737",
        severity: AdvisorySeverity::Moderate,
        description: "Improper handling of filenames in Context.FileAttachment",
        fixed_in: Some("1.9.1"),
    },
    AdvisoryDef {
        ecosystem: Ecosystem::Pip,
        package: "requests",
        affected_range: "<2.31.0",
        advisory_id: "GHSA-j8r2-6x86-q33q",
        severity: AdvisorySeverity::Moderate,
        description: "Proxy-Authorization header leak on redirect",
        fixed_in: Some("2.31.0"),
    },
];

static LATEST_VERSIONS: &[(Ecosystem, &str, &str)] = &[
    (Ecosystem::Npm, "react", "18.3.1"),
    (Ecosystem::Npm, "typescript", "5.4.5"),
    (Ecosystem::Npm, "vite", "5.4.0"),
    (Ecosystem::Npm, "@types/node", "20.17.0"),
    (Ecosystem::Npm, "lodash", "4.17.21"),
    (Ecosystem::Npm, "axios", "1.7.2"),
    (Ecosystem::Go, "github.com/gin-gonic/gin", "v1.10.0"),
    (Ecosystem::Go, "golang.org/x/net", "v0.26.0"),
    (Ecosystem::Cargo, "serde", "1.0.203"),
    (Ecosystem::Pip, "requests", "2.32.3"),
];

/// Advisories keyed by `(ecosystem, package)`.
pub type AdvisoryTable = HashMap<(Ecosystem, String), Vec<VulnerabilityRecord>>;

/// Latest known version keyed by `(ecosystem, package)`.
pub type LatestVersionTable = HashMap<(Ecosystem, String), String>;

pub fn builtin_advisories() -> AdvisoryTable {
    let mut table = AdvisoryTable::new();
    for def in ADVISORIES {
        table
            .entry((def.ecosystem, def.package.to_string()))
            .or_default()
            .push(VulnerabilityRecord {
                package: def.package.to_string(),
                affected_range: def.affected_range.to_string(),
                advisory_id: def.advisory_id.to_string(),
                severity: def.severity,
                description: def.description.to_string(),
                fixed_in: def.fixed_in.map(str::to_string),
            });
    }
    table
}

pub fn builtin_latest_versions() -> LatestVersionTable {
    LATEST_VERSIONS
        .iter()
        .map(|(eco, name, version)| ((*eco, name.to_string()), version.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lodash_advisory_is_fixed_in_4_17_21() {
        let table = builtin_advisories();
        let lodash = &table[&(Ecosystem::Npm, "lodash".to_string())];
        assert_eq!(lodash.len(), 1);
        assert_eq!(lodash[0].fixed_in.as_deref(), Some("4.17.21"));
    }

    #[test]
    fn latest_table_is_keyed_by_ecosystem() {
        let latest = builtin_latest_versions();
        assert!(latest.contains_key(&(Ecosystem::Npm, "react".to_string())));
        assert!(!latest.contains_key(&(Ecosystem::Go, "react".to_string())));
    }
}
