//! Entities exposed by the management REST API and their list configuration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{QueryError, Result},
    fiql::{build_wildcard_search, combine_with_or},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    Targets,
    TargetFilters,
    TargetTypes,
    DistributionSets,
    DistributionSetTypes,
    SoftwareModules,
    SoftwareModuleTypes,
    Actions,
    Rollouts,
}

impl Entity {
    pub const ALL: [Entity; 9] = [
        Entity::Targets,
        Entity::TargetFilters,
        Entity::TargetTypes,
        Entity::DistributionSets,
        Entity::DistributionSetTypes,
        Entity::SoftwareModules,
        Entity::SoftwareModuleTypes,
        Entity::Actions,
        Entity::Rollouts,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Targets => "targets",
            Self::TargetFilters => "target-filters",
            Self::TargetTypes => "target-types",
            Self::DistributionSets => "distribution-sets",
            Self::DistributionSetTypes => "distribution-set-types",
            Self::SoftwareModules => "software-modules",
            Self::SoftwareModuleTypes => "software-module-types",
            Self::Actions => "actions",
            Self::Rollouts => "rollouts",
        }
    }

    /// Path segment under `/rest/v1/`.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Targets => "targets",
            Self::TargetFilters => "targetfilters",
            Self::TargetTypes => "targettypes",
            Self::DistributionSets => "distributionsets",
            Self::DistributionSetTypes => "distributionsettypes",
            Self::SoftwareModules => "softwaremodules",
            Self::SoftwareModuleTypes => "softwaremoduletypes",
            Self::Actions => "actions",
            Self::Rollouts => "rollouts",
        }
    }

    /// Fields the free-text search box matches against.
    pub const fn search_fields(self) -> &'static [&'static str] {
        match self {
            Self::Targets => &["name", "controllerId"],
            Self::TargetFilters => &["name"],
            Self::TargetTypes | Self::DistributionSetTypes | Self::SoftwareModuleTypes => {
                &["name", "key"]
            }
            Self::DistributionSets | Self::SoftwareModules => &["name", "version"],
            Self::Actions => &["target.name", "distributionSet.name"],
            Self::Rollouts => &["name", "description"],
        }
    }

    pub const fn sort_fields(self) -> &'static [&'static str] {
        match self {
            Self::Targets => &[
                "id",
                "name",
                "controllerId",
                "updateStatus",
                "lastControllerRequestAt",
                "createdAt",
                "lastModifiedAt",
            ],
            Self::TargetFilters => &["id", "name", "createdAt", "lastModifiedAt"],
            Self::TargetTypes | Self::DistributionSetTypes | Self::SoftwareModuleTypes => {
                &["id", "name", "key", "createdAt", "lastModifiedAt"]
            }
            Self::DistributionSets | Self::SoftwareModules => &[
                "id",
                "name",
                "version",
                "type",
                "createdAt",
                "lastModifiedAt",
            ],
            Self::Actions => &["id", "status", "detailStatus", "weight", "createdAt"],
            Self::Rollouts => &["id", "name", "status", "createdAt", "lastModifiedAt"],
        }
    }

    /// OR-combined wildcard search over [`Entity::search_fields`].
    pub fn search(self, term: &str) -> String {
        build_search(self.search_fields(), term)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|entity| entity.name() == needle || entity.path() == needle)
            .ok_or_else(|| QueryError::UnknownEntity(s.to_string()))
    }
}

/// OR-combines a wildcard search of `term` over every field.
///
/// # Examples
///
/// ```
/// use fleetq_query::entity::build_search;
///
/// assert_eq!(build_search(&["name", "controllerId"], "gw"), "name==*gw*,controllerId==*gw*");
/// assert_eq!(build_search(&["name"], " "), "");
/// ```
pub fn build_search<S: AsRef<str>>(fields: &[S], term: &str) -> String {
    combine_with_or(
        fields
            .iter()
            .map(|field| build_wildcard_search(field.as_ref(), term)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_path() {
        assert_eq!(
            "distribution-sets".parse::<Entity>().unwrap(),
            Entity::DistributionSets
        );
        assert_eq!(
            "softwaremodules".parse::<Entity>().unwrap(),
            Entity::SoftwareModules
        );
        assert_eq!(" Targets ".parse::<Entity>().unwrap(), Entity::Targets);
    }

    #[test]
    fn test_parse_unknown_entity() {
        assert!(matches!(
            "devices".parse::<Entity>(),
            Err(QueryError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = Entity::ALL.iter().map(|e| e.name()).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Entity::ALL.len());
    }

    #[test]
    fn test_target_search() {
        assert_eq!(
            Entity::Targets.search("gw"),
            "name==*gw*,controllerId==*gw*"
        );
        assert_eq!(Entity::TargetFilters.search("lab"), "name==*lab*");
        assert_eq!(Entity::Rollouts.search(""), "");
    }

    #[test]
    fn test_entity_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Entity::SoftwareModuleTypes).unwrap();
        assert_eq!(json, "\"software-module-types\"");
    }
}
