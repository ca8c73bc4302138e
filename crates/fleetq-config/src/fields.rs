use std::collections::BTreeMap;

use documented::{Documented, DocumentedFields};
use fleetq_query::{Entity, FilterOptions};
use serde::{Deserialize, Serialize};

/// Field handling for one entity's filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Documented, DocumentedFields)]
#[serde(default)]
pub struct EntityFields {
    /// Fields whose filter values are already backend syntax and are passed
    /// through without escaping.
    pub raw_fields: Vec<String>,

    /// Renames dashboard field names to backend FIQL field names.
    pub field_map: BTreeMap<String, String>,
}

impl EntityFields {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            field_map: self.field_map.clone(),
            raw_fields: self.raw_fields.iter().cloned().collect(),
        }
    }
}

fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(ui, backend)| (ui.to_string(), backend.to_string()))
        .collect()
}

/// Field tables written by `defconfig`.
pub fn default_entity_fields() -> BTreeMap<String, EntityFields> {
    BTreeMap::from([
        (
            Entity::Targets.name().to_string(),
            EntityFields {
                field_map: mapping(&[
                    ("assignedDistributionSet", "assignedds.name"),
                    ("installedDistributionSet", "installedds.name"),
                    ("lastControllerRequestAt", "lastcontrollerrequestat"),
                    ("targetType", "targettype.name"),
                    ("updateStatus", "updatestatus"),
                ]),
                raw_fields: Vec::new(),
            },
        ),
        (
            Entity::Actions.name().to_string(),
            EntityFields {
                field_map: mapping(&[
                    ("distributionSet", "distributionset.name"),
                    ("rollout", "rollout.name"),
                    ("target", "target.name"),
                ]),
                raw_fields: Vec::new(),
            },
        ),
        (
            Entity::TargetFilters.name().to_string(),
            EntityFields {
                field_map: BTreeMap::new(),
                raw_fields: vec!["query".to_string()],
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entity_fields_use_entity_names() {
        for key in default_entity_fields().keys() {
            assert!(key.parse::<Entity>().is_ok(), "{key} is not an entity");
        }
    }

    #[test]
    fn test_filter_options_conversion() {
        let fields = EntityFields {
            field_map: mapping(&[("ui", "backend")]),
            raw_fields: vec!["backend".into()],
        };
        let options = fields.filter_options();

        assert_eq!(options.backend_field("ui"), "backend");
        assert!(options.is_raw("ui", "backend"));
    }
}
