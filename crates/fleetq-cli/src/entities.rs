use fleetq_query::{request::REST_PREFIX, Entity};
use nu_ansi_term::Color::{Blue, Cyan};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};

use crate::{
    error::CliResult,
    utils::{print_json, term_width, Colored},
};

#[derive(Serialize)]
struct EntityInfo {
    name: &'static str,
    path: String,
    search_fields: &'static [&'static str],
    sort_fields: &'static [&'static str],
}

impl From<Entity> for EntityInfo {
    fn from(entity: Entity) -> Self {
        Self {
            name: entity.name(),
            path: format!("/{}/{}", REST_PREFIX.join("/"), entity.path()),
            search_fields: entity.search_fields(),
            sort_fields: entity.sort_fields(),
        }
    }
}

pub fn list_entities(json: bool) -> CliResult<()> {
    let entities = Entity::ALL.map(EntityInfo::from);

    if json {
        return print_json(&entities);
    }

    let mut builder = Builder::new();
    builder.push_record(["Entity", "Endpoint", "Search fields", "Sort fields"].map(String::from));
    for info in &entities {
        builder.push_record([
            Colored(Blue, info.name).to_string(),
            Colored(Cyan, &info.path).to_string(),
            info.search_fields.join(", "),
            info.sort_fields.join(", "),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Entities"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string();
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_info_path() {
        let info = EntityInfo::from(Entity::SoftwareModules);
        assert_eq!(info.name, "software-modules");
        assert_eq!(info.path, "/rest/v1/softwaremodules");
    }
}
