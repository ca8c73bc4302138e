use fleetq_config::config::Config;
use fleetq_query::{
    build_query_from_filter_values,
    build_search,
    combine_with_and,
    combine_with_or,
    escape_value,
    filter::parse_filter_values,
    fiql::{escape_pattern, group},
    Entity,
    FilterOptions,
    FilterValue,
    ListRequest,
    Sort,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    cli::FilterArgs,
    error::{CliError, CliResult},
    utils::{print_json, read_input},
};

#[derive(Serialize)]
struct QueryOutput<'a> {
    entity: Option<&'a str>,
    q: &'a str,
}

fn emit_query(entity: Option<Entity>, query: &str, json: bool) -> CliResult<()> {
    if json {
        print_json(&QueryOutput {
            entity: entity.map(Entity::name),
            q: query,
        })
    } else {
        println!("{query}");
        Ok(())
    }
}

/// Config options for `entity`, extended by `--map` and `--raw`.
pub fn filter_options(config: &Config, entity: Entity, args: &FilterArgs) -> CliResult<FilterOptions> {
    let mut options = config.filter_options(entity);

    for mapping in &args.maps {
        let (ui, backend) = mapping
            .split_once('=')
            .map(|(ui, backend)| (ui.trim(), backend.trim()))
            .filter(|(ui, backend)| !ui.is_empty() && !backend.is_empty())
            .ok_or_else(|| CliError::InvalidMapping(mapping.clone()))?;
        options = options.map_field(ui, backend);
    }

    for raw in &args.raws {
        options = options.raw_field(raw.trim());
    }

    Ok(options)
}

/// Filter rows from `--file` followed by those from `--filter`.
pub fn collect_filters(args: &FilterArgs) -> CliResult<Vec<FilterValue>> {
    let mut filters = match args.file.as_deref() {
        Some(path) => parse_filter_values(&read_input(Some(path))?)?,
        None => Vec::new(),
    };

    for spec in &args.filters {
        filters.push(spec.parse()?);
    }

    debug!("collected {} filter rows", filters.len());
    Ok(filters)
}

pub fn build_filter_query(config: &Config, entity: Entity, args: &FilterArgs) -> CliResult<String> {
    let options = filter_options(config, entity, args)?;
    let filters = collect_filters(args)?;
    Ok(build_query_from_filter_values(&filters, &options))
}

pub fn escape(value: &str, pattern: bool, json: bool) -> CliResult<()> {
    let escaped = if pattern {
        escape_pattern(value)
    } else {
        escape_value(value)
    };
    emit_query(None, &escaped, json)
}

pub fn search(entity: &str, term: &str, fields: &[String], json: bool) -> CliResult<()> {
    let entity: Entity = entity.parse()?;
    let query = if fields.is_empty() {
        entity.search(term)
    } else {
        build_search(fields, term)
    };
    emit_query(Some(entity), &query, json)
}

pub fn build(config: &Config, entity: &str, args: &FilterArgs, json: bool) -> CliResult<()> {
    let entity: Entity = entity.parse()?;
    let query = build_filter_query(config, entity, args)?;
    emit_query(Some(entity), &query, json)
}

pub fn combine(parts: &[String], or: bool, grouped: bool) -> String {
    let parts = parts.iter().map(|part| {
        if grouped {
            group(part)
        } else {
            part.clone()
        }
    });

    if or {
        combine_with_or(parts)
    } else {
        combine_with_and(parts)
    }
}

pub struct UrlOptions<'a> {
    pub search: Option<&'a str>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: &'a [String],
    pub base_url: Option<&'a str>,
}

pub fn list_request(
    config: &Config,
    entity: Entity,
    filters: &FilterArgs,
    options: &UrlOptions<'_>,
) -> CliResult<ListRequest> {
    let mut request = ListRequest::new(entity);

    if let Some(term) = options.search {
        request = request.search(term);
    }

    let filter_query = build_filter_query(config, entity, filters)?;
    request = request.filter(&filter_query);

    let per_page = options.limit.unwrap_or_else(|| config.page_size());
    request = match options.page {
        Some(page) => request.page(page, per_page),
        None => request.limit(per_page),
    };

    if options.sort.is_empty() {
        if let Some(sort) = config.default_sort() {
            request = request.sort(sort);
        }
    } else {
        for sort in options.sort {
            request = request.sort(sort.parse::<Sort>()?);
        }
    }

    Ok(request)
}

#[derive(Serialize)]
struct UrlOutput<'a> {
    entity: &'a str,
    url: &'a str,
    q: &'a str,
}

pub fn url(
    config: &Config,
    entity: &str,
    filters: &FilterArgs,
    options: &UrlOptions<'_>,
    json: bool,
) -> CliResult<()> {
    let entity: Entity = entity.parse()?;
    let request = list_request(config, entity, filters, options)?;
    let base_url = options
        .base_url
        .map(String::from)
        .unwrap_or_else(|| config.base_url());
    let url = request.url(&base_url)?;

    if json {
        print_json(&UrlOutput {
            entity: entity.name(),
            url: url.as_str(),
            q: &request.query,
        })
    } else {
        println!("{url}");
        Ok(())
    }
}
