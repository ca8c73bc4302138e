//! Turns struct doc comments into TOML comments for generated config files.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, Item, RawString, Table};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Prepends `docs` as `#` comment lines to whatever prefix `decor` already has.
pub fn push_doc_comments(decor: &mut Decor, docs: &str) {
    let mut prefix = decor
        .prefix()
        .and_then(RawString::as_str)
        .unwrap_or_default()
        .to_string();

    if !prefix.trim().is_empty() {
        prefix.push_str("#\n");
    }

    for line in docs.lines() {
        if line.is_empty() {
            prefix.push_str("#\n");
        } else {
            prefix.push_str("# ");
            prefix.push_str(line);
            prefix.push('\n');
        }
    }

    decor.set_prefix(prefix);
}

/// Annotates every key of `table` with the matching field docs of `T`.
///
/// When `with_header` is set, the container docs of `T` are attached to the
/// table header as well.
pub fn annotate_table<T>(table: &mut Table, with_header: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if with_header {
        push_doc_comments(table.decor_mut(), T::DOCS);
    }

    for (mut key, item) in table.iter_mut() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            warn!("No documentation for `{}` on `{}`", name, type_name::<T>());
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(name)),
            Item::Value(_) => push_doc_comments(key.leaf_decor_mut(), docs),
            Item::Table(sub_table) => push_doc_comments(sub_table.decor_mut(), docs),
            Item::ArrayOfTables(array) => {
                if let Some(first) = array.iter_mut().next() {
                    push_doc_comments(first.decor_mut(), docs);
                }
            }
        }
    }

    Ok(())
}
