use toml::{Table, Value};

/// Build a settings layer from environment variables named `{PREFIX}__*`.
///
/// `__` separates nesting levels, so `HCLOVERLAY__OUTPUT__STYLE` sets
/// `output.style`. Segments are lowercased. Every settings value is a path or
/// a keyword, so values are kept as strings.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        if segments.iter().any(String::is_empty) {
            continue;
        }
        insert_nested(&mut table, &segments, Value::String(value));
    }

    table
}

fn insert_nested(table: &mut Table, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            table.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let sub = table
                .entry(head.as_str())
                .or_insert_with(|| Value::Table(Table::new()));
            if let Value::Table(sub_table) = sub {
                insert_nested(sub_table, rest, value);
            }
        }
    }
}
