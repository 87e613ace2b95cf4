//! Stringifying serde types into query strings.
//!
//! Run with: cargo run --example from_structs

use qs_value::{parse, to_string, to_string_with_options, to_value, StringifyOptions, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Open,
    Closed,
}

#[derive(Debug, Serialize)]
struct Filters {
    status: Status,
    labels: Vec<String>,
    assignee: Option<String>,
}

#[derive(Debug, Serialize)]
struct Search {
    term: String,
    page: u32,
    per_page: u32,
    filters: Filters,
}

fn main() -> Result<(), Box<dyn Error>> {
    let search = Search {
        term: "query strings".to_string(),
        page: 2,
        per_page: 25,
        filters: Filters {
            status: Status::Open,
            labels: vec!["bug".to_string(), "parser".to_string()],
            assignee: None,
        },
    };

    println!("Default:");
    let query = to_string(&search)?;
    println!("{}\n", query);

    println!("Readable, without nulls:");
    let options = StringifyOptions::new()
        .with_encode_values_only(true)
        .with_skip_nulls(true)
        .with_add_query_prefix(true);
    println!("{}\n", to_string_with_options(&search, &options)?);

    // Maps keep their own iteration order
    let mut params = BTreeMap::new();
    params.insert("sort", "updated");
    params.insert("direction", "desc");
    println!("Map: {}\n", to_string(&params)?);

    // Unit variants become their names
    let closed = to_value(&Status::Closed)?;
    println!("Unit variant: {:?}\n", closed);

    // Parsed values are plain strings; the tree shape survives
    let parsed = Value::Mapping(parse(&query));
    println!("Parsed back: {:?}", parsed);
    println!(
        "First label: {:?}",
        parsed
            .get("filters")
            .and_then(|filters| filters.get("labels"))
            .and_then(Value::as_sequence)
            .and_then(|labels| labels.first())
    );

    Ok(())
}
