//! `nearby categories`: the raw category list, in server order.

use tracing::debug;

use super::{print_json, Context};
use crate::error::CliError;

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    let categories = ctx.api.list_categories().await?;
    debug!(count = categories.len(), "Categories fetched");

    if ctx.json {
        return print_json(&categories);
    }

    for category in &categories {
        println!("{:<12} {}", category.id, category.name);
    }
    Ok(())
}
