//! Product comparison commands.

use anyhow::Result;
use mart_commerce::compare::{ComparisonSet, MAX_COMPARE};
use mart_commerce::ids::ProductId;
use serde::Serialize;

use super::{CompareArgs, CompareCommand};
use crate::context::Context;

/// Run the compare command.
pub async fn run(args: CompareArgs, ctx: &Context) -> Result<()> {
    let selector = ctx.comparison();

    let set = match args.command.unwrap_or(CompareCommand::Show) {
        CompareCommand::Show => selector.snapshot(),
        CompareCommand::Add { product } => {
            if selector.contains(&ProductId::from(product.as_str())) {
                ctx.output.info(&format!("Product {} is already being compared", product));
                selector.snapshot()
            } else {
                let product = ctx.product(&product).await?;
                let name = product.name.clone();
                let set = selector.add_to_compare(product)?;
                ctx.output.success(&format!(
                    "Added {} ({} of {})",
                    name,
                    set.len(),
                    MAX_COMPARE
                ));
                set
            }
        }
        CompareCommand::Remove { product } => {
            let id = ProductId::from(product.as_str());
            if !selector.contains(&id) {
                ctx.output.warn(&format!("Product {} is not being compared", id));
            }
            selector.remove_from_compare(&id)
        }
        CompareCommand::Clear => {
            let set = selector.clear_compare();
            ctx.output.success("Comparison cleared");
            set
        }
    };

    print_comparison(&set, ctx);
    Ok(())
}

#[derive(Serialize)]
struct ComparisonView<'a> {
    products: &'a ComparisonSet,
    remaining_slots: usize,
}

fn print_comparison(set: &ComparisonSet, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&ComparisonView {
            products: set,
            remaining_slots: set.remaining_slots(),
        });
        return;
    }

    ctx.output.header(&format!("Compare ({}/{})", set.len(), MAX_COMPARE));
    if set.is_empty() {
        ctx.output
            .info("Nothing to compare. Add products with `mart compare add <ID>`.");
        return;
    }

    let mut headers = vec![""];
    headers.extend(set.products().iter().map(|p| p.name.as_str()));
    let rows: Vec<Vec<String>> = set
        .attribute_rows()
        .into_iter()
        .map(|row| {
            let mut cells = vec![row.label.to_string()];
            cells.extend(row.values);
            cells
        })
        .collect();
    ctx.output.table(&headers, &rows);
}
