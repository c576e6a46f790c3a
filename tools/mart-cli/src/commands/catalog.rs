//! Catalog browsing commands.

use anyhow::{Context as _, Result};
use mart_commerce::catalog::{Product, ProductFilter, ProductQuery};
use mart_commerce::search::suggest;

use super::{CatalogArgs, CatalogCommand, ProductsArgs};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Products(args) => list_products(args, ctx).await,
        CatalogCommand::Product { id } => show_product(&id, ctx).await,
        CatalogCommand::Categories => list_categories(ctx).await,
        CatalogCommand::Brands => list_brands(ctx).await,
        CatalogCommand::Search {
            query,
            limit,
            clear,
        } => search(query, limit, clear, ctx).await,
    }
}

fn build_query(args: &ProductsArgs) -> ProductQuery {
    let mut query = ProductQuery::new().with_sort(args.sort);
    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }
    if let Some(subcategory) = &args.subcategory {
        query = query.with_subcategory(subcategory.as_str());
    }
    if let Some(brand) = &args.brand {
        query = query.with_brand(brand.as_str());
    }
    if let Some(search) = &args.search {
        query = query.with_search(search.as_str());
    }
    if let Some(page) = args.page {
        query = query.with_page(page);
    }
    query
}

/// Filters the backend does not apply.
fn local_filter(args: &ProductsArgs) -> ProductFilter {
    let mut filter = ProductFilter::new().with_price_range(args.min_price, args.max_price);
    if args.in_stock {
        filter = filter.in_stock_only();
    }
    filter
}

async fn list_products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let query = build_query(&args);
    let spinner = ctx.output.spinner("Loading products...");
    let page = ctx.catalog.products(&query).await;
    spinner.finish_and_clear();
    let page = page.context("Failed to load products")?;

    let filter = local_filter(&args);
    let products = filter.apply(&page.items);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", args.sort.display_name()));
    if products.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }
    print_products(&products, ctx);

    ctx.output.blank();
    ctx.output.kv("Showing", &format!("{} of {}", products.len(), page.count));
    if page.has_next {
        let next = args.page.unwrap_or(1) + 1;
        ctx.output.kv("More", &format!("--page {}", next));
    }
    Ok(())
}

fn print_products(products: &[&Product], ctx: &Context) {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.brand_name().unwrap_or("-").to_string(),
                p.base_price.display(),
                p.moq.to_string(),
                stock_badge(p.stock_status),
            ]
        })
        .collect();
    ctx.output
        .table(&["ID", "Name", "Brand", "Price", "MOQ", "Stock"], &rows);
}

async fn show_product(id: &str, ctx: &Context) -> Result<()> {
    let product = ctx.product(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("SKU", &product.sku);
    ctx.output.kv("Price", &product.base_price.display());
    if let Some(mrp) = product.mrp {
        let discount = product
            .discount_percent()
            .map(|d| format!(" ({}% off)", d))
            .unwrap_or_default();
        ctx.output.kv("MRP", &format!("{}{}", mrp.display(), discount));
    }
    ctx.output.kv("MOQ", &product.moq.to_string());
    ctx.output.kv("Case size", &product.case_size.to_string());
    ctx.output.kv("Stock", &stock_badge(product.stock_status));
    if let Some(brand) = product.brand_name() {
        ctx.output.kv("Brand", brand);
    }
    if let Some(category) = product.category_name() {
        ctx.output.kv("Category", category);
    }
    if let Some(unit) = &product.unit {
        ctx.output.kv("Unit", unit);
    }
    if let Some(weight) = &product.weight {
        ctx.output.kv("Weight", weight);
    }
    if let Some(description) = &product.description {
        ctx.output.blank();
        ctx.output.info(description);
    }
    if !product.key_features.is_empty() {
        ctx.output.blank();
        ctx.output.info("Key features:");
        for feature in &product.key_features {
            ctx.output.list_item(feature);
        }
    }
    if !product.variants.is_empty() {
        ctx.output.kv("Variants", &product.variants.join(", "));
    }
    Ok(())
}

async fn list_categories(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading categories...");
    let categories = ctx.catalog.categories().await;
    spinner.finish_and_clear();
    let categories = categories.context("Failed to load categories")?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in categories.iter().filter(|c| c.is_active) {
        ctx.output.list_item(&format!("{} ({})", category.name, category.id));
        for sub in &category.subcategories {
            ctx.output.kv(&format!("  {}", sub.id), &sub.name);
        }
    }
    Ok(())
}

async fn list_brands(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading brands...");
    let brands = ctx.catalog.brands().await;
    spinner.finish_and_clear();
    let brands = brands.context("Failed to load brands")?;

    if ctx.output.is_json() {
        ctx.output.json(&brands);
        return Ok(());
    }

    ctx.output.header("Brands");
    let rows: Vec<Vec<String>> = brands
        .iter()
        .map(|b| vec![b.id.to_string(), b.name.clone()])
        .collect();
    ctx.output.table(&["ID", "Name"], &rows);
    Ok(())
}

async fn search(query: Option<String>, limit: usize, clear: bool, ctx: &Context) -> Result<()> {
    let mut recent = ctx.recent_searches();

    if clear {
        recent.clear();
        ctx.output.success("Cleared recent searches");
        return Ok(());
    }

    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        if ctx.output.is_json() {
            ctx.output.json(&recent.terms());
        } else if recent.is_empty() {
            ctx.output.info("No recent searches.");
        } else {
            ctx.output.header("Recent searches");
            for term in recent.terms() {
                ctx.output.list_item(term);
            }
        }
        return Ok(());
    };

    recent.record(&query);

    let spinner = ctx.output.spinner(&format!("Searching for \"{}\"...", query.trim()));
    let page = ctx
        .catalog
        .products(&ProductQuery::new().with_search(query.trim()))
        .await;
    spinner.finish_and_clear();
    let page = page.context("Search failed")?;

    let matches = suggest(&page.items, &query, limit);

    if ctx.output.is_json() {
        ctx.output.json(&matches);
        return Ok(());
    }

    ctx.output.header(&format!("Results for \"{}\"", query.trim()));
    if matches.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }
    print_products(&matches, ctx);
    if page.items.len() > matches.len() {
        ctx.output.blank();
        ctx.output.kv(
            "Showing",
            &format!("{} of {} (use --limit for more)", matches.len(), page.count),
        );
    }
    Ok(())
}
