//! Order history and tracking.

use anyhow::{Context as _, Result};
use chrono::{DateTime, FixedOffset};
use console::style;
use mart_commerce::checkout::Order;
use mart_commerce::ids::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    match args.command.unwrap_or(OrdersCommand::List { limit: None }) {
        OrdersCommand::List { limit } => list_orders(limit, ctx).await,
        OrdersCommand::Show { id } => show_order(&id, ctx).await,
        OrdersCommand::Track { id } => track_order(&id, ctx).await,
    }
}

fn format_time(at: DateTime<FixedOffset>) -> String {
    at.format("%d %b %Y, %H:%M").to_string()
}

async fn list_orders(limit: Option<usize>, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading orders...");
    let orders = ctx.orders.list_orders().await;
    spinner.finish_and_clear();
    let mut orders = orders.context("Failed to load orders")?;

    // Apply limit
    if let Some(limit) = limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Orders");
    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.order_number.clone(),
                o.created_at.map(format_time).unwrap_or_else(|| "-".to_string()),
                o.item_count().to_string(),
                o.total.display(),
                status_badge(o.status),
            ]
        })
        .collect();
    ctx.output
        .table(&["ID", "Order", "Placed", "Items", "Total", "Status"], &rows);
    Ok(())
}

async fn fetch(id: &str, ctx: &Context) -> Result<Order> {
    let spinner = ctx.output.spinner("Loading order...");
    let order = ctx.orders.get_order(&OrderId::from(id)).await;
    spinner.finish_and_clear();
    order.with_context(|| format!("Failed to load order {}", id))
}

async fn show_order(id: &str, ctx: &Context) -> Result<()> {
    let order = fetch(id, ctx).await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.header(&format!("Order {}", order.order_number));
    ctx.output.kv("Status", &status_badge(order.status));
    if let Some(at) = order.created_at {
        ctx.output.kv("Placed", &format_time(at));
    }
    ctx.output.kv("Delivery", &order.delivery_option);
    if let Some(date) = order.scheduled_date {
        ctx.output.kv("Delivery date", &date.format("%a %d %b %Y").to_string());
    }
    ctx.output.kv("Deliver to", &order.delivery_address);
    if let Some(method) = order.payment_method {
        ctx.output.kv("Payment", method.display_name());
    }
    ctx.output.kv("Payment status", order.payment_status.as_str());

    if !order.items.is_empty() {
        ctx.output.blank();
        let rows: Vec<Vec<String>> = order
            .items
            .iter()
            .map(|item| {
                let name = match (&item.name, &item.variant) {
                    (Some(name), Some(variant)) => format!("{} ({})", name, variant),
                    (Some(name), None) => name.clone(),
                    (None, _) => item
                        .product_id
                        .as_ref()
                        .map(|id| format!("Product {}", id))
                        .unwrap_or_else(|| "-".to_string()),
                };
                vec![
                    name,
                    item.quantity.to_string(),
                    item.price.display(),
                    item.total.display(),
                ]
            })
            .collect();
        ctx.output.table(&["Item", "Qty", "Price", "Total"], &rows);
    }

    ctx.output.blank();
    ctx.output.kv("Subtotal", &order.subtotal.display());
    if order.discount.is_positive() {
        ctx.output.kv("Discount", &format!("-{}", order.discount.display()));
    }
    ctx.output.kv("CGST", &order.cgst.display());
    ctx.output.kv("SGST", &order.sgst.display());
    ctx.output.kv("Delivery charges", &order.delivery_charges.display());
    ctx.output.kv("Total", &order.total.display());
    Ok(())
}

async fn track_order(id: &str, ctx: &Context) -> Result<()> {
    let order = fetch(id, ctx).await?;
    let timeline = order.timeline();

    if ctx.output.is_json() {
        ctx.output.json(&timeline);
        return Ok(());
    }

    ctx.output.header(&format!("Tracking {}", order.order_number));
    if let Some(courier) = &order.courier_partner {
        ctx.output.kv("Courier", courier);
    }
    if let Some(tracking) = &order.tracking_number {
        ctx.output.kv("Tracking number", tracking);
    }
    ctx.output.blank();

    for stage in &timeline {
        let marker = if stage.current {
            style("●").cyan().bold()
        } else if stage.completed {
            style("✓").green()
        } else {
            style("○").dim()
        };
        let when = stage.at.map(format_time).unwrap_or_default();
        let label = format!("{:<14}", stage.label);
        let label = if stage.current {
            style(label).bold().to_string()
        } else {
            label
        };
        println!("  {} {} {}", marker, label, style(when).dim());
    }

    if order.status.is_terminal() {
        ctx.output.blank();
        ctx.output.kv("Status", &status_badge(order.status));
    }
    Ok(())
}
