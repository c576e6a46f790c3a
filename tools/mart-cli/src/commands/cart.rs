//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use mart_commerce::cart::{Cart, PricingBreakdown};
use mart_commerce::checkout::DeliveryOption;
use mart_commerce::ids::ProductId;
use serde::Serialize;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let delivery = args
        .delivery
        .unwrap_or(ctx.config.checkout.default_delivery);

    ctx.load_cart().await;

    let cart = match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => ctx.cart.snapshot(),
        CartCommand::Add { product, quantity } => {
            let product = ctx.product(&product).await?;
            let before = ctx
                .cart
                .snapshot()
                .find_by_product(&product.id)
                .map_or(0, |l| l.quantity);
            let cart = match quantity {
                Some(q) => {
                    let total = added_quantity(before, q)?;
                    let call = ctx.cart.set_product_quantity(&product, total);
                    mutate(ctx, "Adding to cart...", call).await?
                }
                None => mutate(ctx, "Adding to cart...", ctx.cart.increment(&product)).await?,
            };
            report_line(&cart, &product.id, ctx);
            cart
        }
        CartCommand::Set { product, quantity } => {
            if quantity == 0 {
                return remove(&product, delivery, ctx).await;
            }
            let product = ctx.product(&product).await?;
            let call = ctx.cart.set_product_quantity(&product, quantity);
            let cart = mutate(ctx, "Updating cart...", call).await?;
            report_line(&cart, &product.id, ctx);
            cart
        }
        CartCommand::Inc { product } => {
            let product = ctx.product(&product).await?;
            let cart = mutate(ctx, "Updating cart...", ctx.cart.increment(&product)).await?;
            report_line(&cart, &product.id, ctx);
            cart
        }
        CartCommand::Dec { product } => {
            let id = ProductId::from(product.as_str());
            if ctx.cart.snapshot().find_by_product(&id).is_none() {
                bail!("Product {} is not in the cart", id);
            }
            let cart = mutate(ctx, "Updating cart...", ctx.cart.decrement(&id)).await?;
            report_line(&cart, &id, ctx);
            cart
        }
        CartCommand::Remove { product } => return remove(&product, delivery, ctx).await,
        CartCommand::Clear { yes } => {
            if ctx.cart.snapshot().is_empty() {
                ctx.output.info("Cart is already empty.");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt("Remove everything from the cart?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    ctx.output.warn("Cancelled");
                    return Ok(());
                }
            }
            let cart = mutate(ctx, "Clearing cart...", ctx.cart.clear_cart()).await?;
            ctx.output.success("Cart cleared");
            cart
        }
    };

    print_cart(&cart, delivery, ctx);
    Ok(())
}

async fn remove(product: &str, delivery: DeliveryOption, ctx: &Context) -> Result<()> {
    let id = ProductId::from(product);
    let Some(line) = ctx.cart.snapshot().find_by_product(&id).cloned() else {
        bail!("Product {} is not in the cart", id);
    };
    let cart = mutate(ctx, "Removing from cart...", ctx.cart.remove_from_cart(&line.id)).await?;
    ctx.output
        .success(&format!("Removed {} from the cart", line.product.name));
    print_cart(&cart, delivery, ctx);
    Ok(())
}

/// Await a cart mutation behind a spinner.
async fn mutate<F>(ctx: &Context, msg: &str, call: F) -> Result<Cart>
where
    F: std::future::Future<Output = Result<Cart, mart_commerce::CommerceError>>,
{
    let spinner = ctx.output.spinner(msg);
    let result = call.await;
    spinner.finish_and_clear();
    result.context("Cart update failed")
}

/// Quantity after adding `extra` to what is already in the cart.
fn added_quantity(in_cart: u32, extra: u32) -> Result<u32> {
    in_cart
        .checked_add(extra)
        .with_context(|| format!("Cannot add {} to the {} already in the cart", extra, in_cart))
}

fn report_line(cart: &Cart, product: &ProductId, ctx: &Context) {
    match cart.find_by_product(product) {
        Some(line) => ctx.output.success(&format!(
            "{} x {} in cart ({})",
            line.quantity,
            line.product.name,
            line.total_price.display()
        )),
        None => ctx.output.success(&format!("Product {} removed from the cart", product)),
    }
}

#[derive(Serialize)]
struct CartView<'a> {
    cart: &'a Cart,
    pricing: PricingBreakdown,
}

/// Print the cart and its breakdown for `delivery`.
pub fn print_cart(cart: &Cart, delivery: DeliveryOption, ctx: &Context) {
    let pricing = ctx.cart.pricing(delivery).rounded();

    if ctx.output.is_json() {
        ctx.output.json(&CartView { cart, pricing });
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let rows: Vec<Vec<String>> = cart
        .items
        .iter()
        .map(|line| {
            let (cases, loose) = line.product.case_count(line.quantity);
            let packing = if loose == 0 {
                format!("{} cases", cases)
            } else {
                format!("{} cases + {}", cases, loose)
            };
            vec![
                line.product.id.to_string(),
                line.product.name.clone(),
                line.quantity.to_string(),
                packing,
                line.unit_price().display(),
                line.total_price.display(),
            ]
        })
        .collect();
    ctx.output
        .table(&["ID", "Product", "Qty", "Packing", "Unit", "Total"], &rows);

    ctx.output.blank();
    print_breakdown(&pricing, ctx);
}

/// Print a price breakdown.
pub fn print_breakdown(pricing: &PricingBreakdown, ctx: &Context) {
    ctx.output.kv("Subtotal", &pricing.subtotal.display());
    if pricing.has_discount() {
        ctx.output
            .kv("Bulk discount (10%)", &format!("-{}", pricing.discount.display()));
    }
    ctx.output.kv("CGST (9%)", &pricing.cgst.display());
    ctx.output.kv("SGST (9%)", &pricing.sgst.display());
    let savings = pricing.delivery_savings();
    let delivery = if savings.is_positive() {
        format!("FREE (saved {})", savings.display())
    } else if pricing.delivery_charge.is_zero() {
        "FREE".to_string()
    } else {
        pricing.delivery_charge.display()
    };
    ctx.output
        .kv(pricing.delivery_option.display_name(), &delivery);
    ctx.output.kv("Total", &pricing.total.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_quantity() {
        assert_eq!(added_quantity(0, 6).unwrap(), 6);
        assert_eq!(added_quantity(6, 12).unwrap(), 18);
        assert!(added_quantity(6, u32::MAX).is_err());
        assert_eq!(added_quantity(0, u32::MAX).unwrap(), u32::MAX);
    }
}
