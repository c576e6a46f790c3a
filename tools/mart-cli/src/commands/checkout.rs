//! Place an order for the cart.

use anyhow::{bail, Context as _, Result};
use chrono::Local;
use dialoguer::{Confirm, Select};
use mart_commerce::checkout::{Address, CheckoutDraft, CheckoutStep, PaymentMethod};

use super::CheckoutArgs;
use crate::commands::cart::print_breakdown;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let today = Local::now().date_naive();

    ctx.output.header("Checkout");

    let cart = ctx.load_cart().await;
    if cart.is_empty() {
        bail!("Your cart is empty. Add products with `mart cart add <ID>`.");
    }

    let mut draft = CheckoutDraft::new();
    step_header(draft.step, ctx);
    let delivery = args
        .delivery
        .unwrap_or(ctx.config.checkout.default_delivery);
    draft = draft.with_delivery(delivery);
    if let Some(date) = args.date {
        draft = draft.with_scheduled_date(date);
    }
    draft = draft.with_address(pick_address(args.address.as_deref(), ctx).await?);
    draft.advance().context("Delivery details incomplete")?;

    step_header(draft.step, ctx);
    let payment = match args.payment {
        Some(method) => method,
        None if args.yes || ctx.output.is_json() => {
            bail!("No payment method given. Pass --payment <METHOD>.")
        }
        None => pick_payment_method()?,
    };
    draft = draft.with_payment_method(payment);
    draft.advance().context("Payment details incomplete")?;

    step_header(draft.step, ctx);
    // Everything is checked locally before the order is priced or sent.
    let checkout = draft.validate(&cart, today)?;
    let pricing = ctx.cart.pricing(checkout.delivery).rounded();

    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Delivery", &format!("{} ({})", delivery.display_name(), delivery.duration()));
    if let Some(date) = checkout.scheduled_date {
        ctx.output.kv("Delivery date", &date.format("%a %d %b %Y").to_string());
    }
    ctx.output.kv("Payment", payment.display_name());
    ctx.output.kv("Deliver to", &checkout.address.one_line());
    ctx.output.blank();
    print_breakdown(&pricing, ctx);

    if !args.yes && !ctx.output.is_json() {
        ctx.output.blank();
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", pricing.total.display()))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Order cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let confirmation = ctx.orders.place_order(&draft, &ctx.cart, today).await;
    spinner.finish_and_clear();
    let confirmation = confirmation.context("Failed to place order")?;

    if ctx.output.is_json() {
        ctx.output.json(&confirmation);
        return Ok(());
    }

    ctx.output.success(&format!(
        "Order {} placed",
        confirmation.display_number()
    ));
    ctx.output.info(&format!("Track it with `mart orders track {}`", confirmation.id));
    Ok(())
}

fn step_header(step: CheckoutStep, ctx: &Context) {
    ctx.output.info(&format!("[{}/3] {}", step.number(), step.display_name()));
}

fn pick_payment_method() -> Result<PaymentMethod> {
    let items: Vec<String> = PaymentMethod::ALL
        .iter()
        .map(|m| format!("{} - {}", m.display_name(), m.description()))
        .collect();
    let choice = Select::new()
        .with_prompt("Payment method")
        .items(&items)
        .default(0)
        .interact()?;
    PaymentMethod::ALL
        .get(choice)
        .copied()
        .context("No payment method selected")
}

async fn pick_address(id: Option<&str>, ctx: &Context) -> Result<Address> {
    let spinner = ctx.output.spinner("Loading addresses...");
    let found = match id {
        Some(id) => ctx.addresses.list().await.map(|addresses| {
            addresses
                .into_iter()
                .find(|a| a.id.as_ref().is_some_and(|a| a.as_str() == id))
        }),
        None => ctx.addresses.default_address().await,
    };
    spinner.finish_and_clear();

    match (found.context("Failed to load addresses")?, id) {
        (Some(address), _) => Ok(address),
        (None, Some(id)) => bail!("No saved address with ID {}", id),
        (None, None) => {
            bail!("No saved delivery address. Add one with `mart addresses add`.")
        }
    }
}
