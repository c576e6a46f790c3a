//! Delivery address commands.

use anyhow::{Context as _, Result};
use mart_commerce::checkout::Address;

use super::{AddAddressArgs, AddressesArgs, AddressesCommand};
use crate::context::Context;

/// Run the addresses command.
pub async fn run(args: AddressesArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    match args.command.unwrap_or(AddressesCommand::List) {
        AddressesCommand::List => list_addresses(ctx).await,
        AddressesCommand::Add(args) => add_address(args, ctx).await,
    }
}

async fn list_addresses(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading addresses...");
    let addresses = ctx.addresses.list().await;
    spinner.finish_and_clear();
    let addresses = addresses.context("Failed to load addresses")?;

    if ctx.output.is_json() {
        ctx.output.json(&addresses);
        return Ok(());
    }

    ctx.output.header("Delivery addresses");
    if addresses.is_empty() {
        ctx.output.info("No saved addresses.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = addresses
        .iter()
        .map(|a| {
            let name = if a.is_default {
                format!("{} (default)", a.name)
            } else {
                a.name.clone()
            };
            vec![
                a.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                name,
                a.address_type.to_string(),
                a.one_line(),
            ]
        })
        .collect();
    ctx.output.table(&["ID", "Name", "Type", "Address"], &rows);
    Ok(())
}

fn build_address(args: AddAddressArgs) -> Address {
    let mut address = Address::new(args.name, args.street, args.city, args.state, args.pincode)
        .with_phone(args.phone)
        .with_type(args.address_type);
    address.is_default = args.default;
    address
}

async fn add_address(args: AddAddressArgs, ctx: &Context) -> Result<()> {
    let address = build_address(args);

    let spinner = ctx.output.spinner("Saving address...");
    let saved = ctx.addresses.add(&address).await;
    spinner.finish_and_clear();
    let saved = saved.context("Failed to save address")?;

    if ctx.output.is_json() {
        ctx.output.json(&saved);
        return Ok(());
    }

    let id = saved.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    ctx.output
        .success(&format!("Saved {} ({})", saved.name, id));
    ctx.output.kv("Address", &saved.one_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mart_commerce::checkout::AddressType;

    #[test]
    fn test_build_address() {
        let address = build_address(AddAddressArgs {
            name: "Pune Depot".to_string(),
            phone: "9800000001".to_string(),
            street: "Plot 4, MIDC".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            pincode: "411019".to_string(),
            address_type: AddressType::Office,
            default: true,
        });
        assert!(address.validate().is_ok());
        assert!(address.is_default);
        assert_eq!(address.address_type, AddressType::Office);
        assert_eq!(address.country, "India");
        assert!(address.id.is_none());
    }
}
