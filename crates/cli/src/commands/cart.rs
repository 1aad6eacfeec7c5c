//! Cart commands.
//!
//! Signed-in users add to the server cart; everyone else fills the guest
//! cart kept in the profile directory, which is merged on the next sign-in.

use std::io::Write;

use shopfront_core::ProductId;
use shopfront_storefront::StorefrontError;
use shopfront_storefront::api::CatalogApi;
use shopfront_storefront::session::CartDestination;

use super::Context;
use crate::error::CliError;

/// `cart add <product-id>`.
///
/// Looks the product up first so the guest cart records its current price
/// and discount.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or the cart rejects it.
pub async fn add<W: Write>(
    ctx: &Context,
    product_id: &str,
    quantity: u32,
    out: &mut W,
) -> Result<(), CliError> {
    let product = ctx.api.get_product(&ProductId::new(product_id)).await?;
    let update = ctx.shop.add_to_cart(&product, quantity).await?;

    let destination = match update.destination {
        CartDestination::Server => "cart",
        CartDestination::Guest => "guest cart",
    };
    writeln!(
        out,
        "Added {quantity} x {} to {destination} ({} in cart)",
        product.name, update.count
    )?;
    Ok(())
}

/// `cart count`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub async fn count<W: Write>(ctx: &Context, html: bool, out: &mut W) -> Result<(), CliError> {
    let count = ctx.shop.cart_count().await;
    if html {
        let badge = ctx
            .renderer
            .cart_badge(count)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{badge}")?;
    } else {
        writeln!(out, "{count}")?;
    }
    Ok(())
}

/// `cart show`: the guest cart.
///
/// # Errors
///
/// Returns an error if rendering or writing output fails.
pub async fn show<W: Write>(ctx: &Context, html: bool, out: &mut W) -> Result<(), CliError> {
    let cart = ctx.shop.guest_cart().load();

    if html {
        let table = ctx
            .renderer
            .guest_cart(&cart)
            .map_err(StorefrontError::from)?;
        writeln!(out, "{table}")?;
        return Ok(());
    }

    if ctx.shop.is_authenticated() {
        writeln!(
            out,
            "Signed in; server cart has {} items.",
            ctx.shop.cart_count().await
        )?;
    }
    if cart.is_empty() {
        writeln!(out, "Guest cart is empty.")?;
        return Ok(());
    }
    for item in cart.items() {
        writeln!(
            out,
            "{}\tx{}\t${}",
            item.product_id,
            item.quantity,
            shopfront_core::format_amount(item.line_total())
        )?;
    }
    writeln!(
        out,
        "Subtotal: ${} ({} items)",
        shopfront_core::format_amount(cart.subtotal()),
        cart.count()
    )?;
    Ok(())
}

/// `cart set <product-id> <quantity>`; 0 removes the line.
///
/// # Errors
///
/// Returns an error if the guest cart cannot be saved.
pub fn set<W: Write>(
    ctx: &Context,
    product_id: &str,
    quantity: u32,
    out: &mut W,
) -> Result<(), CliError> {
    let id = ProductId::new(product_id);
    if ctx.shop.guest_cart().set_quantity(&id, quantity)? {
        writeln!(out, "Updated {id}.")?;
    } else {
        writeln!(out, "{id} is not in the guest cart.")?;
    }
    Ok(())
}

/// `cart remove <product-id>`.
///
/// # Errors
///
/// Returns an error if the guest cart cannot be saved.
pub fn remove<W: Write>(ctx: &Context, product_id: &str, out: &mut W) -> Result<(), CliError> {
    let id = ProductId::new(product_id);
    if ctx.shop.guest_cart().remove(&id)? {
        writeln!(out, "Removed {id}.")?;
    } else {
        writeln!(out, "{id} is not in the guest cart.")?;
    }
    Ok(())
}

/// `cart clear`.
///
/// # Errors
///
/// Returns an error if the guest cart cannot be removed.
pub fn clear<W: Write>(ctx: &Context, out: &mut W) -> Result<(), CliError> {
    ctx.shop.guest_cart().clear()?;
    writeln!(out, "Guest cart cleared.")?;
    Ok(())
}
