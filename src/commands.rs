//! Command handlers for the GLAM CLI.
//!
//! Each handler is one user-facing operation invoked from the clap
//! dispatch in `main`. Handlers call into the api modules, report success
//! through the notifier, and let failures propagate to the dispatch
//! boundary where every error is surfaced exactly once.

use crate::api::catalog::{NewProduct, ProductFilter, ProductUpdate};
use crate::api::error::ApiError;
use crate::api::types::{PasswordChange, UserCreate, UserUpdate};
use crate::api::{account, cart, catalog, orders};
use crate::state::AppState;
use crate::ui::NoticeKind;

/// Log in and store the session token.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), ApiError> {
    log::info!("Logging in as {}", email);
    account::login(&state.api, email, password).await?;
    state
        .notifier
        .notify(&format!("Logged in as {}", email), NoticeKind::Success);
    Ok(())
}

/// Create a new account.
pub async fn register(state: &AppState, user: UserCreate) -> Result<(), ApiError> {
    log::info!("Registering account for {}", user.email);
    let created = account::register(&state.api, &user).await?;
    state.notifier.notify(
        &format!("Account created for {}. You can now log in.", created.email),
        NoticeKind::Success,
    );
    Ok(())
}

/// Drop the local session and point the user at login.
pub fn logout(state: &AppState) {
    log::info!("Logging out");
    account::logout(&state.api);
    state.notifier.notify("Logged out.", NoticeKind::Success);
    state.navigator.to_login();
}

/// Show the logged-in user from the stored token, without a network call.
pub fn whoami(state: &AppState) -> Result<(), ApiError> {
    let Some(token) = state.api.store().read() else {
        state.notifier.notify("Not logged in.", NoticeKind::Error);
        state.navigator.to_login();
        return Ok(());
    };

    let claims = account::token_claims(&token)?;
    let user_id = claims.get("sub").cloned().unwrap_or_default();
    match claims.get("email").and_then(|value| value.as_str()) {
        Some(email) => println!("Logged in as {} (user id {})", email, user_id),
        None => println!("Logged in (user id {})", user_id),
    }
    Ok(())
}

/// Fetch and display the profile. GET /api/users/me.
pub async fn show_profile(state: &AppState) -> Result<(), ApiError> {
    let profile = account::profile(&state.api).await?;
    println!(
        "#{} {} {} <{}>",
        profile.id, profile.first_name, profile.last_name, profile.email
    );
    if let Some(phone) = &profile.phone {
        println!("Phone:   {}", phone);
    }
    if let Some(address) = &profile.address {
        println!("Address: {}", address);
    }
    println!("Member since {}", profile.created_at);
    Ok(())
}

/// Update profile fields.
pub async fn update_profile(state: &AppState, update: UserUpdate) -> Result<(), ApiError> {
    account::update_profile(&state.api, &update).await?;
    state.notifier.notify("Profile updated.", NoticeKind::Success);
    Ok(())
}

/// Change the account password.
pub async fn change_password(
    state: &AppState,
    old_password: String,
    new_password: String,
) -> Result<(), ApiError> {
    let change = PasswordChange {
        old_password,
        new_password,
    };
    account::change_password(&state.api, &change).await?;
    state.notifier.notify("Password updated.", NoticeKind::Success);
    Ok(())
}

/// Delete the account, then drop the now-useless local session.
pub async fn delete_account(state: &AppState) -> Result<(), ApiError> {
    account::delete_account(&state.api).await?;
    state.api.store().clear();
    state.notifier.notify("Account deleted.", NoticeKind::Success);
    state.navigator.to_login();
    Ok(())
}

/// List products, optionally filtered.
pub async fn list_products(state: &AppState, filter: ProductFilter) -> Result<(), ApiError> {
    let products = catalog::list_products(&state.api, &filter).await?;
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    for product in &products {
        println!(
            "#{:<5} {:<32} {:>16}  stock {}",
            product.id,
            product.name,
            format_price(product.price),
            product.stock
        );
    }
    Ok(())
}

/// Show one product in full.
pub async fn show_product(state: &AppState, id: i64) -> Result<(), ApiError> {
    let product = catalog::get_product(&state.api, id).await?;
    println!("#{} {}", product.id, product.name);
    println!("Price: {}  Stock: {}", format_price(product.price), product.stock);
    if let Some(sku) = &product.sku {
        println!("SKU: {}", sku);
    }
    if let Some(category_id) = product.category_id {
        println!("Category: {}", category_id);
    }
    if let Some(description) = &product.description {
        println!("{}", description);
    }
    if product.is_active == 0 {
        println!("Currently unavailable");
    }
    println!("Listed {}", product.created_at);
    Ok(())
}

/// Create a product, uploading the image when one is given.
pub async fn add_product(state: &AppState, new: NewProduct) -> Result<(), ApiError> {
    log::info!("Creating product {}", new.name);
    let product = catalog::create_product(&state.api, new).await?;
    state.notifier.notify(
        &format!("Product #{} \"{}\" created.", product.id, product.name),
        NoticeKind::Success,
    );
    Ok(())
}

/// Update product fields.
pub async fn update_product(
    state: &AppState,
    id: i64,
    update: ProductUpdate,
) -> Result<(), ApiError> {
    catalog::update_product(&state.api, id, &update).await?;
    state
        .notifier
        .notify(&format!("Product #{} updated.", id), NoticeKind::Success);
    Ok(())
}

/// Delete a product.
pub async fn delete_product(state: &AppState, id: i64) -> Result<(), ApiError> {
    catalog::delete_product(&state.api, id).await?;
    state
        .notifier
        .notify(&format!("Product #{} deleted.", id), NoticeKind::Success);
    Ok(())
}

/// List categories.
pub async fn list_categories(state: &AppState) -> Result<(), ApiError> {
    let categories = catalog::list_categories(&state.api).await?;
    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    for category in &categories {
        match &category.description {
            Some(description) => println!("#{:<5} {:<24} {}", category.id, category.name, description),
            None => println!("#{:<5} {}", category.id, category.name),
        }
    }
    Ok(())
}

/// Show one category.
pub async fn show_category(state: &AppState, id: i64) -> Result<(), ApiError> {
    let category = catalog::get_category(&state.api, id).await?;
    println!("#{} {}", category.id, category.name);
    if let Some(description) = &category.description {
        println!("{}", description);
    }
    Ok(())
}

/// Display the cart with line totals.
pub async fn show_cart(state: &AppState) -> Result<(), ApiError> {
    let detail = cart::fetch(&state.api).await?;
    if detail.items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }
    for item in &detail.items {
        match &item.product {
            Some(product) => {
                let line_total = item
                    .item_total
                    .unwrap_or(product.price * f64::from(item.quantity));
                println!(
                    "[{:<4}] #{:<5} {:<28} x{:<3} {:>14}",
                    item.id,
                    product.id,
                    product.name,
                    item.quantity,
                    format_price(line_total)
                );
                if product.is_active == 0 {
                    println!("        (no longer available)");
                } else if product.stock < item.quantity {
                    println!("        (only {} left in stock)", product.stock);
                }
            }
            None => println!(
                "[{:<4}] #{:<5} (unknown product) x{}",
                item.id, item.product_id, item.quantity
            ),
        }
    }
    println!(
        "{} items, total {}",
        detail.total_items,
        format_price(detail.total_amount)
    );
    Ok(())
}

/// Display the cart totals only.
pub async fn cart_summary(state: &AppState) -> Result<(), ApiError> {
    if !state.api.is_authenticated() {
        state.notifier.notify("Not logged in.", NoticeKind::Error);
        state.navigator.to_login();
        return Ok(());
    }
    let summary = cart::summary(&state.api).await?;
    println!(
        "{} items, total {}",
        summary.total_items,
        format_price(summary.total_amount)
    );
    Ok(())
}

/// Add a product to the cart.
pub async fn cart_add(state: &AppState, product_id: i64, quantity: u32) -> Result<(), ApiError> {
    cart::add_item(&state.api, product_id, quantity).await?;
    state.notifier.notify("Added to cart!", NoticeKind::Success);
    Ok(())
}

/// Change a cart line's quantity.
pub async fn cart_update(state: &AppState, item_id: i64, quantity: u32) -> Result<(), ApiError> {
    cart::update_item(&state.api, item_id, quantity).await?;
    state.notifier.notify("Cart updated.", NoticeKind::Success);
    Ok(())
}

/// Remove a cart line.
pub async fn cart_remove(state: &AppState, item_id: i64) -> Result<(), ApiError> {
    cart::remove_item(&state.api, item_id).await?;
    state.notifier.notify("Item removed", NoticeKind::Success);
    Ok(())
}

/// Empty the cart.
pub async fn cart_clear(state: &AppState) -> Result<(), ApiError> {
    cart::clear(&state.api).await?;
    state.notifier.notify("Cart emptied.", NoticeKind::Success);
    Ok(())
}

/// List the user's orders.
pub async fn list_orders(state: &AppState) -> Result<(), ApiError> {
    let orders = orders::list(&state.api).await?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        println!(
            "#{:<5} {:<10} {:>16}  {}",
            order.id,
            order.status,
            format_price(order.total_amount),
            order.order_date
        );
    }
    Ok(())
}

/// Show one order with its lines.
pub async fn show_order(state: &AppState, id: i64) -> Result<(), ApiError> {
    let order = orders::fetch(&state.api, id).await?;
    println!("Order #{} ({}) placed {}", order.id, order.status, order.order_date);
    for item in &order.items {
        let (product_id, name) = match &item.product {
            Some(product) => (product.id, product.name.as_str()),
            None => (item.product_id, "(unknown product)"),
        };
        println!(
            "  #{:<5} {:<28} x{:<3} @ {:>12} = {}",
            product_id,
            name,
            item.quantity,
            format_price(item.unit_price),
            format_price(item.subtotal)
        );
    }
    println!("Total {}", format_price(order.total_amount));
    Ok(())
}

/// Create an order from the current cart.
pub async fn checkout(state: &AppState) -> Result<(), ApiError> {
    log::info!("Creating order from cart");
    let order = orders::checkout(&state.api).await?;
    state.notifier.notify(
        &format!(
            "Order #{} placed, total {}.",
            order.id,
            format_price(order.total_amount)
        ),
        NoticeKind::Success,
    );
    Ok(())
}

/// Cancel an order.
pub async fn cancel_order(state: &AppState, id: i64) -> Result<(), ApiError> {
    let order = orders::cancel(&state.api, id).await?;
    state.notifier.notify(
        &format!("Order #{} cancelled.", order.id),
        NoticeKind::Success,
    );
    Ok(())
}

/// Format a price the way the storefront displays it: `NRs. 1,234.50`.
pub fn format_price(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("NRs. {}.{:02}", grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(12.5), "NRs. 12.50");
        assert_eq!(format_price(0.0), "NRs. 0.00");
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(1234.5), "NRs. 1,234.50");
        assert_eq!(format_price(1_200_000.0), "NRs. 1,200,000.00");
    }

    #[test]
    fn test_format_price_rounds_to_cents() {
        assert_eq!(format_price(9.999), "NRs. 10.00");
        assert_eq!(format_price(0.005), "NRs. 0.01");
    }
}
