//! Sign-in commands.
//!
//! # Usage
//!
//! ```bash
//! sf-cli login -e shopper@example.com
//! sf-cli register -n "Ada Lovelace" -e ada@example.com
//! sf-cli logout
//! ```
//!
//! The password is read from stdin when `--password` is not given.

use std::io::{BufRead, Write};

use secrecy::SecretString;
use shopfront_storefront::cart::MergeReport;

use super::Context;
use crate::error::CliError;

/// `login`.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the token cannot be
/// stored.
pub async fn login<W: Write>(
    ctx: &Context,
    email: &str,
    password: Option<String>,
    out: &mut W,
) -> Result<(), CliError> {
    let password = password_or_prompt(password)?;
    let outcome = ctx.shop.login(email, &password).await?;
    writeln!(out, "Signed in as {}.", email.trim())?;
    write_merge_report(&outcome.merge, out)
}

/// `register`.
///
/// # Errors
///
/// Returns an error if registration is rejected or the token cannot be
/// stored.
pub async fn register<W: Write>(
    ctx: &Context,
    name: &str,
    email: &str,
    password: Option<String>,
    out: &mut W,
) -> Result<(), CliError> {
    let password = password_or_prompt(password)?;
    let outcome = ctx.shop.register(name, email, password).await?;
    writeln!(out, "Account created for {}.", email.trim())?;
    write_merge_report(&outcome.merge, out)
}

/// `logout`.
///
/// # Errors
///
/// Returns an error if the stored token cannot be removed.
pub fn logout<W: Write>(ctx: &Context, out: &mut W) -> Result<(), CliError> {
    ctx.shop.logout()?;
    writeln!(out, "Signed out.")?;
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<SecretString, CliError> {
    if let Some(password) = password {
        return Ok(SecretString::from(password));
    }
    let mut stderr = std::io::stderr();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn write_merge_report<W: Write>(report: &MergeReport, out: &mut W) -> Result<(), CliError> {
    if report.outcomes.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "Moved {} of {} guest cart items to your cart.",
        report.merged_count(),
        report.outcomes.len()
    )?;
    for failed in report.failed() {
        writeln!(
            out,
            "  Could not add {} (x{}): {}",
            failed.product_id,
            failed.quantity,
            failed.error.as_deref().unwrap_or("unknown error")
        )?;
    }
    Ok(())
}
