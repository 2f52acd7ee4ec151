//! `nearby redeem <id>`: the coupon sub-flow of the detail screen.
//!
//! With `--scan` values the camera path runs: the first value is admitted,
//! duplicates are dropped, and after the scan delay the confirmation prompt
//! decides. Without them the prompt is shown directly.

use nearby_client::{MarketDetailFlow, Presenter};
use nearby_core::{Confirmation, CouponCode};
use std::sync::Arc;
use tracing::debug;

use super::{print_json, Context};
use crate::error::{CliError, ErrorCode};
use crate::terminal::{TerminalDevice, TerminalPresenter};

pub async fn run(ctx: &Context, id: &str, scans: &[String], yes: bool) -> Result<(), CliError> {
    let presenter = Arc::new(TerminalPresenter::new(yes));
    let screen = MarketDetailFlow::new(
        id,
        ctx.api.clone(),
        presenter.clone(),
        Arc::new(TerminalDevice::new(!scans.is_empty(), None)),
        ctx.config.clone(),
    )?;

    if screen.mount().await?.is_none() {
        return Err(CliError::not_found(id));
    }

    let code = if scans.is_empty() {
        let prompt = Confirmation::redeem_coupon(ctx.config.locale());
        if !presenter.confirm(&prompt).await {
            return Err(CliError::declined());
        }
        screen.redeem_coupon(id).await?
    } else {
        redeem_scanned(&screen, scans).await?
    };
    screen.unmount().await;

    if ctx.json {
        return print_json(&code);
    }
    println!("{}", code);
    Ok(())
}

async fn redeem_scanned(screen: &MarketDetailFlow, scans: &[String]) -> Result<CouponCode, CliError> {
    screen.open_camera().await?;

    let mut pending = None;
    for value in scans {
        match screen.on_barcode_scanned(value).await {
            Some(task) => pending = Some(task),
            None => debug!(value = %value, "Scan discarded"),
        }
    }

    let task = pending
        .ok_or_else(|| CliError::new(ErrorCode::ValidationError, "No usable scan value"))?;
    let outcome = task
        .await
        .map_err(|e| CliError::new(ErrorCode::Internal, e.to_string()))?;

    match outcome {
        Some(result) => Ok(result?),
        None => Err(CliError::new(ErrorCode::Declined, "No coupon was redeemed")),
    }
}
