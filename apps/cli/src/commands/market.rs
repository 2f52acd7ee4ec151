//! `nearby market <id>`: the detail screen.

use nearby_client::{MarketDetailFlow, NoDevice};
use nearby_core::MarketDetail;
use std::sync::Arc;

use super::{print_json, Context};
use crate::error::CliError;
use crate::terminal::TerminalPresenter;

pub async fn run(ctx: &Context, id: &str) -> Result<(), CliError> {
    let screen = MarketDetailFlow::new(
        id,
        ctx.api.clone(),
        Arc::new(TerminalPresenter::new(false)),
        Arc::new(NoDevice),
        ctx.config.clone(),
    )?;

    let detail = screen.mount().await?;
    screen.unmount().await;
    let detail = detail.ok_or_else(|| CliError::not_found(id))?;

    if ctx.json {
        return print_json(&detail);
    }
    print_detail(&detail);
    Ok(())
}

fn print_detail(detail: &MarketDetail) {
    println!("{} ({})", detail.name, detail.id);
    if !detail.description.is_empty() {
        println!("{}", detail.description);
    }
    println!();

    if let Some(address) = &detail.address {
        println!("Address:  {}", address);
    }
    if let Some(phone) = &detail.phone {
        println!("Phone:    {}", phone);
    }
    if let Some(hours) = &detail.opening_hours {
        println!("Hours:    {}", hours);
    }
    if !detail.week_days.is_empty() {
        println!("Days:     {}", detail.week_days.join(", "));
    }
    println!("Coupons:  {}", detail.coupons);

    for rule in &detail.rules {
        println!("  - {}", rule.description);
    }
}
