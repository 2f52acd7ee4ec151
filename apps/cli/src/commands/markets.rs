//! `nearby markets`: the home screen.
//!
//! Mounting loads the categories, selects the first one and loads its
//! markets; `--category` then switches the selection like a tap would.

use nearby_client::{MarketDiscovery, NoDevice};
use nearby_core::discovery::DiscoveryView;
use nearby_core::Coordinates;
use std::sync::Arc;

use super::{print_json, Context};
use crate::error::CliError;
use crate::terminal::{TerminalDevice, TerminalPresenter};

pub async fn run(
    ctx: &Context,
    category: Option<String>,
    at: Option<Coordinates>,
) -> Result<(), CliError> {
    let mut config = (*ctx.config).clone();
    let home = match at {
        Some(position) => {
            config.map.follow_user = true;
            MarketDiscovery::new(
                ctx.api.clone(),
                Arc::new(TerminalPresenter::new(false)),
                Arc::new(TerminalDevice::new(false, Some(position))),
                Arc::new(config),
            )
        }
        None => MarketDiscovery::new(
            ctx.api.clone(),
            Arc::new(TerminalPresenter::new(false)),
            Arc::new(NoDevice),
            Arc::new(config),
        ),
    };

    home.mount().await?;
    if let Some(id) = category {
        home.select_category(&id).await?;
    }

    let view = home.snapshot().await;
    home.unmount().await;

    if ctx.json {
        return print_json(&view);
    }
    print_view(&view);
    Ok(())
}

fn print_view(view: &DiscoveryView) {
    let selected = view.selection.as_deref().unwrap_or_default();
    for category in &view.categories {
        let mark = if category.id == selected { '*' } else { ' ' };
        println!("{} {:<12} {}", mark, category.id, category.name);
    }
    println!();

    if view.markets.is_empty() {
        println!("No markets in this category.");
        return;
    }

    for market in &view.markets {
        let coupons = market
            .coupons
            .map(|n| format!("{} coupons", n))
            .unwrap_or_default();
        println!(
            "{:<12} {:<30} {:>10.5} {:>10.5}  {}",
            market.id, market.name, market.latitude, market.longitude, coupons
        );
        if !market.address.is_empty() {
            println!("{:<12} {}", "", market.address);
        }
    }
}
