//! Coupon commands.

use anyhow::{bail, Result};
use serde_json::json;

use super::{CouponArgs, CouponCommand};
use crate::context::Context;

/// Run the coupon command.
pub async fn run(args: CouponArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.storefront()?;

    match args.command {
        CouponCommand::Apply { code } => match store.try_apply_coupon(code.trim()) {
            Ok(coupon) => {
                ctx.output
                    .success(&store.t_with("coupon.applied", &[("code", coupon.code.as_str())]));
                super::cart::show(&store, ctx);
            }
            Err(rejection) => {
                if ctx.output.is_json() {
                    ctx.output.json(&json!({ "applied": false, "reason": rejection.to_string() }));
                }
                bail!("{}: {}", store.t("coupon.invalid"), rejection);
            }
        },
        CouponCommand::Remove => {
            if store.remove_coupon() {
                ctx.output.success(&store.t("coupon.removed"));
            } else {
                ctx.output.info("No coupon applied");
            }
        }
        CouponCommand::List => {
            let coupons: Vec<_> = store.reference().coupons.iter().collect();
            if ctx.output.is_json() {
                ctx.output.json(&coupons);
                return Ok(());
            }

            ctx.output.header("Coupons");
            for coupon in coupons {
                let status = if coupon.is_active { "" } else { " (inactive)" };
                ctx.output
                    .list_item(&format!("{} {:?} {}{}", coupon.code, coupon.kind, coupon.value, status));
            }
        }
    }

    Ok(())
}
