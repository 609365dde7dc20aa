//! # Protocol Handler
//!
//! Validates and applies the four swap messages. Every check runs before
//! the keeper is asked to mutate anything; the first failing check is the
//! error returned.

use super::keeper::SwapKeeper;
use crate::domain::{
    invariant_mirrored_counterparties, invariant_secret_matches, invariant_timestamp_window,
    AtomicSwap, ClaimHtltMsg, DepositHtltMsg, HtltMsg, OpenSwapParams, RefundHtltMsg,
    SwapError, SwapMsg, SwapOperation,
};
use crate::ports::{KeyValueStore, LedgerKeeper, Tag};
use serde::{Deserialize, Serialize};
use shared_types::BlockContext;
use tracing::{debug, warn};

/// Outcome of a delivered message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Transfer tags reported by the ledger.
    pub tags: Vec<Tag>,
    /// Human-readable log; the commitment hex for HTLT.
    pub log: String,
}

/// Apply `msg` in the context of the executing block.
pub fn handle<S, L>(
    keeper: &mut SwapKeeper<S, L>,
    ctx: &BlockContext,
    msg: &SwapMsg,
) -> Result<SwapResult, SwapError>
where
    S: KeyValueStore,
    L: LedgerKeeper,
{
    let result = match msg {
        SwapMsg::Htlt(msg) => handle_htlt(keeper, ctx, msg),
        SwapMsg::Deposit(msg) => handle_deposit(keeper, ctx, msg),
        SwapMsg::Claim(msg) => handle_claim(keeper, ctx, msg),
        SwapMsg::Refund(msg) => handle_refund(keeper, ctx, msg),
    };

    if let Err(e) = &result {
        match e {
            SwapError::Store(_) | SwapError::Codec(_) | SwapError::Ledger(_) => warn!(
                "[qc-15] {} {} failed at height {}: {}",
                msg.msg_type(),
                msg.random_number_hash(),
                ctx.height,
                e
            ),
            _ => debug!(
                "[qc-15] rejected {} {} at height {}: {}",
                msg.msg_type(),
                msg.random_number_hash(),
                ctx.height,
                e
            ),
        }
    }
    result
}

fn handle_htlt<S, L>(
    keeper: &mut SwapKeeper<S, L>,
    ctx: &BlockContext,
    msg: &HtltMsg,
) -> Result<SwapResult, SwapError>
where
    S: KeyValueStore,
    L: LedgerKeeper,
{
    msg.validate_basic(keeper.config())?;
    invariant_timestamp_window(msg.timestamp, ctx.time, keeper.config())?;

    // height_span is positive after validation
    let expire_height = ctx.height.saturating_add(msg.height_span.unsigned_abs());
    let swap = AtomicSwap::open(OpenSwapParams {
        from: msg.from.clone(),
        to: msg.to.clone(),
        out_amount: msg.out_amount.clone(),
        expected_income: msg.expected_income.clone(),
        recipient_other_chain: msg.recipient_other_chain.clone(),
        random_number_hash: msg.random_number_hash.clone(),
        timestamp: msg.timestamp,
        expire_height,
        cross_chain: msg.cross_chain,
    });

    let (swap, tags) = keeper.lock(swap)?;
    Ok(SwapResult {
        tags,
        log: swap.random_number_hash.to_string(),
    })
}

fn handle_deposit<S, L>(
    keeper: &mut SwapKeeper<S, L>,
    ctx: &BlockContext,
    msg: &DepositHtltMsg,
) -> Result<SwapResult, SwapError>
where
    S: KeyValueStore,
    L: LedgerKeeper,
{
    msg.validate_basic()?;
    let swap = keeper.require_swap(&msg.random_number_hash)?;

    if swap.cross_chain {
        return Err(SwapError::InvalidSingleChainSwap(
            "cannot deposit into a cross chain swap".to_string(),
        ));
    }
    swap.ensure_open(SwapOperation::Deposit)?;
    if swap.is_expired(ctx.height) {
        return Err(SwapError::ClaimExpiredSwap {
            expire_height: swap.expire_height,
            height: ctx.height,
        });
    }
    if !invariant_mirrored_counterparties(&swap, &msg.from, &msg.to) {
        return Err(SwapError::InvalidSingleChainSwap(format!(
            "deposit must come from {} to {}",
            swap.to, swap.from
        )));
    }
    if swap.is_deposited() {
        return Err(SwapError::InvalidSingleChainSwap(
            "swap already has a deposit".to_string(),
        ));
    }

    let (swap, tags) = keeper.deposit(swap, &msg.from, msg.out_amount.clone())?;
    Ok(SwapResult {
        tags,
        log: format!("deposited {} into {}", swap.in_amount, swap.random_number_hash),
    })
}

fn handle_claim<S, L>(
    keeper: &mut SwapKeeper<S, L>,
    ctx: &BlockContext,
    msg: &ClaimHtltMsg,
) -> Result<SwapResult, SwapError>
where
    S: KeyValueStore,
    L: LedgerKeeper,
{
    msg.validate_basic()?;
    let swap = keeper.require_swap(&msg.random_number_hash)?;

    swap.ensure_open(SwapOperation::Claim)?;
    if swap.is_expired(ctx.height) {
        return Err(SwapError::ClaimExpiredSwap {
            expire_height: swap.expire_height,
            height: ctx.height,
        });
    }
    if !invariant_secret_matches(
        msg.random_number.as_bytes(),
        swap.timestamp,
        swap.random_number_hash.as_bytes(),
    ) {
        return Err(SwapError::MismatchedRandomNumber {
            random_number_hash: swap.random_number_hash.clone(),
        });
    }
    if !swap.cross_chain && !swap.is_deposited() {
        return Err(SwapError::UnexpectedClaimSingleChainSwap {
            random_number_hash: swap.random_number_hash.clone(),
        });
    }

    let (swap, tags) = keeper.claim(swap, msg.random_number.clone(), ctx.time)?;
    Ok(SwapResult {
        tags,
        log: format!("claimed {}", swap.random_number_hash),
    })
}

fn handle_refund<S, L>(
    keeper: &mut SwapKeeper<S, L>,
    ctx: &BlockContext,
    msg: &RefundHtltMsg,
) -> Result<SwapResult, SwapError>
where
    S: KeyValueStore,
    L: LedgerKeeper,
{
    msg.validate_basic()?;
    let swap = keeper.require_swap(&msg.random_number_hash)?;

    swap.ensure_open(SwapOperation::Refund)?;
    if !swap.is_expired(ctx.height) {
        return Err(SwapError::RefundUnexpiredSwap {
            expire_height: swap.expire_height,
            height: ctx.height,
        });
    }

    let (swap, tags) = keeper.refund(swap, ctx.time)?;
    Ok(SwapResult {
        tags,
        log: format!("refunded {}", swap.random_number_hash),
    })
}
