//! Shared fixtures for unit tests.

use crate::domain::{
    AtomicSwap, ClaimHtltMsg, DepositHtltMsg, HtltMsg, OpenSwapParams, RefundHtltMsg, SwapMsg,
};
use shared_types::{AccAddress, Coins, HexBytes};

/// Secret whose commitment at [`TIMESTAMP`] is [`RANDOM_NUMBER_HASH`].
pub const RANDOM_NUMBER: &str =
    "52fdfc072182654f163f5f0f9a621d729566c74d10037c4d7bbb0407d1e2c649";
pub const RANDOM_NUMBER_HASH: &str =
    "be543130668282f267580badb1c956dacd4502be3b57846443c9921118ffa167";
pub const TIMESTAMP: i64 = 1_564_471_835;

pub fn addr(byte: u8) -> AccAddress {
    AccAddress::new(vec![byte; 20])
}

fn hash() -> HexBytes {
    HexBytes::from_hex(RANDOM_NUMBER_HASH).expect("valid hex")
}

/// Single-chain swap of 10000 BNB from `addr(from)` to `addr(to)`.
pub fn open_swap(from: u8, to: u8, random_number_hash: [u8; 32]) -> AtomicSwap {
    AtomicSwap::open(OpenSwapParams {
        from: addr(from),
        to: addr(to),
        out_amount: Coins::single("BNB", 10_000),
        expected_income: "10000:ABC".to_string(),
        recipient_other_chain: HexBytes::default(),
        random_number_hash: HexBytes::from(random_number_hash),
        timestamp: TIMESTAMP,
        expire_height: 1000,
        cross_chain: false,
    })
}

/// HTLT of 10000 BNB from `addr(1)` to `addr(2)` over 1000 blocks.
pub fn htlt_msg(cross_chain: bool) -> SwapMsg {
    let recipient_other_chain = if cross_chain {
        HexBytes::from_hex("491e71b619878c083eaf2894718383c7eb15eb17").expect("valid hex")
    } else {
        HexBytes::default()
    };
    SwapMsg::Htlt(HtltMsg {
        from: addr(1),
        to: addr(2),
        recipient_other_chain,
        random_number_hash: hash(),
        timestamp: TIMESTAMP,
        out_amount: Coins::single("BNB", 10_000),
        expected_income: "10000:ABC".to_string(),
        height_span: 1000,
        cross_chain,
    })
}

/// Deposit of 10000 ABC.
pub fn deposit_msg(from: u8, to: u8) -> SwapMsg {
    SwapMsg::Deposit(DepositHtltMsg {
        from: addr(from),
        to: addr(to),
        out_amount: Coins::single("ABC", 10_000),
        random_number_hash: hash(),
    })
}

pub fn claim_msg(random_number: &str) -> SwapMsg {
    SwapMsg::Claim(ClaimHtltMsg {
        from: addr(2),
        random_number_hash: hash(),
        random_number: HexBytes::from_hex(random_number).expect("valid hex"),
    })
}

pub fn refund_msg(from: u8) -> SwapMsg {
    SwapMsg::Refund(RefundHtltMsg {
        from: addr(from),
        random_number_hash: hash(),
    })
}
