#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use stakevest_rewards::RewardEngine;
use stakevest_types::{AccountId, Timestamp};

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: u128 },
    Withdraw { who: u8, amount: u128 },
    Claim { who: u8 },
    SetRate { rate: u128 },
    Advance { secs: u32 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    rate: u128,
    ops: Vec<Op>,
}

// Arbitrary operation sequences must never panic, and the staked total must
// always match the sum of balances. Overflow surfaces as an error.
fuzz_target!(|input: Input| {
    let mut engine = RewardEngine::new(input.rate, Timestamp::new(0));
    let mut now = 0u64;

    for op in input.ops.iter().take(256) {
        let t = Timestamp::new(now);
        match *op {
            Op::Stake { who, amount } => {
                let _ = engine.stake(&AccountId::from_index(who as u64 % 8), amount, t);
            }
            Op::Withdraw { who, amount } => {
                let _ = engine.withdraw(&AccountId::from_index(who as u64 % 8), amount, t);
            }
            Op::Claim { who } => {
                let _ = engine.take_reward(&AccountId::from_index(who as u64 % 8), t);
            }
            Op::SetRate { rate } => {
                engine.set_reward_rate(rate);
            }
            Op::Advance { secs } => {
                now = now.saturating_add(secs as u64);
            }
        }

        let sum = engine
            .stakers()
            .try_fold(0u128, |acc, (_, s)| acc.checked_add(s.balance));
        assert_eq!(sum, Some(engine.total_staked()));
    }

    for who in 0..8u64 {
        let _ = engine.earned(&AccountId::from_index(who), Timestamp::new(now));
    }
});
