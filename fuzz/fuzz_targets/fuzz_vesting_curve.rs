#![no_main]

use libfuzzer_sys::fuzz_target;

use stakevest_types::Timestamp;
use stakevest_vesting::VestingSchedule;

// Fuzz the release curve with arbitrary schedule shapes and query times.
// Entitlement must never panic, never exceed the total and never decrease.
fuzz_target!(|input: (u64, u64, u64, u128, u128, u64, u64)| {
    let (start, cliff, end, unlock, total, t1, t2) = input;
    let Ok(schedule) = VestingSchedule::new(
        Timestamp::new(start),
        Timestamp::new(cliff),
        Timestamp::new(end),
        unlock,
        total,
    ) else {
        return;
    };

    let (early, late) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    let a = schedule.vested_amount(Timestamp::new(early));
    let b = schedule.vested_amount(Timestamp::new(late));
    if let (Ok(a), Ok(b)) = (a, b) {
        assert!(a <= b);
        assert!(b <= total);
    }
    let _ = schedule.withdrawable_amount(Timestamp::new(late));
});
