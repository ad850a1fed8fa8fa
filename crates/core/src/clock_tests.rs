// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_shared_time() {
    let clock = FakeClock::at(500);
    let other = clock.clone();
    clock.advance_ms(250);
    assert_eq!(other.epoch_ms(), 750);
}

#[test]
fn system_clock_is_after_2020() {
    assert!(SystemClock.epoch_ms() > 1_577_836_800_000);
}
