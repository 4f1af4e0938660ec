//! Example schedules over the demo tables.

/// Four transactions over both areas. It ends with the certify upgrades of T1 and T2 blocked
/// by readers that have not committed, and with T3 and T4 waiting for T2.
pub const DEMO_1: &str =
    "r4(v)r3(y)r1(y)r1(x)w2(u)r2(x)w1(y)r2(y)c1w4(u)r3(x)c4w2(x)c2w3(u)w3(z)c3";

/// Three transactions. The commit of T2 is rejected because T1 and T3 still read the tables
/// it wrote, while T3 and then T1 commit. T2 stays uncommitted until `c2` is submitted again.
pub const DEMO_2: &str = "r1(y)w2(u)r2(x)r3(u)w2(y)r3(v)c2c3w1(v)c1";

/// Returns the demo schedule numbered `n`, starting at 1.
pub fn demo_schedule(n: usize) -> Option<&'static str> {
    match n {
        1 => Some(DEMO_1),
        2 => Some(DEMO_2),
        _ => None,
    }
}
