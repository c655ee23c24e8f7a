//! # Slashing Subsystem Benchmarks
//!
//! | Operation | Claim | Target |
//! |-----------|-------|--------|
//! | Window update | O(1) per observation | flat across window sizes |
//! | Block processing | O(n) for n votes | < 10ms for 1,000 votes |
//! | Downtime storm | slash + revoke + jail per validator | linear in offenders |

use criterion::{criterion_group, criterion_main};
use qc_tests::benchmarks::qc_18_slashing;

criterion_group!(benches, qc_18_slashing::register_benchmarks);

criterion_main!(benches);
