//! # Forge-Chain Test Suite
//!
//! Unified test crate for scenarios that span multiple workspace members:
//! real sockets, real handshakes, real gossip.
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── core_benchmarks.rs # hashing, signing, codec, pool, VM
//! └── src/integration/
//!     ├── support.rs         # node fixtures, ports, program builders
//!     ├── handshake.rs       # two-node membership
//!     ├── membership.rs      # departures and garbage connections
//!     ├── gossip.rs          # three-node transaction gossip
//!     ├── blocks.rs          # in-order block gossip, echo tolerance
//!     ├── validator.rs       # validator mints, follower converges
//!     ├── sync.rs            # sync-by-fetch from a cold start
//!     ├── rejection.rs       # tampered signatures at every layer
//!     └── contract_state.rs  # VM deltas across accepted blocks
//! ```
//!
//! Run with `cargo test -p fc-tests`; benchmarks with
//! `cargo bench -p fc-tests`. Each multi-node test binds its own loopback
//! port range, so the suite runs in parallel.

#![allow(dead_code)]
