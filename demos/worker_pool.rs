//! # Demo: worker_pool
//!
//! Stand-in for a host shell: start a group of workers at init, let the host
//! run for a while, join the group at cleanup.
//!
//! Shows how to:
//! - Start a group from a plain worker count with [`WorkerPool::start_replicated`]
//! - Keep the returned handle opaque until teardown
//! - Read the [`DrainOutcome`] that bounded the drain
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► pool.start_replicated(4, worker)  → GroupHandle
//!   ├─► host "runs" for 2 seconds
//!   └─► pool.join(Some(handle))
//!         ├─► workers finish their third tick
//!         ├─► counter reaches zero
//!         └─► outcome: Drained
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example worker_pool
//! ```

use std::time::Duration;

use workgroup::{PoolConfig, WorkerFn, WorkerPool, WorkerRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== worker_pool demo ===\n");

    // 1. Configure the pool
    let mut cfg = PoolConfig::default();
    cfg.drain_grace = Duration::from_secs(5);

    // 2. Optional: add the stdout subscriber (requires "logging" feature)
    #[cfg(feature = "logging")]
    let pool = {
        use std::sync::Arc;
        use workgroup::{LogWriter, Subscribe};
        WorkerPool::builder(cfg)
            .with_subscribers(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])
            .build()
    };
    #[cfg(not(feature = "logging"))]
    let pool = WorkerPool::new(cfg);

    // 3. Define a worker that does a few ticks of work and returns
    let worker: WorkerRef = WorkerFn::arc(|| async {
        println!("[worker] started");
        for tick in 1..=3u32 {
            println!("[worker] working... tick {tick}");
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        println!("[worker] done");
    });

    // 4. Start the group
    let handle = pool.start_replicated(4, worker)?;
    println!("[host] group of {} workers started\n", handle.worker_count());

    // 5. Host event loop runs; workers tick in the background
    tokio::time::sleep(Duration::from_secs(2)).await;

    // 6. Teardown: drain, then terminate whatever is left
    let outcome = pool.join(Some(handle)).await;
    println!("\n[host] join outcome: {}", outcome.as_label());

    println!("\n=== demo completed ===");
    Ok(())
}
