//! # Demo: stuck_worker
//!
//! A worker that never returns, and the two ways `join` still comes back:
//! the drain-grace escape hatch, or the host's quit signal (Ctrl-C).
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► wire Ctrl-C to the pool's quit token
//!   ├─► start 2 workers that loop forever
//!   ├─► host runs for 3 seconds
//!   └─► pool.join(Some(handle))
//!         ├─► counter never reaches zero
//!         ├─► Ctrl-C       → outcome: QuitForced
//!         └─► 2s grace over → outcome: GraceExceeded
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example stuck_worker
//! ```

use std::time::Duration;

use workgroup::{wait_for_quit_signal, PoolConfig, WorkerFn, WorkerPool, WorkerRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== stuck_worker demo ===\n");

    let mut cfg = PoolConfig::default();
    cfg.drain_grace = Duration::from_secs(2);

    let pool = WorkerPool::new(cfg);

    // Host integration: a quit signal cuts any in-progress drain short.
    let quit = pool.quit_token();
    tokio::spawn(async move {
        if wait_for_quit_signal().await.is_ok() {
            quit.cancel();
        }
    });

    // These workers never return; only forced termination stops them.
    let worker: WorkerRef = WorkerFn::arc(|| async {
        println!("[worker] started");
        loop {
            println!("[worker] working...");
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });

    let handle = pool.start_replicated(2, worker)?;
    println!("[host] group of {} workers started\n", handle.worker_count());

    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("\n[host] joining (grace 2s; Ctrl-C to force)...");
    let outcome = pool.join(Some(handle)).await;
    println!("[host] join outcome: {}", outcome.as_label());

    println!("\n=== demo completed ===");
    Ok(())
}
