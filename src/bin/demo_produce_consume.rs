// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 oneslot contributors
//
// Demo driver for the single-slot handoff.
//
// Usage:
//   demo_produce_consume [produce_interval_ms] [consume_interval_ms]
//
// A producer thread puts 1, 2, 3, ... into the shared slot, pacing itself
// with <produce_interval_ms> (default 1000). A consumer thread takes a value
// every <consume_interval_ms> (default 4000). With the defaults the producer
// outruns the consumer and spends most of its time blocked on the full slot.
// Ctrl-C sets a quit flag; a watcher thread closes the slot and both loops
// observe it and exit cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oneslot::{SharedSlot, SlotError};

const DEFAULT_PRODUCE_INTERVAL_MS: u64 = 1000;
const DEFAULT_CONSUME_INTERVAL_MS: u64 = 4000;

fn run_producer(slot: Arc<SharedSlot<i64>>, interval_ms: u64) {
    let mut n: i64 = 1;
    loop {
        match slot.put(n) {
            Ok(()) => info!(value = n, "produced"),
            Err(SlotError::Closed) => {
                info!("producer: slot closed, stopping");
                return;
            }
            Err(err) => {
                // Interrupted: the wait was cancelled but the slot is still
                // usable, so retry with the same value.
                warn!(%err, "producer: retrying");
                continue;
            }
        }
        n += 1;
        thread::sleep(Duration::from_millis(interval_ms));
    }
}

fn run_consumer(slot: Arc<SharedSlot<i64>>, interval_ms: u64) {
    loop {
        match slot.take() {
            Ok(n) => info!(value = n, "consumed"),
            Err(SlotError::Closed) => {
                info!("consumer: slot closed, stopping");
                return;
            }
            Err(err) => {
                warn!(%err, "consumer: retrying");
                continue;
            }
        }
        thread::sleep(Duration::from_millis(interval_ms));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 3 {
        eprintln!("usage: demo_produce_consume [produce_interval_ms] [consume_interval_ms]");
        std::process::exit(1);
    }
    let parse_interval = |s: &String| -> u64 {
        s.parse().unwrap_or_else(|_| {
            eprintln!("invalid interval: {s}");
            std::process::exit(1);
        })
    };
    let produce_interval = args.get(1).map_or(DEFAULT_PRODUCE_INTERVAL_MS, parse_interval);
    let consume_interval = args.get(2).map_or(DEFAULT_CONSUME_INTERVAL_MS, parse_interval);

    let slot: Arc<SharedSlot<i64>> = Arc::new(SharedSlot::new());
    let quit = Arc::new(AtomicBool::new(false));

    // The handler body must stay a single atomic store: the signal may land
    // on a thread that holds the slot mutex inside put/take, and closing the
    // slot from the handler would relock it on the same thread.
    {
        let q = Arc::clone(&quit);
        ctrlc_or_sigterm(move || q.store(true, Ordering::Release));
    }

    // Watcher thread: does the actual close from normal thread context once
    // the flag is set, which wakes both loops.
    let watcher = {
        let s = Arc::clone(&slot);
        let q = Arc::clone(&quit);
        thread::spawn(move || {
            while !q.load(Ordering::Acquire) {
                if s.is_closed() {
                    return;
                }
                thread::sleep(Duration::from_millis(50));
            }
            s.close();
        })
    };

    info!(produce_interval, consume_interval, "starting handoff demo");

    let producer = {
        let s = Arc::clone(&slot);
        thread::spawn(move || run_producer(s, produce_interval))
    };
    let consumer = {
        let s = Arc::clone(&slot);
        thread::spawn(move || run_consumer(s, consume_interval))
    };

    let _ = producer.join();
    let _ = consumer.join();
    // The loops only end once the slot is closed, so the watcher exits on
    // its next wakeup.
    let _ = watcher.join();
    info!("demo finished");
}

// Minimal cross-platform signal hook: runs the callback on SIGINT / SIGTERM.
fn ctrlc_or_sigterm(f: impl Fn() + Send + 'static) {
    #[cfg(unix)]
    {
        use std::sync::Mutex;
        static CB: std::sync::OnceLock<Mutex<Box<dyn Fn() + Send>>> = std::sync::OnceLock::new();
        CB.get_or_init(|| Mutex::new(Box::new(f)));
        extern "C" fn handler(_: libc::c_int) {
            if let Some(cb) = CB.get() {
                if let Ok(g) = cb.lock() {
                    g();
                }
            }
        }
        unsafe {
            libc::signal(libc::SIGINT, handler as *const () as libc::sighandler_t);
            libc::signal(libc::SIGTERM, handler as *const () as libc::sighandler_t);
            libc::signal(libc::SIGHUP, handler as *const () as libc::sighandler_t);
        }
    }
    #[cfg(not(unix))]
    {
        // On Windows just ignore — Ctrl-C will terminate the process.
        let _ = f;
    }
}
