use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rosrustext_spin_core::spin::{ShutdownFlag, Spinner};
use rosrustext_spin_ros::{subscribe_single_threaded, SubscribeOptions};
use tracing::{debug, info};

use crate::config::Config;
use crate::sim_host::{Chatter, SimHost};

/// What the run observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub delivered: usize,
    pub max_concurrent: usize,
}

#[derive(Default)]
struct Stats {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delivered: AtomicUsize,
}

/// Deliver `callers * calls` messages from concurrent host threads through a
/// single-threaded subscription, then shut the driver loops down.
pub async fn run(config: &Config) -> Result<Report> {
    let spinner = Spinner::with_config(config.spin).context("invalid spinner config")?;
    let shutdown = ShutdownFlag::new();

    let loops = (0..config.loops.max(1))
        .map(|_| spinner.spawn(shutdown.clone()))
        .collect::<Result<Vec<_>, _>>()
        .context("spawn driver loop")?;

    let host = SimHost::new();
    let stats = Arc::new(Stats::default());
    {
        let stats = Arc::clone(&stats);
        subscribe_single_threaded(
            &host,
            &spinner,
            &config.topic,
            move |msg: Chatter| {
                let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
                debug!(sender = msg.sender, index = msg.index, "callback");
                stats.delivered.fetch_add(1, Ordering::SeqCst);
                stats.in_flight.fetch_sub(1, Ordering::SeqCst);
            },
            SubscribeOptions::default().queue_size(config.calls),
        )
        .with_context(|| format!("subscribe to {}", config.topic))?;
    }

    info!(
        callers = config.callers,
        calls = config.calls,
        loops = loops.len(),
        topic = %config.topic,
        "delivering"
    );

    let callers: Vec<_> = (0..config.callers)
        .map(|sender| {
            let host = host.clone();
            let topic = config.topic.clone();
            let calls = config.calls;
            tokio::task::spawn_blocking(move || {
                for index in 0..calls {
                    host.deliver(&topic, Chatter { sender, index });
                }
            })
        })
        .collect();
    for caller in callers {
        caller.await.context("host delivery thread")?;
    }

    shutdown.trigger();
    tokio::task::spawn_blocking(move || {
        for handle in loops {
            handle
                .join()
                .map_err(|_| anyhow!("driver loop panicked"))?;
        }
        Ok::<_, anyhow::Error>(())
    })
    .await
    .context("join driver loops")??;

    let report = Report {
        delivered: stats.delivered.load(Ordering::SeqCst),
        max_concurrent: stats.max_in_flight.load(Ordering::SeqCst),
    };
    info!(
        delivered = report.delivered,
        max_concurrent = report.max_concurrent,
        "done"
    );
    Ok(report)
}
