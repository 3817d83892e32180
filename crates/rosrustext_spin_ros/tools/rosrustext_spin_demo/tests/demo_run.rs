use std::time::Duration;

use rosrustext_spin_demo::config::Config;
use rosrustext_spin_demo::demo;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_loop_serializes_every_delivery() {
    let mut config = Config::from_args_iter(["bin", "--callers=4", "--calls=20", "--loops=1"]);
    config.spin.poll_interval = Duration::from_millis(10);

    let report = demo::run(&config).await.expect("demo run");
    assert_eq!(report.delivered, 80);
    assert_eq!(report.max_concurrent, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn zero_callers_delivers_nothing() {
    let mut config = Config::from_args_iter(["bin", "--callers=0"]);
    config.spin.poll_interval = Duration::from_millis(10);

    let report = demo::run(&config).await.expect("demo run");
    assert_eq!(report.delivered, 0);
    assert_eq!(report.max_concurrent, 0);
}
