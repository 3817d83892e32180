use std::env;
use std::time::Duration;

use rosrustext_spin_core::SpinConfig;

pub const DEFAULT_CALLERS: usize = 4;
pub const DEFAULT_CALLS: usize = 25;
pub const DEFAULT_LOOPS: usize = 1;
pub const DEFAULT_TOPIC: &str = "/chatter";

pub struct Config {
    /// Host delivery threads.
    pub callers: usize,
    /// Messages delivered per host thread.
    pub calls: usize,
    /// Driver loops; anything above 1 lets callbacks overlap.
    pub loops: usize,
    pub topic: String,
    pub spin: SpinConfig,
}

impl Config {
    pub fn from_args() -> Self {
        Self::from_args_iter(env::args())
    }

    pub fn from_args_iter<I, S>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut callers = env_usize("ROSRUSTEXT_DEMO_CALLERS").unwrap_or(DEFAULT_CALLERS);
        let mut calls = env_usize("ROSRUSTEXT_DEMO_CALLS").unwrap_or(DEFAULT_CALLS);
        let mut loops = env_usize("ROSRUSTEXT_DEMO_LOOPS").unwrap_or(DEFAULT_LOOPS);
        let mut topic = DEFAULT_TOPIC.to_string();
        let mut spin = SpinConfig::from_env();

        let mut args = iter.into_iter();
        let _ = args.next();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--callers" => {
                    if let Some(value) = args.next().and_then(|v| parse_usize(v.as_ref())) {
                        callers = value;
                    }
                }
                "--calls" => {
                    if let Some(value) = args.next().and_then(|v| parse_usize(v.as_ref())) {
                        calls = value;
                    }
                }
                "--loops" => {
                    if let Some(value) = args.next().and_then(|v| parse_usize(v.as_ref())) {
                        loops = value;
                    }
                }
                "--poll-ms" => {
                    if let Some(value) = args.next().and_then(|v| parse_usize(v.as_ref())) {
                        spin.poll_interval = Duration::from_millis(value as u64);
                    }
                }
                "--topic" => {
                    if let Some(value) = args.next() {
                        topic = value.as_ref().to_string();
                    }
                }
                _ if arg.starts_with("--callers=") => {
                    if let Some(value) = parse_usize(&arg["--callers=".len()..]) {
                        callers = value;
                    }
                }
                _ if arg.starts_with("--calls=") => {
                    if let Some(value) = parse_usize(&arg["--calls=".len()..]) {
                        calls = value;
                    }
                }
                _ if arg.starts_with("--loops=") => {
                    if let Some(value) = parse_usize(&arg["--loops=".len()..]) {
                        loops = value;
                    }
                }
                _ if arg.starts_with("--poll-ms=") => {
                    if let Some(value) = parse_usize(&arg["--poll-ms=".len()..]) {
                        spin.poll_interval = Duration::from_millis(value as u64);
                    }
                }
                _ if arg.starts_with("--topic=") => {
                    topic = arg["--topic=".len()..].to_string();
                }
                _ => {}
            }
        }

        Self {
            callers,
            calls,
            loops,
            topic,
            spin,
        }
    }
}

fn print_usage() {
    println!(
        "rosrustext_spin_demo [--callers N] [--calls N] [--loops N] [--poll-ms N] [--topic /name]"
    );
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().as_deref().and_then(parse_usize)
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}
