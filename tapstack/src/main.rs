use clap::{App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use std::ffi::CString;
use std::net::Ipv4Addr;
use std::process;
use tapstack_packets::MacAddr;
use tapstack_runtime::config::{DEFAULT_IP, DEFAULT_MAC};
use tapstack_runtime::log::{FileHeaderLog, HeaderLog, NullHeaderLog};
use tapstack_runtime::{Stack, StackConfig, TargetPolicy};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn app() -> App<'static, 'static> {
    App::new("tapstack")
        .version("0.1.0")
        .about("Answers ARP requests and pings on a TAP interface")
        .arg(
            Arg::with_name("iface")
                .short("i")
                .long("iface")
                .value_name("NAME")
                .help("TAP interface to create or attach to")
                .takes_value(true)
                .default_value("tap0"),
        )
        .arg(
            Arg::with_name("ip")
                .long("ip")
                .value_name("ADDR")
                .help("IPv4 address to answer for (default 10.0.0.4)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("mac")
                .long("mac")
                .value_name("ADDR")
                .help("MAC address to answer with (default 00:0c:29:6d:50:25)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("log-dir")
                .short("l")
                .long("log-dir")
                .value_name("DIR")
                .help("Write ethernet_log.txt, arp_log.txt and ip_log.txt to this directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Drop ARP requests and IP packets addressed to someone else"),
        )
        .arg(
            Arg::with_name("no-up")
                .long("no-up")
                .help("Do not bring the interface up"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
}

fn init_tracing(verbosity: u64) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn config_from(matches: &ArgMatches) -> Result<StackConfig, String> {
    let ip = match matches.value_of("ip") {
        Some(ip) => ip
            .parse::<Ipv4Addr>()
            .map_err(|err| format!("invalid --ip {}: {}", ip, err))?,
        None => DEFAULT_IP,
    };
    let mac = match matches.value_of("mac") {
        Some(mac) => mac
            .parse::<MacAddr>()
            .map_err(|err| format!("invalid --mac {}: {}", mac, err))?,
        None => DEFAULT_MAC,
    };
    let target_policy = if matches.is_present("strict") {
        TargetPolicy::Strict
    } else {
        TargetPolicy::Permissive
    };
    Ok(StackConfig::new()
        .ip(ip)
        .mac(mac)
        .target_policy(target_policy))
}

fn run(matches: &ArgMatches, config: &StackConfig) -> Result<(), Error> {
    let iface = CString::new(matches.value_of("iface").unwrap_or("tap0"))?;
    let mut device = tap::Tap::new()
        .context("failed to open /dev/net/tun")?
        .attach(&iface)
        .context("failed to attach TAP interface")?;
    if !matches.is_present("no-up") {
        device
            .set_up()
            .context("failed to bring the interface up")?;
    }
    let sink = device.try_clone()?;

    let log: Box<dyn HeaderLog> = match matches.value_of("log-dir") {
        Some(dir) => Box::new(
            FileHeaderLog::open(dir).with_context(|_| format!("failed to open logs in {}", dir))?,
        ),
        None => Box::new(NullHeaderLog),
    };

    info!(
        "answering for {} ({}) on {}, {:?} target policy",
        config.ip,
        config.mac,
        device.name(),
        config.target_policy
    );
    let mut stack = Stack::new(config, sink, log);
    stack.run(&mut device)?;
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    init_tracing(matches.occurrences_of("verbose"));

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(msg) => {
            error!("{}", msg);
            process::exit(2);
        }
    };

    if let Err(err) = run(&matches, &config) {
        for cause in err.iter_chain() {
            error!("{}", cause);
        }
        process::exit(1);
    }
}
