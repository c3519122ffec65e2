/**
 * Minimal harness for the report transport.
 *
 * Point it at a collector and run:
 *
 *   LIGHTSTEP_ACCESS_TOKEN=... cargo run -p lightstep_demo
 *   cargo run -p lightstep_demo -- --host localhost --port 8360 --plain
 *   cargo run -p lightstep_demo -- --discard   # close(true) instead of close(false)
 *
 * Set `RUST_LOG=debug` together with `--verbose` to see report content and
 * collector responses.
 */
use lightstep_transport::{Controller, Encryption, Options};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let flag = |name: &str| args.iter().any(|a| a == name);
    let value = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let mut options = Options::default();
    if let Some(host) = value("--host") {
        options.collector_host = host;
    }
    if let Some(port) = value("--port").and_then(|p| p.parse().ok()) {
        options.collector_port = port;
    }
    if flag("--plain") {
        options.collector_encryption = Encryption::None;
    }
    if flag("--verbose") {
        options.verbosity = 3;
    }

    let token = std::env::var("LIGHTSTEP_ACCESS_TOKEN").unwrap_or_else(|_| "DEVELOPER_TOKEN".into());

    let controller = Controller::new(&options);

    for n in 0..3 {
        let report = serde_json::json!({
            "runtime": { "guid": "demo", "group_name": "lightstep_demo" },
            "span_records": [{ "span_name": format!("demo-span-{n}") }],
        });
        controller.submit(Some(token.as_str()), Some(&report));
        println!("[demo] Queued report {n}");
    }

    controller.close(flag("--discard"));
    println!("[demo] Closed. Transport is back in its initial state.");
}
