use std::{sync::mpsc, time::Duration};

use igcflow::{ChannelEvent, ChannelOptions, Config, EngineBuilder, FlowModel};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> igcflow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let config = Config::load_from_str(include_str!("./config.toml"))?;
    let engine = EngineBuilder::new().config(config).build()?;

    engine.launch();

    let flow = FlowModel::from_json(include_str!("./flow.json"))?;
    engine.deploy(&flow)?;

    let (tx, rx) = mpsc::channel();
    let events = ChannelEvent::channel(engine.channel(), ChannelOptions::default())?;
    events.on_output(move |e| {
        let _ = tx.send((e.nid.clone(), e.message.payload.clone()));
    });
    events.on_error(move |e| {
        println!("[{}] {} failed: {}", e.nid, e.operation, e.error);
    });
    events.on_log(move |e| {
        println!("[{}] {}", e.nid, e.content);
    });

    engine.send("find-terms", json!({}))?;
    engine.send("find-terms", json!({ "query": { "properties": ["name"], "types": ["category"], "pageSize": 5 } }))?;
    engine.send("lookup", json!({ "rid": "6662c0f2.e1b1ec6c.00263pmkc.bqm7gmq.uoh8bp.bbk6s3vlfchcr6uqrno8t", "type": "term", "properties": ["name", "short_description"] }))?;
    engine.send("fetch", json!({ "url": "https://infosvr.example.com:9446/ibm/iis/igc-rest/v1/types" }))?;

    for _ in 0..4 {
        match rx.recv_timeout(Duration::from_secs(60)) {
            Ok((nid, payload)) => println!("[{}] payload: {:#}", nid, payload),
            Err(_) => break,
        }
    }

    engine.shutdown();
    Ok(())
}
