//! Deploy-time synthesizer for the gateway.
//!
//! Renders `gateway_spec.json` (the inline definition) and
//! `gateway_stack.json` (the resource ledger) for the stage configured in
//! the environment. Run it again after any API change; the outputs are
//! deterministic, so an unchanged API produces unchanged files.

use aws_apigw_bridge::api;
use aws_apigw_bridge::synth::{self, DeployContext};
use std::fs;

fn main() {
    let context = DeployContext::from_env().unwrap_or_else(|e| {
        eprintln!("Deploy context is incomplete: {e}");
        std::process::exit(1);
    });

    let gateway = synth::synthesize_gateway(&api::api(), &context).unwrap_or_else(|e| {
        eprintln!("Failed to synthesize gateway: {e}");
        std::process::exit(1);
    });

    write_json("gateway_spec.json", &gateway.spec);
    write_json("gateway_stack.json", &gateway.stack);

    println!(
        "✅ Synthesized {} ({} resources), stage URL {}",
        gateway.deployment.api_name,
        gateway.stack.resources().len(),
        gateway.deployment.url
    );
}

// Writes a value as pretty JSON, bailing out on the first failure
fn write_json<T: serde::Serialize>(path: &str, value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Failed to serialize {path}: {e}");
        std::process::exit(1);
    });

    fs::write(path, json).unwrap_or_else(|e| {
        eprintln!("Failed to write {path}: {e}");
        std::process::exit(1);
    });
}
