use std::env;

use anyhow::Context;
use log::info;

use nn_diagram::{NetworkConfig, ParamId, Preset};

fn load_config() -> anyhow::Result<NetworkConfig> {
    if let Ok(path) = env::var("NN_CONFIG") {
        return NetworkConfig::from_path(&path).with_context(|| format!("loading '{path}'"));
    }

    let preset = match env::var("NN_PRESET") {
        Ok(name) => name.parse::<Preset>()?,
        Err(_) => Preset::default(),
    };
    info!("using preset {preset}");

    Ok(preset.config())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = load_config()?;
    let network = config.network();
    let inputs = config.inputs;

    let forward = network.evaluate(&inputs);
    println!("mode: {:?}", network.mode());
    println!("inputs: x1 = {:.2}, x2 = {:.2}", inputs.x1, inputs.x2);
    println!("z1: {:.3}", forward.hidden_z);
    println!("a:  {:.3}", forward.hidden);
    println!("z2: {:.3}", forward.output_z);
    println!("y:  {:.3}", forward.outputs);
    println!("predicted: {}", network.classify(&inputs));

    println!("\ngradients:");
    for param in ParamId::all() {
        let gradient = network.gradient(param, &inputs);
        for (k, partial) in [&gradient.y1, &gradient.y2].into_iter().enumerate() {
            let Some(partial) = partial else {
                continue;
            };
            println!(
                "  d y{}/d {param} = {:>9.4} ({}) = {}",
                k + 1,
                partial.derivative,
                partial.effect,
                partial.formula
            );
        }
    }

    let report = network.truth_table();
    println!("\nexclusive-or:");
    for outcome in &report.rows {
        println!(
            "  [{}, {}] expected {} -> y1 = {:.3}, y2 = {:.3}, predicted {} {}",
            outcome.row.x1,
            outcome.row.x2,
            outcome.row.expected,
            outcome.y1,
            outcome.y2,
            outcome.predicted,
            if outcome.correct { "ok" } else { "wrong" }
        );
    }
    println!(
        "success: {} / {} ({}%)",
        report.successes,
        report.rows.len(),
        report.percentage
    );

    Ok(())
}
