use labflow::engine::{Engine, LabFlowEngine, Operation, Workflow};
use serde::Serialize;
use std::{env, fs};

#[derive(Serialize)]
struct StateSummary {
    sample_count: usize,
    test_count: usize,
    equipment_count: usize,
    samples: Vec<String>,
    tests: Vec<String>,
    equipment: Vec<String>,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  labflow_cli capabilities\n  \
  labflow_cli op '<operation-json>'\n  \
  labflow_cli workflow '<workflow-json>'\n  \
  labflow_cli demo\n\n  \
  Each invocation starts from an empty dashboard.\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn summarize(engine: &LabFlowEngine) -> StateSummary {
    let dashboard = engine.snapshot();
    StateSummary {
        sample_count: dashboard.samples().len(),
        test_count: dashboard.tests().len(),
        equipment_count: dashboard.equipment().len(),
        samples: dashboard.names_of_samples(),
        tests: dashboard.names_of_tests(),
        equipment: dashboard.names_of_equipment(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }

    let mut engine = LabFlowEngine::new();
    match args[1].as_str() {
        "capabilities" => {
            print_json(&LabFlowEngine::capabilities())?;
        }
        "op" => {
            let payload = args.get(2).ok_or("Missing operation JSON")?;
            let text = load_json_arg(payload)?;
            let op: Operation = serde_json::from_str(&text)
                .map_err(|e| format!("Could not parse operation JSON: {e}"))?;
            let result = engine.apply(op).map_err(|e| e.to_string())?;
            print_json(&result)?;
            print_json(&summarize(&engine))?;
        }
        "workflow" => {
            let payload = args.get(2).ok_or("Missing workflow JSON")?;
            let text = load_json_arg(payload)?;
            let wf: Workflow = serde_json::from_str(&text)
                .map_err(|e| format!("Could not parse workflow JSON: {e}"))?;
            let results = engine.apply_workflow(wf).map_err(|e| e.to_string())?;
            print_json(&results)?;
            print_json(&summarize(&engine))?;
        }
        "demo" => {
            engine
                .apply(Operation::Autogenerate)
                .map_err(|e| e.to_string())?;
            print_json(&summarize(&engine))?;
        }
        _ => {
            usage();
            return Err(format!("Unknown command '{}'", args[1]));
        }
    }
    Ok(())
}
