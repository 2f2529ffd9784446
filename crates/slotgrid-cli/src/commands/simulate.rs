use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use slotgrid_env::Environment;
use slotgrid_ledger::Task;

/// One entry of the task file.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSpec {
    pub requirements: Vec<u32>,
    pub duration: usize,
    /// Step at which the task is first offered.
    #[serde(default)]
    pub arrival: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedTask {
    /// Index into the task file.
    pub task: usize,
    pub node: String,
    pub start: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: u64,
    pub placed: Vec<PlacedTask>,
    /// Task indices that arrived but found no room this step.
    pub deferred: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    /// Tasks still without a placement when the run ended.
    pub unplaced: Vec<usize>,
    /// Tasks whose arrival step lies beyond the simulated range.
    pub not_arrived: Vec<usize>,
}

pub fn simulate(config: &str, tasks: &str, steps: u64, format: &str) -> anyhow::Result<()> {
    let mut env = Environment::load(Path::new(config))?;
    let specs = load_tasks(Path::new(tasks))?;
    info!(tasks = specs.len(), steps, "starting simulation");

    let report = run(&mut env, &specs, steps)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print!("{}", format_report(&report));
        }
    }

    Ok(())
}

pub fn load_tasks(path: &Path) -> anyhow::Result<Vec<TaskSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let specs = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(specs)
}

/// Drive `env` for `steps` slots. Arrived tasks are offered in file order;
/// unplaced ones are re-offered on every later step.
pub fn run(env: &mut Environment, specs: &[TaskSpec], steps: u64) -> anyhow::Result<SimulationReport> {
    let tasks = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            Task::new(spec.requirements.clone(), spec.duration)
                .with_context(|| format!("task #{i}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut pending: Vec<usize> = Vec::new();
    let mut report = SimulationReport::default();

    for step in 0..steps {
        pending.extend(
            specs
                .iter()
                .enumerate()
                .filter(|(_, spec)| spec.arrival == step)
                .map(|(i, _)| i),
        );

        let mut step_report = StepReport {
            step,
            ..Default::default()
        };
        for i in std::mem::take(&mut pending) {
            match env.place_earliest(&tasks[i])? {
                Some(placement) => step_report.placed.push(PlacedTask {
                    task: i,
                    node: placement.label,
                    start: placement.start,
                }),
                None => {
                    warn!(task = i, step, "no node has room, deferring");
                    step_report.deferred.push(i);
                    pending.push(i);
                }
            }
        }

        report.steps.push(step_report);
        env.advance_all();
    }

    report.unplaced = pending;
    report.not_arrived = specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.arrival >= steps)
        .map(|(i, _)| i)
        .collect();
    if !report.not_arrived.is_empty() {
        warn!(tasks = report.not_arrived.len(), steps, "tasks arrive after the last step");
    }
    Ok(report)
}

pub fn format_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        let _ = writeln!(out, "step {}", step.step);
        for placed in &step.placed {
            let _ = writeln!(
                out,
                "  ✓ task {} → {} @ +{}",
                placed.task, placed.node, placed.start
            );
        }
        for task in &step.deferred {
            let _ = writeln!(out, "  … task {task} deferred");
        }
    }
    if !report.unplaced.is_empty() {
        let ids: Vec<String> = report.unplaced.iter().map(usize::to_string).collect();
        let _ = writeln!(out, "unplaced: {}", ids.join(", "));
    }
    if !report.not_arrived.is_empty() {
        let ids: Vec<String> = report.not_arrived.iter().map(usize::to_string).collect();
        let _ = writeln!(out, "not arrived: {}", ids.join(", "));
    }
    out
}
