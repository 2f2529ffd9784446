use std::fmt::Write;
use std::path::Path;

use slotgrid_core::EnvSnapshot;
use slotgrid_env::Environment;

pub fn inspect(config: &str, format: &str) -> anyhow::Result<()> {
    let env = Environment::load(Path::new(config))?;
    let snapshot = env.snapshot();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        _ => {
            print!("{}", format_snapshot(&snapshot));
        }
    }

    Ok(())
}

/// Plain-text rendering of free capacity per node and dimension.
pub fn format_snapshot(snapshot: &EnvSnapshot) -> String {
    let mut out = String::new();
    for node in &snapshot.nodes {
        let _ = writeln!(
            out,
            "{} (horizon {}, elapsed {})",
            node.label, node.ledger.horizon, node.ledger.elapsed
        );
        for dim in &node.ledger.dimensions {
            let free: Vec<String> = dim.free.iter().map(u32::to_string).collect();
            let _ = writeln!(
                out,
                "  {:<12} cap {:>4}  util {:>5.1}%  free [{}]",
                dim.name,
                dim.capacity,
                dim.utilization() * 100.0,
                free.join(" ")
            );
        }
    }
    let _ = writeln!(
        out,
        "queue {}/{}  backlog {}/{}",
        snapshot.queued, snapshot.queue_size, snapshot.backlogged, snapshot.backlog_size
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotgrid_core::EnvConfig;
    use slotgrid_ledger::Task;

    #[test]
    fn text_lists_each_dimension() {
        let config = EnvConfig::from_json_str(
            r#"{ "nodes": [{ "resource_capacity": [4, 2], "duration_capacity": 3 }],
                 "queue_size": 5, "backlog_size": 7 }"#,
        )
        .unwrap();
        let mut env = Environment::from_config(&config).unwrap();
        env.schedule_on("node1", &Task::new(vec![2, 1], 1).unwrap())
            .unwrap();

        let text = format_snapshot(&env.snapshot());
        assert!(text.starts_with("node1 (horizon 3, elapsed 0)"));
        assert!(text.contains("resource1"));
        assert!(text.contains("free [2 4 4]"));
        assert!(text.contains("free [1 2 2]"));
        assert!(text.contains("queue 0/5  backlog 0/7"));
    }
}
