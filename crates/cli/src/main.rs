use anyhow::Result;
use clap::{Parser, Subcommand};
use fluxcons::api::{
    find_consistent, random_network, ConsistencyCfg, ConsistencyReport, Method, MicroLp, Model,
    NetworkParams, PrintLevel,
};
use polars::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod model_file;
mod provenance;

use model_file::ModelFile;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "fluxcons")]
#[command(about = "Flux consistency of constraint-based models")]
struct Cmd {
    /// Verbosity: silent|summary|debug (or 0|1|2)
    #[arg(long, default_value = "summary")]
    verbose: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Determine the consistent variables of a JSON model and write a CSV
    Check {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1e-4)]
        epsilon: f64,
        /// convex|nonconvex
        #[arg(long, default_value = "convex")]
        method: String,
        /// Also write `<out>.witnesses.json`
        #[arg(long)]
        witnesses: bool,
    },
    /// Write a random network as a JSON model
    Gen {
        #[arg(long, default_value_t = 8)]
        metabolites: usize,
        #[arg(long, default_value_t = 12)]
        reactions: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0.5)]
        exchange_prob: f64,
        #[arg(long, default_value_t = 0.3)]
        reversible_prob: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Summarize a result CSV, or print a provenance block when none is given
    Report {
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

fn max_level(level: PrintLevel) -> Level {
    match level {
        PrintLevel::Silent => Level::WARN,
        PrintLevel::Summary => Level::INFO,
        PrintLevel::Debug => Level::DEBUG,
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let print_level: PrintLevel = cmd.verbose.parse()?;
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(max_level(print_level))
        .init();
    match cmd.action {
        Action::Check {
            model,
            out,
            epsilon,
            method,
            witnesses,
        } => {
            let cfg = ConsistencyCfg {
                epsilon,
                method: method.parse()?,
                witnesses,
                print_level,
            };
            check(&model, &out, &cfg)
        }
        Action::Gen {
            metabolites,
            reactions,
            seed,
            exchange_prob,
            reversible_prob,
            out,
        } => {
            let params = NetworkParams {
                metabolites,
                reactions,
                exchange_prob,
                reversible_prob,
                ..NetworkParams::default()
            };
            gen(&params, seed, &out)
        }
        Action::Report { from } => report(from.as_deref()),
    }
}

fn check(model_path: &Path, out: &Path, cfg: &ConsistencyCfg) -> Result<()> {
    tracing::info!(model = %model_path.display(), out = %out.display(), method = %cfg.method, "check");
    let model = ModelFile::load(model_path)?.into_model()?;
    let report = find_consistent(&model, cfg, &MicroLp::default())?;
    tracing::info!(
        vars = model.n_vars(),
        consistent = report.consistent.len(),
        inconsistent = report.inconsistent.len(),
        "result"
    );

    write_results(&model, &report, out)?;
    let mut payload = Payload::new(json!({
        "model": model_path.to_string_lossy(),
        "epsilon": cfg.epsilon,
        "method": cfg.method.to_string(),
        "witnesses": cfg.witnesses,
    }))
    .with_summary(summary(&report));
    if cfg.witnesses {
        let path = witness_path(out);
        write_witnesses(&model, &report, &path)?;
        payload = payload.with_output(path);
    }
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn summary(report: &ConsistencyReport) -> serde_json::Value {
    let stats = &report.stats;
    json!({
        "vars": report.n_vars,
        "consistent": report.consistent.len(),
        "inconsistent": report.inconsistent.len(),
        "steps": stats.steps,
        "batch_probes": stats.batch_probes,
        "singleton_probes": stats.singleton_probes,
        "flips": stats.flips,
        "witness_warnings": stats.witness_warnings,
        "max_residual": stats.max_residual,
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// One row per variable: id, consistent, orientation, witness column.
fn write_results(model: &Model, report: &ConsistencyReport, out: &Path) -> Result<()> {
    ensure_parent(out)?;
    let orientation: Vec<i32> = report.orientation.iter().map(|&o| i32::from(o)).collect();
    let witness: Vec<Option<u32>> = report
        .witness_of
        .iter()
        .map(|w| w.and_then(|k| u32::try_from(k).ok()))
        .collect();
    let mut df = df!(
        "id" => model.ids().to_vec(),
        "consistent" => report.is_consistent(),
        "orientation" => orientation,
        "witness" => witness,
    )?;
    let mut file = fs::File::create(out)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

fn witness_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    out.with_file_name(format!("{stem}.witnesses.json"))
}

fn write_witnesses(model: &Model, report: &ConsistencyReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let witnesses: Vec<Vec<f64>> = report
        .witnesses
        .iter()
        .map(|w| w.iter().copied().collect())
        .collect();
    let doc = json!({ "ids": model.ids(), "witnesses": witnesses });
    fs::write(path, serde_json::to_vec_pretty(&doc)?)?;
    Ok(())
}

fn gen(params: &NetworkParams, seed: u64, out: &Path) -> Result<()> {
    tracing::info!(seed, out = %out.display(), "gen");
    let model = random_network(params, seed)?;
    ModelFile::from_model(&model).save(out)?;
    let payload = Payload::new(json!({
        "metabolites": params.metabolites,
        "reactions": params.reactions,
        "exchange_prob": params.exchange_prob,
        "reversible_prob": params.reversible_prob,
        "seed": seed,
    }))
    .with_summary(json!({ "vars": model.n_vars(), "rows": model.n_rows() }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

/// Counts from a result CSV written by `check`.
#[derive(Debug, PartialEq, Eq)]
struct ResultCounts {
    vars: usize,
    consistent: usize,
    flipped: usize,
}

fn read_counts(path: &Path) -> Result<ResultCounts> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()?;
    let consistent = df
        .column("consistent")?
        .bool()?
        .into_iter()
        .filter(|v| *v == Some(true))
        .count();
    let flipped = df
        .column("orientation")?
        .i64()?
        .into_iter()
        .filter(|v| *v == Some(-1))
        .count();
    Ok(ResultCounts {
        vars: df.height(),
        consistent,
        flipped,
    })
}

fn report(from: Option<&Path>) -> Result<()> {
    let counts = from.map(read_counts).transpose()?;
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "fluxcons_version": fluxcons::VERSION,
        "methods": [Method::Convex.to_string(), Method::Nonconvex.to_string()],
        "from": from.map(|p| p.to_string_lossy().into_owned()),
        "counts": counts.map(|c| json!({
            "vars": c.vars,
            "consistent": c.consistent,
            "flipped": c.flipped,
        })),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn toy() -> Model {
        // in -> A -> out, plus a reverse-only drain of B that nothing feeds.
        // The drain is normalized to forward orientation, hence one flip.
        Model::from_triplets(
            2,
            &[(0, 0, 1.0), (0, 1, -1.0), (1, 2, 1.0)],
            vec![0.0; 2],
            vec![0.0, 0.0, -10.0],
            vec![10.0, 10.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn check_writes_csv_witnesses_and_sidecar() {
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("toy.json");
        let out = dir.path().join("runs").join("toy.csv");
        ModelFile::from_model(&toy()).save(&model_path).unwrap();
        let cfg = ConsistencyCfg {
            witnesses: true,
            ..ConsistencyCfg::default()
        };
        check(&model_path, &out, &cfg).unwrap();

        assert!(out.exists());
        assert!(dir.path().join("runs/toy.witnesses.json").exists());
        assert!(dir.path().join("runs/toy.provenance.json").exists());
        let counts = read_counts(&out).unwrap();
        assert_eq!(
            counts,
            ResultCounts {
                vars: 3,
                consistent: 2,
                flipped: 1
            }
        );
    }

    #[test]
    fn gen_output_loads_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("net.json");
        let params = NetworkParams::default();
        gen(&params, 3, &out).unwrap();
        let model = ModelFile::load(&out).unwrap().into_model().unwrap();
        assert_eq!(model.n_rows(), params.metabolites);
        assert!(dir.path().join("net.provenance.json").exists());
    }

    #[test]
    fn witness_path_sits_next_to_output() {
        assert_eq!(
            witness_path(Path::new("/tmp/a/run.csv")),
            Path::new("/tmp/a/run.witnesses.json")
        );
    }
}
