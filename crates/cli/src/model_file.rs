//! JSON model files.
//!
//! `S` and `C` are stored as `(row, col, value)` triplets. A `null` bound is
//! unbounded (`-inf` for `lb`, `+inf` for `ub`), since JSON has no infinities.

use anyhow::{ensure, Context, Result};
use fluxcons::api::{triplets_to_csc, ExtraConstraints, Model, Sense};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelFile {
    pub rows: usize,
    pub s: Vec<(usize, usize, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Vec<f64>>,
    /// One sense letter per row (`E`, `L`, `G`); all `E` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csense: Option<String>,
    pub lb: Vec<Option<f64>>,
    pub ub: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraFile>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtraFile {
    pub rows: usize,
    pub c: Vec<(usize, usize, f64)>,
    pub d: Vec<f64>,
    /// All `L` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsense: Option<String>,
}

fn finite_or_none(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

fn senses(text: Option<&str>, rows: usize, default: Sense) -> Result<Vec<Sense>> {
    match text {
        Some(text) => {
            let parsed = Sense::parse_all(text)?;
            ensure!(
                parsed.len() == rows,
                "sense string has {} letters for {rows} rows",
                parsed.len()
            );
            Ok(parsed)
        }
        None => Ok(vec![default; rows]),
    }
}

impl ModelFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }

    pub fn into_model(self) -> Result<Model> {
        let lb: Vec<f64> = self
            .lb
            .iter()
            .map(|l| l.unwrap_or(f64::NEG_INFINITY))
            .collect();
        let ub: Vec<f64> = self.ub.iter().map(|u| u.unwrap_or(f64::INFINITY)).collect();
        let b = self.b.unwrap_or_else(|| vec![0.0; self.rows]);
        let mut model = Model::from_triplets(self.rows, &self.s, b, lb, ub)?
            .with_sense(senses(self.csense.as_deref(), self.rows, Sense::Eq)?)?;
        if let Some(ids) = self.ids {
            model = model.with_ids(ids)?;
        }
        if let Some(extra) = self.extra {
            let c = triplets_to_csc(extra.rows, model.n_vars(), &extra.c)?;
            let dsense = senses(extra.dsense.as_deref(), extra.rows, Sense::Le)?;
            model = model.with_extra(ExtraConstraints::new(c, extra.d, dsense)?)?;
        }
        Ok(model)
    }

    pub fn from_model(model: &Model) -> Self {
        let text = |s: &[Sense]| s.iter().map(|s| s.as_char()).collect::<String>();
        Self {
            rows: model.n_rows(),
            s: model.triplets(),
            b: Some(model.b().to_vec()),
            csense: Some(text(model.csense())),
            lb: model.lb().iter().map(|&l| finite_or_none(l)).collect(),
            ub: model.ub().iter().map(|&u| finite_or_none(u)).collect(),
            ids: Some(model.ids().to_vec()),
            extra: model.extra().map(|extra| ExtraFile {
                rows: extra.n_rows(),
                c: extra.triplets(),
                d: extra.d.clone(),
                dsense: Some(text(&extra.dsense)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TOY: &str = r#"{
        "rows": 2,
        "s": [[0, 0, 1.0], [0, 1, -1.0], [1, 1, 1.0], [1, 2, -1.0]],
        "lb": [0.0, null, -5.0],
        "ub": [10.0, null, 0.0],
        "ids": ["in", "mid", "out"],
        "extra": {"rows": 1, "c": [[0, 0, 1.0]], "d": [4.0]}
    }"#;

    #[test]
    fn parses_defaults_and_null_bounds() {
        let file: ModelFile = serde_json::from_str(TOY).unwrap();
        let model = file.into_model().unwrap();
        assert_eq!(model.n_vars(), 3);
        assert_eq!(model.b(), &[0.0, 0.0]);
        assert_eq!(model.csense(), &[Sense::Eq, Sense::Eq]);
        assert_eq!(model.lb()[1], f64::NEG_INFINITY);
        assert_eq!(model.ub()[1], f64::INFINITY);
        assert_eq!(model.ids()[2], "out");
        let extra = model.extra().unwrap();
        assert_eq!(extra.dsense, vec![Sense::Le]);
        assert_eq!(extra.d, vec![4.0]);
    }

    #[test]
    fn rejects_wrong_sense_length() {
        let mut file: ModelFile = serde_json::from_str(TOY).unwrap();
        file.csense = Some("E".into());
        assert!(file.into_model().is_err());
    }

    #[test]
    fn save_then_load_keeps_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toy.json");
        let model = serde_json::from_str::<ModelFile>(TOY)
            .unwrap()
            .into_model()
            .unwrap();
        ModelFile::from_model(&model).save(&path).unwrap();
        let back = ModelFile::load(&path).unwrap().into_model().unwrap();
        assert_eq!(back.triplets(), model.triplets());
        assert_eq!(back.lb(), model.lb());
        assert_eq!(back.ub(), model.ub());
        assert_eq!(back.ids(), model.ids());
        assert_eq!(back.extra().unwrap().triplets(), vec![(0, 0, 1.0)]);
    }
}
