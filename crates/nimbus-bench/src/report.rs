use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Baseline {} is not valid JSON: {e}", path.display());
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline. Returns a list of regressions
/// (scene name, percent change) where the threshold is exceeded. Scenes missing
/// from the baseline or rendered at a different size are skipped.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        if (base.width, base.height) != (result.width, result.height) {
            log::warn!(
                "Scene '{}' baseline is {}x{}, current run is {}x{}; skipping",
                result.scene_name,
                base.width,
                base.height,
                result.width,
                result.height
            );
            continue;
        }
        if base.timings.mean_ms <= 0.0 {
            continue;
        }
        let pct_change =
            (result.timings.mean_ms - base.timings.mean_ms) / base.timings.mean_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((result.scene_name.clone(), pct_change));
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Size | Cloud steps | Light steps | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|------|-------------|-------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {}x{} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.width,
            r.height,
            r.cloud_steps,
            r.light_steps,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::compute_timings;

    fn result(name: &str, mean: f64, width: u32) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            cloud_steps: 128,
            light_steps: 10,
            frame_count: 1,
            width,
            height: 720,
            timings: compute_timings(&[mean]),
        }
    }

    fn baseline(results: Vec<BenchmarkResult>) -> Baseline {
        Baseline {
            timestamp: "test".into(),
            results,
        }
    }

    #[test]
    fn test_regression_over_threshold() {
        let base = baseline(vec![result("default", 10.0, 1280)]);
        let regs = compare(&[result("default", 12.0, 1280)], &base, 10.0);
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].0, "default");
        assert!((regs[0].1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_threshold_and_faster_pass() {
        let base = baseline(vec![result("a", 10.0, 1280), result("b", 10.0, 1280)]);
        let regs = compare(&[result("a", 10.5, 1280), result("b", 5.0, 1280)], &base, 10.0);
        assert!(regs.is_empty());
    }

    #[test]
    fn test_unmatched_scenes_skipped() {
        let base = baseline(vec![result("a", 1.0, 1280), result("b", 1.0, 640)]);
        let regs = compare(&[result("new", 50.0, 1280), result("b", 50.0, 1280)], &base, 10.0);
        assert!(regs.is_empty());
    }

    #[test]
    fn test_baseline_json_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("nimbus-bench-{}", std::process::id()));
        let path = dir.join("baseline.json");
        let base = baseline(vec![result("default", 3.25, 1280)]);
        save_baseline(&path, &base).expect("save");
        let loaded = load_baseline(&path).expect("load");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].timings, base.results[0].timings);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_baseline_is_none() {
        assert!(load_baseline(Path::new("/nonexistent/nimbus/baseline.json")).is_none());
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let md = format_markdown(&[result("low", 1.0, 1280), result("high", 9.0, 1280)]);
        assert_eq!(md.lines().count(), 4);
        assert!(md.contains("| low | 1280x720 | 128 | 10 |"));
    }

    #[test]
    fn test_comparison_text() {
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
        let text = format_comparison(&[("high".into(), 25.0)], 10.0);
        assert!(text.contains("high: +25.0%"));
    }
}
