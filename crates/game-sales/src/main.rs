mod bootstrap;

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use sales_core::settings::Settings;
use sales_core::SalesError;
use sales_data::analysis::{analyze_sales, AnalysisConfig, SalesReport};
use sales_data::cleaner::{clean_table, MissingValueSummary};
use sales_data::reader::load_raw_table;
use sales_data::writer::export_cleaned_csv;
use sales_ui::app::{report_pages, App, Page};
use sales_ui::table_view::missing_values_table;

/// JSON document written with `--format json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_values: Option<&'a MissingValueSummary>,
    #[serde(flatten)]
    report: &'a SalesReport,
}

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Game sales v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, format: {}, theme: {}",
        settings.input.display(),
        settings.format,
        settings.theme
    );

    let stdout = io::stdout();
    if let Err(err) = run(&settings, &mut stdout.lock()) {
        if let Some(hint) = failure_hint(&err) {
            tracing::error!("{hint}");
        }
        return Err(err);
    }
    Ok(())
}

/// Extra guidance for failures caused by the input file's contents.
fn failure_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<SalesError>()
        .filter(|e| e.is_parse_error())
        .map(|_| "The input is not a readable game sales table; check its header and values")
}

/// Load, clean and analyse the input, then report to `out` or the viewer.
fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let raw = load_raw_table(&settings.input)?;

    let missing = settings.missing_summary.then(|| {
        let summary = MissingValueSummary::from_raw(&raw);
        summary.warn_data_quality();
        summary
    });

    let table = clean_table(raw)?;

    if let Some(path) = &settings.export_cleaned {
        export_cleaned_csv(&table, path)
            .with_context(|| format!("exporting cleaned data to {}", path.display()))?;
    }

    let config = AnalysisConfig::from_settings(settings)?;
    let report = analyze_sales(&table, &config);

    if settings.wants_json() {
        let doc = JsonOutput {
            missing_values: missing.as_ref(),
            report: &report,
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
        return Ok(());
    }

    if settings.interactive {
        let mut pages: Vec<Page> = missing
            .as_ref()
            .map(|m| Page::Table(missing_values_table(m)))
            .into_iter()
            .collect();
        pages.extend(report_pages(&report));
        App::new(&settings.theme, pages).run_interactive()?;
        return Ok(());
    }

    if let Some(summary) = &missing {
        missing_values_table(summary).write_to(out)?;
    }
    App::from_report(&settings.theme, &report).print(
        out,
        settings.chart_width,
        settings.chart_height,
    )?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const GAMES: &str = "\
Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating
Wii Sports,Wii,2006,Sports,41.36,28.96,3.77,8.45,76,8,E
Grand Theft Auto V,PS4,2014,Action,3.96,6.31,0.38,1.97,97,8.3,M
Call of Duty: Black Ops 3,PS4,2015,Shooter,6.03,5.86,0.36,2.38,,tbd,
Halo 5: Guardians,XOne,2015,Shooter,2.78,1.27,0.03,0.41,84,6.4,T
,GEN,1993,,1.78,0.53,0.0,0.08,,,
";

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("games.csv");
        std::fs::write(&path, GAMES).expect("write input");
        path
    }

    fn settings(input: &Path, extra: &[&str]) -> Settings {
        let mut args = vec!["game-sales".to_string(), input.display().to_string()];
        args.extend(extra.iter().map(|s| s.to_string()));
        Settings::load_from_args(args).expect("settings")
    }

    #[test]
    fn test_run_prints_tables_and_charts() {
        let tmp = TempDir::new().expect("tempdir");
        let input = write_input(tmp.path());

        let mut out = Vec::new();
        run(&settings(&input, &["--theme", "classic"]), &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("Numeric columns"));
        assert!(text.contains("Games released per year"));
        assert!(text.contains("Top 15 games by platform, 2014-2016"));
        assert!(text.contains("Call of Duty: Black Ops 3"));
        assert!(!text.contains("Missing values"));
    }

    #[test]
    fn test_run_json_output() {
        let tmp = TempDir::new().expect("tempdir");
        let input = write_input(tmp.path());

        let mut out = Vec::new();
        run(
            &settings(&input, &["--format", "json", "--missing-summary"]),
            &mut out,
        )
        .expect("run");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");

        assert_eq!(json["records"], 5);
        assert_eq!(json["focus"]["records"], 3);
        assert_eq!(json["missing_values"]["user_score_sentinels"], 1);
        assert_eq!(json["focus"]["platform_totals"][0]["platform"], "PS4");
    }

    #[test]
    fn test_run_json_without_summary_omits_it() {
        let tmp = TempDir::new().expect("tempdir");
        let input = write_input(tmp.path());

        let mut out = Vec::new();
        run(&settings(&input, &["--format", "json"]), &mut out).expect("run");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert!(json.get("missing_values").is_none());
    }

    #[test]
    fn test_run_prints_missing_summary_first() {
        let tmp = TempDir::new().expect("tempdir");
        let input = write_input(tmp.path());

        let mut out = Vec::new();
        run(&settings(&input, &["--missing-summary"]), &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("Missing values (5 rows)"));
    }

    #[test]
    fn test_run_exports_cleaned_csv() {
        let tmp = TempDir::new().expect("tempdir");
        let input = write_input(tmp.path());
        let export = tmp.path().join("clean.csv");

        let mut out = Vec::new();
        run(
            &settings(
                &input,
                &["--format", "json", "--export-cleaned", &export.display().to_string()],
            ),
            &mut out,
        )
        .expect("run");

        let written = std::fs::read_to_string(&export).expect("export");
        assert!(written.starts_with("name,platform,year_of_release"));
        assert_eq!(written.lines().count(), 6);
    }

    #[test]
    fn test_run_missing_input_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let err = run(
            &settings(&tmp.path().join("missing.csv"), &[]),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
        assert_eq!(failure_hint(&err), None);
    }

    #[test]
    fn test_run_bad_values_gets_input_hint() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("games.csv");
        std::fs::write(
            &path,
            "Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating\n\
             Wii Sports,Wii,soon,Sports,41.36,28.96,3.77,8.45,76,8,E\n",
        )
        .expect("write input");

        let err = run(&settings(&path, &[]), &mut Vec::new()).unwrap_err();
        assert!(failure_hint(&err).is_some());
    }
}
