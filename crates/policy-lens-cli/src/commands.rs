//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use policy_lens_core::{AnalysisEngine, AnalysisReport, IntakeConfig};
use policy_lens_llm::{AnalysisContext, ChatClient, Explainer, OpenAiClient};

use crate::cli::{AnalyzeArgs, AskArgs, CheckConfigArgs, OutputFormat};

/// LLM explanation for one contract.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Explanation {
    pub source_index: usize,
    /// Empty when the model could not be reached
    pub text: String,
}

/// Report with optional explanations, as printed in JSON mode.
#[derive(Serialize)]
struct ExplainedReport<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    explanations: &'a [Explanation],
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let engine = AnalysisEngine::new(config)
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;

    let texts = read_texts(&args.files)?;
    let report = engine.analyze(&texts, args.preference);

    let explanations = if args.explain {
        match OpenAiClient::from_env() {
            Ok(client) => explain_all(
                &Explainer::new(client),
                &report,
                &texts,
                args.works_eight_hours,
            ),
            Err(e) => {
                warn!(error = %e, "explanations skipped");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    println!("{}", render(&report, &explanations, args.format)?);
    Ok(())
}

pub fn run_check_config(args: CheckConfigArgs) -> Result<()> {
    let config = load_config(&args.path)?;
    let catalog = config
        .validate()
        .with_context(|| format!("invalid configuration in {}", args.path.display()))?;

    println!(
        "{}: OK ({} providers, {} scoring rules, {} keywords, {} exclusion terms, {} summary sections)",
        args.path.display(),
        catalog.len(),
        config.scoring.rules.len(),
        config.detector.keywords.len(),
        config.detector.exclusion_terms.len(),
        config.summary.sections.len(),
    );
    Ok(())
}

pub fn run_ask(args: AskArgs) -> Result<()> {
    let client = OpenAiClient::from_env().context("the assistant is not configured")?;
    let answer = Explainer::new(client)
        .answer_question(&args.question)
        .context("the assistant could not answer")?;
    println!("{}", answer);
    Ok(())
}

fn load_config(path: &Path) -> Result<IntakeConfig> {
    let config = IntakeConfig::from_path(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Read every file as UTF-8 text, in the given order.
fn read_texts(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        bail!("no contract files given");
    }
    files
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read contract {}", path.display()))
        })
        .collect()
}

/// Explain every contract; failures degrade to an empty explanation.
pub fn explain_all<C: ChatClient>(
    explainer: &Explainer<C>,
    report: &AnalysisReport,
    texts: &[String],
    works_eight_hours: Option<bool>,
) -> Vec<Explanation> {
    report
        .contracts
        .iter()
        .zip(texts)
        .map(|(analysis, text)| {
            let mut context = AnalysisContext::from_analysis(analysis, &report.duplicates);
            if let Some(works) = works_eight_hours {
                context = context.with_work_hours(works);
            }
            let text = match explainer.explain_contract(text, Some(&context)) {
                Ok(explanation) => explanation,
                Err(e) => {
                    warn!(contract = analysis.source_index, error = %e, "explanation failed");
                    String::new()
                }
            };
            Explanation {
                source_index: analysis.source_index,
                text,
            }
        })
        .collect()
}

/// Render the report in the requested format.
fn render(
    report: &AnalysisReport,
    explanations: &[Explanation],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ExplainedReport {
                report,
                explanations,
            })?;
            Ok(json)
        }
        OutputFormat::Csv => {
            if !explanations.is_empty() {
                warn!("explanations are not included in CSV output");
            }
            Ok(report.to_csv())
        }
        OutputFormat::Text => {
            let mut out = report.to_text();
            for explanation in explanations.iter().filter(|e| !e.text.is_empty()) {
                out.push_str(&format!(
                    "\nExplanation for contract {}:\n{}\n",
                    explanation.source_index, explanation.text
                ));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_lens_core::Preference;
    use policy_lens_llm::MockClient;

    const CONFIG: &str = r#"
        [[providers]]
        name = "Assura"
        monthly_tariff = 250

        [[providers]]
        name = "Helsana"
        dental_ceiling = 10000

        [[scoring.rules]]
        name = "dental-high"
        points = 2
        trigger = { all_of = ["dentaire"], any_of = ["10000"] }
        predicate = { dental_ceiling_at_least = 5000 }

        [detector]
        keywords = ["dentaire"]
    "#;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(IntakeConfig::from_toml(CONFIG).unwrap()).unwrap()
    }

    fn texts() -> Vec<String> {
        vec!["dentaire 10000".to_string(), "dentaire".to_string()]
    }

    #[test]
    fn test_read_texts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1.txt");
        let second = dir.path().join("2.txt");
        fs::write(&first, "LAMal").unwrap();
        fs::write(&second, "LCA").unwrap();

        let texts = read_texts(&[first, second]).unwrap();
        assert_eq!(texts, vec!["LAMal", "LCA"]);

        assert!(read_texts(&[dir.path().join("missing.txt")]).is_err());
        assert!(read_texts(&[]).is_err());
    }

    #[test]
    fn test_load_config_reports_path() {
        let err = load_config(Path::new("/nonexistent/intake.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/intake.toml"));
    }

    #[test]
    fn test_explain_all_degrades_on_failure() {
        let mut client = MockClient::new("explication");
        client.add_error("dentaire 10000");
        let explainer = Explainer::new(client);

        let texts = texts();
        let report = engine().analyze(&texts, Preference::Undecided);
        let explanations = explain_all(&explainer, &report, &texts, Some(true));

        assert_eq!(explanations.len(), 2);
        assert_eq!(explanations[0].text, "");
        assert_eq!(explanations[1].text, "explication");
        assert_eq!(explanations[1].source_index, 2);

        let prompt = explainer.client().requests()[1]
            .last_user_message()
            .unwrap()
            .to_string();
        assert!(prompt.contains("au moins 8h/semaine"));
    }

    #[test]
    fn test_render_formats() {
        let texts = texts();
        let report = engine().analyze(&texts, Preference::Undecided);
        let explanations = vec![Explanation {
            source_index: 1,
            text: "Partie 1".into(),
        }];

        let json = render(&report, &explanations, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report_id"], report.report_id.as_str());
        assert_eq!(value["explanations"][0]["text"], "Partie 1");

        let csv = render(&report, &explanations, OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("report_id,record,"));

        let text = render(&report, &explanations, OutputFormat::Text).unwrap();
        assert!(text.contains("Explanation for contract 1:\nPartie 1"));
    }
}
