//! Golden tests against the shipped default configuration.
//!
//! These tests pin rankings and findings for known contract excerpts.

use policy_lens_core::{
    detect_duplicates, score_providers, summarize, AnalysisEngine, ContractText,
    DetectionStrategy, FindingKind, IntakeConfig, MatchBasis, Preference,
};

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

fn default_config() -> IntakeConfig {
    IntakeConfig::from_toml(DEFAULT_CONFIG).unwrap()
}

/// Scoring case with the expected top entry and selected provider scores.
struct GoldenCase {
    id: &'static str,
    text: &'static str,
    preference: Preference,
    expected_top: &'static str,
    expected_top_score: u32,
    expected_scores: &'static [(&'static str, u32)],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "high-dental-private-room",
            text: "Soins dentaires jusqu'à CHF 10000\nHospitalisation en chambre privée",
            preference: Preference::ImproveBenefits,
            expected_top: "Sympany",
            expected_top_score: 5,
            expected_scores: &[
                ("Helsana", 5),
                ("Visana", 5),
                ("SWICA", 3),
                ("Sanitas", 3),
                ("Assura", 1),
                ("Concordia", 1),
            ],
        },
        GoldenCase {
            id: "reduce-cost-empty-text",
            text: "",
            preference: Preference::ReduceCost,
            expected_top: "Assura",
            expected_top_score: 3,
            expected_scores: &[("Sanitas", 0), ("Helsana", 0)],
        },
        GoldenCase {
            id: "orthodontics-self-identification",
            text: "Orthodontie: plafond 1500 CHF par année",
            preference: Preference::Undecided,
            expected_top: "Assura",
            expected_top_score: 3,
            expected_scores: &[("Helsana", 0), ("Groupe Mutuel", 0)],
        },
        GoldenCase {
            id: "abroad-and-fitness",
            text: "Couverture à l'étranger\nAbonnement fitness",
            preference: Preference::Undecided,
            expected_top: "Sympany",
            expected_top_score: 3,
            expected_scores: &[("Sanitas", 3), ("Assura", 0)],
        },
        GoldenCase {
            id: "no-signal",
            text: "Assurance obligatoire des soins LAMal",
            preference: Preference::Undecided,
            expected_top: "Assura",
            expected_top_score: 0,
            expected_scores: &[("Helsana", 0)],
        },
        GoldenCase {
            id: "top-liberty-tier",
            text: "Hospitalisation TOP LIBERTY, médecine alternative",
            preference: Preference::Undecided,
            expected_top: "Sympany",
            expected_top_score: 3,
            expected_scores: &[("Sanitas", 3), ("Concordia", 1), ("Assura", 1)],
        },
    ]
}

#[test]
fn test_default_config_is_valid() {
    let config = default_config();
    let catalog = config.validate().unwrap();

    assert_eq!(catalog.len(), 9);
    assert_eq!(config.scoring.rules.len(), 7);
    assert_eq!(catalog.lowest_tariff(), Some(250));
    assert_eq!(config.detector.strategy, DetectionStrategy::Both);
    assert!(config.scoring.display_ceiling.is_none());
}

#[test]
fn test_golden_scoring_cases() {
    let config = default_config();

    for case in get_golden_cases() {
        let contract = ContractText::new(1, case.text);
        let ranked = score_providers(
            &contract,
            case.preference,
            &config.providers,
            &config.scoring,
        );

        assert_eq!(ranked.len(), 9, "Case {}: ranking length", case.id);
        assert_eq!(
            ranked[0].provider_name, case.expected_top,
            "Case {}: top provider mismatch",
            case.id
        );
        assert_eq!(
            ranked[0].score, case.expected_top_score,
            "Case {}: top score mismatch",
            case.id
        );

        for (name, expected) in case.expected_scores {
            let entry = ranked
                .iter()
                .find(|e| e.provider_name == *name)
                .unwrap_or_else(|| panic!("Case {}: {} missing from ranking", case.id, name));
            assert_eq!(
                entry.score, *expected,
                "Case {}: score mismatch for {}",
                case.id, name
            );
        }

        for pair in ranked.windows(2) {
            assert!(
                pair[0].score >= pair[1].score,
                "Case {}: ranking not sorted",
                case.id
            );
        }
    }
}

#[test]
fn test_shared_line_is_one_cross_contract_finding() {
    let mut config = default_config();
    let contracts = ContractText::batch(&[
        "Hospitalisation privée illimitée",
        "hospitalisation   privée illimitée",
    ]);

    let findings = detect_duplicates(&contracts, &config.detector);
    let line_findings: Vec<_> = findings
        .iter()
        .filter(|f| f.kind == FindingKind::CrossContract && f.basis == MatchBasis::Line)
        .collect();
    assert_eq!(line_findings.len(), 1);
    assert_eq!(line_findings[0].contract_indices, vec![1, 2]);
    assert_eq!(
        line_findings[0].matched_fragment,
        "hospitalisation privée illimitée"
    );

    config.detector.strategy = DetectionStrategy::LineBased;
    let findings = detect_duplicates(&contracts, &config.detector);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::CrossContract);
}

#[test]
fn test_repeated_keyword_is_one_internal_finding() {
    let config = default_config();
    let contracts =
        ContractText::batch(&["Soins dentaires de base\nTraitement dentaire d'urgence"]);

    let findings = detect_duplicates(&contracts, &config.detector);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::Internal);
    assert_eq!(findings[0].contract_indices, vec![1]);
    assert_eq!(findings[0].matched_fragment, "dentaire");
}

#[test]
fn test_empty_batch_has_no_findings() {
    let config = default_config();
    assert!(detect_duplicates(&[], &config.detector).is_empty());
}

#[test]
fn test_boilerplate_lines_are_ignored() {
    let config = default_config();
    let contracts = ContractText::batch(&[
        "Helsana Assurances SA, case postale 123\nValable dès le 1er janvier 2024",
        "Helsana Assurances SA, case postale 123\nValable dès le 1er janvier 2024",
    ]);
    assert!(detect_duplicates(&contracts, &config.detector).is_empty());
}

#[test]
fn test_spaced_exclusion_terms_keep_benefit_lines() {
    let config = default_config();

    for line in [
        "physiothérapie deux séances par semaine",
        "remboursement dans tout le domaine ambulatoire",
    ] {
        let contracts = ContractText::batch(&[line, line]);
        let findings = detect_duplicates(&contracts, &config.detector);
        assert_eq!(findings.len(), 1, "line: {}", line);
        assert_eq!(findings[0].kind, FindingKind::CrossContract);
        assert_eq!(findings[0].basis, MatchBasis::Line);
        assert_eq!(findings[0].matched_fragment, line);
    }

    // "mai " still drops dated lines
    let dated = "entrée en vigueur le 1er mai 2024 pour les soins";
    let contracts = ContractText::batch(&[dated, dated]);
    assert!(detect_duplicates(&contracts, &config.detector).is_empty());
}

#[test]
fn test_excluded_line_still_counts_for_keywords() {
    let config = default_config();
    let contracts = ContractText::batch(&[
        "Lunettes remboursées chez Helsana",
        "Lunettes remboursées chez Helsana",
    ]);

    let findings = detect_duplicates(&contracts, &config.detector);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].basis, MatchBasis::Keyword);
    assert_eq!(findings[0].matched_fragment, "lunettes");
}

#[test]
fn test_default_summary() {
    let config = default_config();

    let full = ContractText::new(
        1,
        "Assurance de base LAMal\nAssurance complémentaire LCA\nHospitalisation mi-privée\nCheck-up annuel",
    );
    let summary = summarize(&full, &config.summary);
    assert_eq!(summary.note, 7);
    assert_eq!(summary.scale, 10);
    assert!(summary.missing_required.is_empty());

    let partial = ContractText::new(2, "Lunettes et lentilles");
    let summary = summarize(&partial, &config.summary);
    assert_eq!(summary.note, 3);
    assert_eq!(summary.missing_required, vec!["LAMal (base)"]);
}

#[test]
fn test_full_analysis_with_default_config() {
    let engine = AnalysisEngine::new(default_config()).unwrap();
    let report = engine.analyze(
        &[
            "LAMal\nSoins dentaires jusqu'à 10000 CHF\nHospitalisation privée illimitée",
            "Hospitalisation privée illimitée\nCouverture à l'étranger",
            "LAMal\nSoins dentaires jusqu'à 10000 CHF\nHospitalisation privée illimitée",
        ],
        Preference::ImproveBenefits,
    );

    assert_eq!(report.contracts.len(), 3);
    assert_eq!(report.contracts[0].recommended.as_deref(), Some("Sympany"));
    assert_eq!(report.identical_uploads(), vec![vec![1, 3]]);
    assert_eq!(
        report.contracts[1].summary.missing_required,
        vec!["LAMal (base)"]
    );

    let cross: Vec<_> = report
        .duplicates
        .of_kind(FindingKind::CrossContract)
        .collect();
    assert!(cross.iter().any(|f| f.contract_indices == vec![1, 2]
        && f.matched_fragment == "hospitalisation privée illimitée"));
    assert!(report
        .duplicates
        .fragments
        .contains(&"hospitalisation".to_string()));

    let text = report.to_text();
    assert!(text.contains("recommended provider: Sympany"));
}
