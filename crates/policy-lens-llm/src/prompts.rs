//! Prompts for contract analysis and free-form questions.
//!
//! Prompts are written in French, the language of the contracts and of the users.

use policy_lens_core::{ContractAnalysis, DuplicateReport};

/// System prompt for contract analysis.
pub const SYSTEM_PROMPT: &str =
    "Tu es un assistant expert en assurance maladie suisse (LAMal et LCA).";

/// System prompt for user questions.
pub const QUESTION_SYSTEM_PROMPT: &str = "Tu es un assistant expert en assurance maladie suisse. \
Réponds simplement, de façon fiable et utile. Si une information manque, dis-le.";

/// Providers listed in the context block.
pub const CONTEXT_TOP_PROVIDERS: usize = 3;

/// Results computed by the core, passed to the model as supporting context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisContext {
    pub note: u32,
    pub scale: u32,
    /// Labels of required modules not found
    pub missing_required: Vec<String>,
    /// Best-ranked providers with their score
    pub top_providers: Vec<(String, u32)>,
    /// Explanations of duplicate findings involving the contract
    pub duplicates: Vec<String>,
    /// Whether the insured works at least 8 hours a week (accident cover in LAMal)
    pub works_eight_hours: Option<bool>,
}

impl AnalysisContext {
    /// Context for one analyzed contract.
    pub fn from_analysis(analysis: &ContractAnalysis, duplicates: &DuplicateReport) -> Self {
        Self {
            note: analysis.summary.note,
            scale: analysis.summary.scale,
            missing_required: analysis.summary.missing_required.clone(),
            top_providers: analysis
                .ranking
                .iter()
                .take(CONTEXT_TOP_PROVIDERS)
                .map(|e| (e.provider_name.clone(), e.score))
                .collect(),
            duplicates: duplicates
                .findings
                .iter()
                .filter(|f| f.involves(analysis.source_index))
                .map(|f| f.human_explanation.clone())
                .collect(),
            works_eight_hours: None,
        }
    }

    pub fn with_work_hours(mut self, works_eight_hours: bool) -> Self {
        self.works_eight_hours = Some(works_eight_hours);
        self
    }

    /// Render as a bullet list for the prompt.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "- Note automatique des modules : {}/{}\n",
            self.note, self.scale
        ));
        for label in &self.missing_required {
            out.push_str(&format!("- Module non détecté : {}\n", label));
        }
        if !self.top_providers.is_empty() {
            let ranked: Vec<String> = self
                .top_providers
                .iter()
                .map(|(name, score)| format!("{} ({})", name, score))
                .collect();
            out.push_str(&format!(
                "- Assureurs les plus proches : {}\n",
                ranked.join(", ")
            ));
        }
        for duplicate in &self.duplicates {
            out.push_str(&format!("- Doublon possible : {}\n", duplicate));
        }
        match self.works_eight_hours {
            Some(true) => out.push_str(
                "- L'assuré travaille au moins 8h/semaine : l'accident est couvert par l'employeur, il peut être exclu de la LAMal\n",
            ),
            Some(false) => out.push_str(
                "- L'assuré travaille moins de 8h/semaine : l'accident doit être inclus dans la LAMal\n",
            ),
            None => {}
        }
        out
    }
}

/// User prompt for the three-part contract analysis.
pub fn make_analysis_prompt(contract_excerpt: &str, context: Option<&AnalysisContext>) -> String {
    let mut prompt = String::from(
        r#"Analyse ce contrat d'assurance maladie en 3 parties :
1. LAMal (assurance de base) : garanties, montants, franchise.
2. Complémentaire (LCA) : prestations ajoutées (lunettes, dentaire, médecines alternatives, check-up).
3. Hospitalisation : type de chambre (commune, mi-privée, privée), plafonds, libre choix du médecin.

Présente chaque partie sous forme de puces et mets les montants et limites en **gras**.
Signale clairement si la LAMal est absente : elle est obligatoire.
"#,
    );

    if let Some(context) = context {
        prompt.push_str("\nRésultats de l'analyse automatique (à utiliser comme contexte) :\n");
        prompt.push_str(&context.render());
    }

    prompt.push_str(&format!(
        "\nTexte du contrat :\n\"\"\"\n{}\n\"\"\"",
        contract_excerpt
    ));
    prompt
}
