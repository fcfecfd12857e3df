use proofgate_types::InvariantCategory;

/// Ordered reason markers. The first marker found in the lowercased
/// reason decides the category.
pub const REASON_MARKERS: &[(&str, InvariantCategory)] = &[
    ("budget exhausted", InvariantCategory::BudgetExhausted),
    ("budget_exhausted", InvariantCategory::BudgetExhausted),
    ("exhausted", InvariantCategory::BudgetExhausted),
    ("inevitable", InvariantCategory::InevitableCollapse),
    ("collapse", InvariantCategory::EntropyCollapse),
    ("irreversible", InvariantCategory::IrreversibleAction),
    ("intent", InvariantCategory::IntentDrift),
    ("necess", InvariantCategory::UnnecessaryAction),
    ("survival", InvariantCategory::RequirementLoss),
    ("rsr", InvariantCategory::RequirementLoss),
    ("entropy", InvariantCategory::EntropyThreshold),
];

/// Map a free-text failure reason onto the taxonomy.
///
/// Only used when a layer does not state its category directly.
pub fn classify_reason(reason: &str) -> InvariantCategory {
    let lowered = reason.to_lowercase();
    REASON_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, category)| *category)
        .unwrap_or(InvariantCategory::GenericViolation)
}
